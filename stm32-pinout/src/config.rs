//! Pinout extraction configuration

use serde::{Deserialize, Serialize};

/// GPIO modes every pin is expected to support
pub const DEFAULT_GPIO_MODES: [&str; 3] = ["Input", "Output", "Analog"];

/// Signal name prefixes in output order
pub const DEFAULT_SIGNAL_ORDER: [&str; 14] = [
    "GPIO", "EXTI", "ADC", "DAC", "TIM", "LPTIM", "UART", "USART", "LPUART", "SPI", "I2C", "I2S",
    "CAN", "USB",
];

/// Configuration for signal expansion and ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinoutConfig {
    /// GPIO modes that are implied and not listed as separate signals
    #[serde(default = "default_modes")]
    pub default_modes: Vec<String>,

    /// Signal prefixes in priority order; unmatched signals sort last
    #[serde(default = "default_signal_order")]
    pub signal_order: Vec<String>,
}

fn default_modes() -> Vec<String> {
    DEFAULT_GPIO_MODES.iter().map(|s| s.to_string()).collect()
}

fn default_signal_order() -> Vec<String> {
    DEFAULT_SIGNAL_ORDER.iter().map(|s| s.to_string()).collect()
}

impl Default for PinoutConfig {
    fn default() -> Self {
        Self {
            default_modes: default_modes(),
            signal_order: default_signal_order(),
        }
    }
}

impl PinoutConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: replace the implied GPIO modes
    pub fn with_default_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_modes = modes.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: replace the signal prefix order
    pub fn with_signal_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.signal_order = order.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PinoutConfig::new();
        assert_eq!(config.default_modes, vec!["Input", "Output", "Analog"]);
        assert_eq!(config.signal_order.len(), 14);
        assert_eq!(config.signal_order[0], "GPIO");
    }

    #[test]
    fn test_builder() {
        let config = PinoutConfig::new()
            .with_default_modes(["Input", "Output"])
            .with_signal_order(vec!["ADC".to_string()]);

        assert_eq!(config.default_modes, vec!["Input", "Output"]);
        assert_eq!(config.signal_order, vec!["ADC"]);
    }
}
