//! Signal expansion and ordering
//!
//! CubeMX lists additional functions such as EXTI or EVENTOUT as GPIO
//! `IOModes` instead of as separate signals. Expansion turns each of those
//! into its own entry and marks default modes the pin lacks, so that the
//! table shows alternate and additional functions side by side.

use crate::config::PinoutConfig;
use crate::types::SignalElement;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Name of the generic GPIO signal
pub const GPIO_SIGNAL: &str = "GPIO";

/// Expand a pin's declared signals into output entries
///
/// Entries come out in document order, with the extra modes of a `GPIO`
/// signal placed just before the `GPIO` entry itself.
pub fn expand_signals(signals: &[SignalElement], config: &PinoutConfig) -> Vec<String> {
    let mut expanded = Vec::with_capacity(signals.len());

    for signal in signals {
        if signal.name != GPIO_SIGNAL {
            expanded.push(signal.name.clone());
            continue;
        }

        let modes: BTreeSet<&str> = signal
            .io_modes
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter(|mode| !mode.is_empty())
            .collect();

        let missing: Vec<String> = config
            .default_modes
            .iter()
            .filter(|mode| !modes.contains(mode.as_str()))
            .map(|mode| format!("{}_Not_Supported", mode))
            .collect();

        expanded.extend(
            modes
                .iter()
                .filter(|mode| !config.default_modes.iter().any(|d| d.as_str() == **mode))
                .map(|mode| mode.to_string()),
        );

        if missing.is_empty() {
            expanded.push(signal.name.clone());
        } else {
            expanded.push(format!("{}({})", signal.name, missing.join(",")));
        }
    }

    expanded
}

/// Priority order over signal name prefixes
#[derive(Debug, Clone, Copy)]
pub struct SignalOrder<'a> {
    prefixes: &'a [String],
}

impl<'a> SignalOrder<'a> {
    pub fn new(prefixes: &'a [String]) -> Self {
        Self { prefixes }
    }

    /// Index of the first prefix the signal starts with; unmatched signals
    /// get the lowest priority
    pub fn priority(&self, signal: &str) -> usize {
        self.prefixes
            .iter()
            .position(|prefix| signal.starts_with(prefix.as_str()))
            .unwrap_or(self.prefixes.len())
    }

    /// Compare by priority, then by full name
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.priority(a)
            .cmp(&self.priority(b))
            .then_with(|| a.cmp(b))
    }

    pub fn sort(&self, signals: &mut [String]) {
        signals.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpio(modes: &str) -> SignalElement {
        SignalElement {
            name: GPIO_SIGNAL.to_string(),
            io_modes: Some(modes.to_string()),
        }
    }

    fn named(name: &str) -> SignalElement {
        SignalElement {
            name: name.to_string(),
            io_modes: None,
        }
    }

    fn sorted(signals: &[SignalElement]) -> Vec<String> {
        let config = PinoutConfig::new();
        let mut expanded = expand_signals(signals, &config);
        SignalOrder::new(&config.signal_order).sort(&mut expanded);
        expanded
    }

    #[test]
    fn test_plain_gpio() {
        let expanded = expand_signals(&[gpio("Input,Output,Analog")], &PinoutConfig::new());
        assert_eq!(expanded, vec!["GPIO"]);
    }

    #[test]
    fn test_gpio_extra_modes_become_signals() {
        let expanded = expand_signals(
            &[gpio("Input,Output,Analog,EXTI,EVENTOUT")],
            &PinoutConfig::new(),
        );
        assert_eq!(expanded, vec!["EVENTOUT", "EXTI", "GPIO"]);
    }

    #[test]
    fn test_gpio_missing_default_modes() {
        let expanded = expand_signals(&[gpio("Input,Output")], &PinoutConfig::new());
        assert_eq!(expanded, vec!["GPIO(Analog_Not_Supported)"]);

        let expanded = expand_signals(&[gpio("EXTI")], &PinoutConfig::new());
        assert_eq!(
            expanded,
            vec![
                "EXTI",
                "GPIO(Input_Not_Supported,Output_Not_Supported,Analog_Not_Supported)"
            ]
        );
    }

    #[test]
    fn test_gpio_without_io_modes() {
        let signal = SignalElement {
            name: GPIO_SIGNAL.to_string(),
            io_modes: None,
        };
        let expanded = expand_signals(&[signal], &PinoutConfig::new());
        assert_eq!(
            expanded,
            vec!["GPIO(Input_Not_Supported,Output_Not_Supported,Analog_Not_Supported)"]
        );
    }

    #[test]
    fn test_only_exact_gpio_name_is_expanded() {
        let signal = SignalElement {
            name: "GPIO_EXTRA".to_string(),
            io_modes: Some("EXTI".to_string()),
        };
        let expanded = expand_signals(&[signal], &PinoutConfig::new());
        assert_eq!(expanded, vec!["GPIO_EXTRA"]);
    }

    #[test]
    fn test_priority() {
        let config = PinoutConfig::new();
        let order = SignalOrder::new(&config.signal_order);

        assert_eq!(order.priority("GPIO"), 0);
        assert_eq!(order.priority("EXTI"), 1);
        assert_eq!(order.priority("TIM1_CH2"), 4);
        assert_eq!(order.priority("LPTIM1_OUT"), 5);
        assert_eq!(order.priority("USART1_TX"), 7);
        assert_eq!(order.priority("LPUART1_RX"), 8);
        assert_eq!(order.priority("SYS_JTMS-SWDIO"), 14);
    }

    #[test]
    fn test_exti_after_gpio_before_unclassified() {
        let signals = sorted(&[
            named("SYS_WKUP"),
            named("USART1_TX"),
            gpio("Input,Output,Analog,EXTI"),
            named("TIM1_CH2"),
        ]);
        assert_eq!(signals, vec!["GPIO", "EXTI", "TIM1_CH2", "USART1_TX", "SYS_WKUP"]);
    }

    #[test]
    fn test_equal_priority_sorted_by_name() {
        let signals = sorted(&[
            named("TIM3_CH1"),
            named("TIM15_CH1"),
            named("TIM1_CH3"),
            named("RCC_MCO"),
            named("EVENTOUT"),
        ]);
        assert_eq!(
            signals,
            vec!["TIM15_CH1", "TIM1_CH3", "TIM3_CH1", "EVENTOUT", "RCC_MCO"]
        );
    }

    #[test]
    fn test_sort_is_deterministic() {
        let config = PinoutConfig::new();
        let order = SignalOrder::new(&config.signal_order);

        let mut once: Vec<String> = ["SPI1_SCK", "ADC1_IN5", "GPIO", "I2S1_CK", "CAN_RX", "OTHER"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        order.sort(&mut once);

        let mut twice = once.clone();
        order.sort(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(
            once,
            vec!["GPIO", "ADC1_IN5", "SPI1_SCK", "I2S1_CK", "CAN_RX", "OTHER"]
        );
    }

    #[test]
    fn test_custom_order() {
        let config = PinoutConfig::new().with_signal_order(["USART", "GPIO"]);
        let order = SignalOrder::new(&config.signal_order);

        let mut signals = vec!["GPIO".to_string(), "ADC1_IN0".to_string(), "USART2_RX".to_string()];
        order.sort(&mut signals);
        assert_eq!(signals, vec!["USART2_RX", "GPIO", "ADC1_IN0"]);
    }
}
