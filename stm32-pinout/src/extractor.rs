//! Pinout extraction API
//!
//! Turns a parsed MCU description into one [`PinDescription`] per pin, in
//! document order.

use crate::config::PinoutConfig;
use crate::document::parse_mcu_file;
use crate::signals::{expand_signals, SignalOrder};
use crate::types::{McuDocument, PinDescription, PinElement, Result};
use std::path::Path;

/// Build the table row for a single pin
pub fn describe_pin(pin: &PinElement, config: &PinoutConfig) -> PinDescription {
    let mut signals = expand_signals(&pin.signals, config);
    SignalOrder::new(&config.signal_order).sort(&mut signals);

    PinDescription {
        name: pin.name.clone(),
        position: pin.position.clone(),
        pin_type: pin.pin_type.clone(),
        signals,
    }
}

/// Describe every pin of a parsed document
pub fn extract_pinout(document: &McuDocument, config: &PinoutConfig) -> Vec<PinDescription> {
    document
        .pins
        .iter()
        .map(|pin| describe_pin(pin, config))
        .collect()
}

/// Parse an MCU description file and describe all of its pins
///
/// # Example
/// ```no_run
/// use stm32_pinout::{extract_pinout_file, PinoutConfig};
/// use std::path::Path;
///
/// let pins = extract_pinout_file(
///     Path::new("/usr/local/cubemx/db/mcu/STM32F103CBUx.xml"),
///     &PinoutConfig::new(),
/// )
/// .unwrap();
/// ```
pub fn extract_pinout_file(path: &Path, config: &PinoutConfig) -> Result<Vec<PinDescription>> {
    let document = parse_mcu_file(path)?;
    Ok(extract_pinout(&document, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_mcu_str;

    #[test]
    fn test_pins_keep_document_order() {
        let xml = r#"<Mcu>
  <Pin Name="PB1" Position="19" Type="I/O"/>
  <Pin Name="PA0-WKUP" Position="10" Type="I/O"/>
  <Pin Name="BOOT0" Position="44" Type="Boot"/>
</Mcu>"#;

        let doc = parse_mcu_str(xml).unwrap();
        let names: Vec<_> = extract_pinout(&doc, &PinoutConfig::new())
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["PB1", "PA0-WKUP", "BOOT0"]);
    }

    #[test]
    fn test_describe_pin() {
        let xml = r#"<Mcu>
  <Pin Name="PA2" Position="12" Type="I/O">
    <Signal Name="ADC1_IN2"/>
    <Signal Name="TIM2_CH3"/>
    <Signal Name="USART2_TX"/>
    <Signal IOModes="Input,Output,Analog,EXTI" Name="GPIO"/>
  </Pin>
</Mcu>"#;

        let doc = parse_mcu_str(xml).unwrap();
        let pin = describe_pin(&doc.pins[0], &PinoutConfig::new());

        assert_eq!(pin.name, "PA2");
        assert_eq!(pin.position, "12");
        assert_eq!(pin.pin_type, "I/O");
        assert_eq!(
            pin.signals,
            vec!["GPIO", "EXTI", "ADC1_IN2", "TIM2_CH3", "USART2_TX"]
        );
    }
}
