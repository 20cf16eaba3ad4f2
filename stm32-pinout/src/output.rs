//! CSV table output
//!
//! Rows are ragged: `name,pin,type` followed by however many signals the pin
//! has.

use crate::types::{PinDescription, Result};
use std::io::Write;

/// Header row of the pinout table
pub const HEADER: [&str; 3] = ["name", "pin", "type"];

/// Writes pinout rows as CSV
pub struct PinoutWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PinoutWriter<W> {
    /// Create a writer and emit the header row
    pub fn new(out: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
        writer.write_record(HEADER)?;
        Ok(Self { writer })
    }

    /// Write one pin row
    pub fn write_pin(&mut self, pin: &PinDescription) -> Result<()> {
        let fields = [&pin.name, &pin.position, &pin.pin_type]
            .into_iter()
            .chain(pin.signals.iter());
        self.writer.write_record(fields)?;
        Ok(())
    }

    /// Flush buffered rows to the underlying writer
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Write a complete pinout table
pub fn write_pinout<W: Write>(pins: &[PinDescription], out: W) -> Result<()> {
    let mut writer = PinoutWriter::new(out)?;
    for pin in pins {
        writer.write_pin(pin)?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(name: &str, position: &str, signals: &[&str]) -> PinDescription {
        PinDescription {
            name: name.to_string(),
            position: position.to_string(),
            pin_type: "I/O".to_string(),
            signals: signals.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_ragged_rows() {
        let pins = vec![
            pin("PA9", "30", &["GPIO", "EXTI", "TIM1_CH2", "USART1_TX"]),
            pin("VDD", "1", &[]),
        ];

        let mut out = Vec::new();
        write_pinout(&pins, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,pin,type\nPA9,30,I/O,GPIO,EXTI,TIM1_CH2,USART1_TX\nVDD,1,I/O\n"
        );
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let pins = vec![pin("PA0", "10", &["GPIO(Input_Not_Supported,Analog_Not_Supported)"])];

        let mut out = Vec::new();
        write_pinout(&pins, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,pin,type\nPA0,10,I/O,\"GPIO(Input_Not_Supported,Analog_Not_Supported)\"\n"
        );
    }

    #[test]
    fn test_header_only_for_empty_table() {
        let mut out = Vec::new();
        write_pinout(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "name,pin,type\n");
    }
}
