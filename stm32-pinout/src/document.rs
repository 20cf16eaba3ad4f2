//! STM32CubeMX MCU description parser using quick-xml
//!
//! The MCU files shipped with CubeMX (`db/mcu/STM32*.xml`) look like:
//!
//! ```xml
//! <Mcu xmlns="http://mcd.rou.st.com/modules.php?name=mcu" RefName="STM32F103C(8-B)Tx">
//!   <Pin Name="PA9" Position="30" Type="I/O">
//!     <Signal Name="TIM1_CH2"/>
//!     <Signal Name="USART1_TX"/>
//!     <Signal IOModes="Input,Output,Analog,EXTI" Name="GPIO"/>
//!   </Pin>
//! </Mcu>
//! ```
//!
//! Only direct `Pin` children of the root and direct `Signal` children of a
//! pin are read. Both are matched in the root element's namespace, so a
//! default `xmlns` on the root qualifies every unprefixed element below it.

use crate::types::{McuDocument, PinElement, PinoutError, Result, SignalElement};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const ROOT_DEPTH: usize = 1;
const PIN_DEPTH: usize = 2;
const SIGNAL_DEPTH: usize = 3;

/// Parse an MCU description file
pub fn parse_mcu_file(path: &Path) -> Result<McuDocument> {
    log::info!("Parsing MCU description: {:?}", path);

    if !path.exists() {
        return Err(PinoutError::DocumentNotFound(format!("{:?}", path)));
    }

    let file = File::open(path)?;
    let document = parse_mcu_document(BufReader::new(file))?;

    log::info!("MCU description parsed: {} pins", document.pins.len());
    Ok(document)
}

/// Parse an MCU description held in memory
pub fn parse_mcu_str(text: &str) -> Result<McuDocument> {
    parse_mcu_document(text.as_bytes())
}

/// Parse an MCU description from any buffered reader
pub fn parse_mcu_document<R: BufRead>(reader: R) -> Result<McuDocument> {
    let mut reader = NsReader::from_reader(reader);
    let mut builder = DocumentBuilder::default();
    let mut buf = Vec::new();
    let mut depth = 0;

    loop {
        let root_closed = builder.root_seen && depth == 0;

        match reader.read_resolved_event_into(&mut buf)? {
            (_, Event::Start(_)) | (_, Event::Empty(_)) | (_, Event::End(_)) if root_closed => {
                return Err(junk_after_root());
            }
            (_, Event::Text(ref text))
                if root_closed && !text.iter().all(u8::is_ascii_whitespace) =>
            {
                return Err(junk_after_root());
            }
            (_, Event::CData(_)) if root_closed => return Err(junk_after_root()),
            (ns, Event::Start(ref element)) => {
                depth += 1;
                builder.open(&ns, element, depth)?;
            }
            (ns, Event::Empty(ref element)) => {
                builder.open(&ns, element, depth + 1)?;
                builder.close(depth + 1);
            }
            (_, Event::End(_)) => {
                builder.close(depth);
                depth = depth.saturating_sub(1);
            }
            (_, Event::Eof) => break,
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 {
        return Err(PinoutError::MalformedDocument(format!(
            "{} element(s) not closed at end of input",
            depth
        )));
    }

    let document = builder.finish()?;
    for warning in &document.warnings {
        log::warn!("{}", warning);
    }
    Ok(document)
}

fn junk_after_root() -> PinoutError {
    PinoutError::MalformedDocument("junk after document element".to_string())
}

/// Collects pins while the reader walks the document
#[derive(Default)]
struct DocumentBuilder {
    root_seen: bool,
    namespace: Option<Vec<u8>>,
    pins: Vec<PinElement>,
    current_pin: Option<PinElement>,
    warnings: Vec<String>,
}

impl DocumentBuilder {
    fn open(&mut self, ns: &ResolveResult, element: &BytesStart, depth: usize) -> Result<()> {
        match depth {
            ROOT_DEPTH => {
                self.root_seen = true;
                self.namespace = match ns {
                    ResolveResult::Bound(Namespace(uri)) => Some(uri.to_vec()),
                    _ => None,
                };
                if self.namespace.is_none() {
                    self.warnings.push("No xmlns found in root element".to_string());
                }
            }
            PIN_DEPTH if self.matches(ns, element, b"Pin") => {
                let pin = PinElement {
                    name: required_attribute(element, "Pin", "Name")?,
                    position: required_attribute(element, "Pin", "Position")?,
                    pin_type: required_attribute(element, "Pin", "Type")?,
                    signals: Vec::new(),
                };
                self.current_pin = Some(pin);
            }
            SIGNAL_DEPTH if self.matches(ns, element, b"Signal") => {
                if let Some(pin) = self.current_pin.as_mut() {
                    pin.signals.push(SignalElement {
                        name: required_attribute(element, "Signal", "Name")?,
                        io_modes: attribute(element, "IOModes")?,
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, depth: usize) {
        if depth == PIN_DEPTH {
            if let Some(pin) = self.current_pin.take() {
                log::debug!("Pin {} ({} signals)", pin.name, pin.signals.len());
                self.pins.push(pin);
            }
        }
    }

    /// True if `element` has the given local name in the root's namespace
    fn matches(&self, ns: &ResolveResult, element: &BytesStart, local_name: &[u8]) -> bool {
        if element.name().local_name().as_ref() != local_name {
            return false;
        }

        match (ns, &self.namespace) {
            (ResolveResult::Bound(Namespace(uri)), Some(root)) => *uri == root.as_slice(),
            (ResolveResult::Unbound, None) => true,
            _ => false,
        }
    }

    fn finish(self) -> Result<McuDocument> {
        if !self.root_seen {
            return Err(PinoutError::MalformedDocument(
                "no root element found".to_string(),
            ));
        }

        Ok(McuDocument {
            namespace: self
                .namespace
                .map(|uri| String::from_utf8_lossy(&uri).into_owned()),
            pins: self.pins,
            warnings: self.warnings,
        })
    }
}

/// Look up an unprefixed attribute by name
fn attribute(element: &BytesStart, key: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        if attr.key.as_ref() == key.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(
    element: &BytesStart,
    element_name: &'static str,
    key: &'static str,
) -> Result<String> {
    attribute(element, key)?.ok_or(PinoutError::MissingAttribute {
        element: element_name,
        attribute: key,
    })
}
