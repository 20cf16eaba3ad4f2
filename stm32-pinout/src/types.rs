//! Core types for the pinout extractor

/// Result type for pinout operations
pub type Result<T> = std::result::Result<T, PinoutError>;

/// A `Signal` element as declared in the MCU description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalElement {
    /// `Name` attribute, e.g. `USART1_TX` or `GPIO`
    pub name: String,
    /// `IOModes` attribute, only meaningful for the `GPIO` signal
    pub io_modes: Option<String>,
}

/// A `Pin` element with its signals in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinElement {
    /// `Name` attribute, e.g. `PA9`
    pub name: String,
    /// `Position` attribute (pin number or ball name)
    pub position: String,
    /// `Type` attribute, e.g. `I/O` or `Power`
    pub pin_type: String,
    pub signals: Vec<SignalElement>,
}

/// A parsed MCU description document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct McuDocument {
    /// Namespace of the root element, if it has one
    pub namespace: Option<String>,
    /// All pins in document order
    pub pins: Vec<PinElement>,
    /// Problems that did not stop parsing
    pub warnings: Vec<String>,
}

/// One row of the pinout table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinDescription {
    pub name: String,
    pub position: String,
    pub pin_type: String,
    /// Expanded and sorted signal names
    pub signals: Vec<String>,
}

/// Errors that can occur while extracting a pinout
#[derive(Debug, thiserror::Error)]
pub enum PinoutError {
    #[error("MCU description not found: {0}")]
    DocumentNotFound(String),

    #[error("Failed to parse MCU description: {0}")]
    XmlParseError(#[from] quick_xml::Error),

    #[error("Malformed MCU description: {0}")]
    MalformedDocument(String),

    #[error("<{element}> element without required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Failed to write pinout table: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
