//! STM32 Pinout Extractor
//!
//! Converts an STM32CubeMX MCU description (`db/mcu/STM32*.xml`) into a pinout
//! table listing every special function available on each pin.
//!
//! The table combines "alternate functions" (timer outputs, SPI buses, ...)
//! that are selected through the pin's AF mode with "additional functions"
//! (ADC, EXTI, DAC, ...) that are connected whenever the peripheral is
//! enabled. Datasheets keep these in separate tables.
//!
//! # Example Usage
//!
//! ```no_run
//! use stm32_pinout::{extract_pinout_file, write_pinout, PinoutConfig};
//! use std::io;
//! use std::path::Path;
//!
//! let config = PinoutConfig::new();
//! let pins = extract_pinout_file(Path::new("STM32F103CBUx.xml"), &config).unwrap();
//! write_pinout(&pins, io::stdout()).unwrap();
//! ```

// Public modules
pub mod config;
pub mod document;
pub mod extractor;
pub mod output;
pub mod signals;
pub mod types;

// Re-export main types for convenience
pub use config::PinoutConfig;
pub use document::{parse_mcu_file, parse_mcu_str};
pub use extractor::{describe_pin, extract_pinout, extract_pinout_file};
pub use output::{write_pinout, PinoutWriter};
pub use types::{McuDocument, PinDescription, PinElement, PinoutError, Result, SignalElement};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
