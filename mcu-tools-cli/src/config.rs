//! Configuration loading and parsing
//!
//! The configuration file is optional; every section and key falls back to
//! the library defaults.

use anyhow::{Context, Result};
use memdebug_analyzer::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use stm32_pinout::PinoutConfig;

/// Main application configuration (loaded from e.g. mcu-tools.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub memdebug: AnalyzerConfig,
    #[serde(default)]
    pub pinout: PinoutConfig,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Load the configuration file if one was given, defaults otherwise
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            load_config(path)
        }
        None => Ok(AppConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memdebug_analyzer::ReportFormat;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [memdebug]
            show_callers = true
            format = "json"

            [pinout]
            default_modes = ["Input", "Output"]
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert!(config.memdebug.show_callers);
        assert!(!config.memdebug.summary);
        assert_eq!(config.memdebug.format, ReportFormat::Json);
        assert_eq!(config.pinout.default_modes, vec!["Input", "Output"]);
        assert_eq!(config.pinout.signal_order, PinoutConfig::new().signal_order);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.memdebug, AnalyzerConfig::new());
        assert_eq!(config.pinout, PinoutConfig::new());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result: std::result::Result<AppConfig, _> = toml::from_str("[memdebug]\nformat = \"html\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pinout]\nsignal_order = [\"ADC\", \"GPIO\"]").unwrap();

        let config = load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.pinout.signal_order, vec!["ADC", "GPIO"]);
    }

    #[test]
    fn test_missing_config_file() {
        assert!(load_config(Path::new("nonexistent.toml")).is_err());
        assert!(load_or_default(None).is_ok());
    }
}
