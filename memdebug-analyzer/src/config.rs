//! Analyzer configuration types
//!
//! The tracking rules themselves are fixed; configuration only controls what
//! ends up in the report.

use serde::{Deserialize, Serialize};

/// Configuration for report generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Follow each finding with the caller address, when one was logged
    #[serde(default)]
    pub show_callers: bool,

    /// Append trace statistics after the findings
    #[serde(default)]
    pub summary: bool,

    /// Output format of the report
    #[serde(default)]
    pub format: ReportFormat,
}

/// Report output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Line-oriented human-readable report
    #[default]
    Text,
    /// A single JSON document with findings and statistics
    Json,
}

impl AnalyzerConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable caller annotations
    pub fn with_callers(mut self, enabled: bool) -> Self {
        self.show_callers = enabled;
        self
    }

    /// Builder method: enable or disable the statistics summary
    pub fn with_summary(mut self, enabled: bool) -> Self {
        self.summary = enabled;
        self
    }

    /// Builder method: set the output format
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_config_builder() {
        let config = AnalyzerConfig::new()
            .with_callers(true)
            .with_summary(true)
            .with_format(ReportFormat::Json);

        assert!(config.show_callers);
        assert!(config.summary);
        assert_eq!(config.format, ReportFormat::Json);
    }

    #[test]
    fn test_defaults_match_plain_report() {
        let config = AnalyzerConfig::new();
        assert!(!config.show_callers);
        assert!(!config.summary);
        assert_eq!(config.format, ReportFormat::Text);
    }
}
