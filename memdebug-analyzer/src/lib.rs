//! Memory Debug Trace Analyzer
//!
//! Replays the output of a firmware-side `malloc`/`realloc`/`free` logger and
//! reports allocator misuse.
//!
//! # Architecture
//!
//! The analysis is a single pass over the trace:
//! - Each line is classified by [`parser::parse_line`]; unknown lines are skipped
//! - [`AllocationTracker`] keeps one outstanding record per address
//! - `free`/`realloc` on an untracked address yields a not-allocated finding
//! - Records left at end of input are reported as never freed
//!
//! Rendering is separate from tracking; see [`report`].
//!
//! # Example Usage
//!
//! ```no_run
//! use memdebug_analyzer::{analyze, write_report, AnalyzerConfig};
//! use std::io;
//!
//! let analysis = analyze(io::stdin().lock()).unwrap();
//! let config = AnalyzerConfig::new().with_summary(true);
//! write_report(&analysis, &config, &mut io::stdout()).unwrap();
//! ```

// Public modules
pub mod config;
pub mod parser;
pub mod report;
pub mod tracker;
pub mod types;

// Re-export main types for convenience
pub use config::{AnalyzerConfig, ReportFormat};
pub use report::write_report;
pub use tracker::{analyze, analyze_file, AllocationTracker};
pub use types::{
    AllocationRecord, Analysis, AnalyzerError, Finding, FindingKind, Result, TraceStats,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        let tracker = AllocationTracker::new();
        assert_eq!(tracker.outstanding(), 0);
        assert!(tracker.finish().is_clean());
    }
}
