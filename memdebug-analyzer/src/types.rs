//! Core types for the allocation trace analyzer
//!
//! This module defines the records the tracker keeps while replaying a trace
//! and the findings it emits. The tracker itself owns the mapping; these types
//! are plain data.

use serde::Serialize;
use std::fmt;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Address value the allocator returns for a failed or empty allocation
pub const NULL_ADDRESS: &str = "0x0";

/// An outstanding allocation, keyed by its address in the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationRecord {
    /// Trace line that created this allocation (without line terminator)
    pub line: String,
    /// 1-based line number in the trace
    pub line_number: usize,
    /// Requested size in bytes
    pub size: u64,
    /// Return address reported by the `caller = ...` follow-up line
    pub caller: Option<String>,
}

/// The condition a finding reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// `free` or `realloc` on an address with no outstanding record
    NotAllocated,
    /// Record still outstanding at end of input
    NeverFreed,
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingKind::NotAllocated => write!(f, "not allocated"),
            FindingKind::NeverFreed => write!(f, "never freed"),
        }
    }
}

/// A single reportable event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// What went wrong
    pub kind: FindingKind,
    /// The offending address
    pub address: String,
    /// 1-based line number of the trace line the finding refers to
    pub line_number: usize,
    /// The trace line itself
    pub line: String,
    /// Caller of the offending (or leaking) allocator call, if known
    pub caller: Option<String>,
}

impl Finding {
    /// Build a never-freed finding from a leftover allocation record
    pub fn never_freed(address: String, record: AllocationRecord) -> Self {
        Self {
            kind: FindingKind::NeverFreed,
            address,
            line_number: record.line_number,
            line: record.line,
            caller: record.caller,
        }
    }
}

/// Counters collected during a single pass over a trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraceStats {
    /// Lines read from the input
    pub lines: usize,
    /// Recognized `malloc` events
    pub mallocs: usize,
    /// Recognized `realloc` events
    pub reallocs: usize,
    /// Recognized `free` events, including `free(0x0)`
    pub frees: usize,
    /// Number of not-allocated findings
    pub not_allocated: usize,
    /// Allocations outstanding at end of input
    pub outstanding_allocations: usize,
    /// Sum of sizes of outstanding allocations
    pub outstanding_bytes: u64,
    /// Highest value `outstanding_bytes` reached during the run
    pub peak_outstanding_bytes: u64,
    /// Lowest `free = N` value the device reported
    pub lowest_free_memory: Option<u64>,
}

/// Result of analyzing a complete trace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Not-allocated findings in trace order, followed by never-freed findings
    pub findings: Vec<Finding>,
    /// Counters for the whole run
    pub stats: TraceStats,
}

impl Analysis {
    /// True when the trace produced no findings at all
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Iterate over findings of a single kind
    pub fn findings_of(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

/// Errors that can occur while analyzing a trace
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Failed to write report: {0}")]
    ReportError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_kind_display() {
        assert_eq!(FindingKind::NotAllocated.to_string(), "not allocated");
        assert_eq!(FindingKind::NeverFreed.to_string(), "never freed");
    }

    #[test]
    fn test_never_freed_from_record() {
        let record = AllocationRecord {
            line: "malloc(10) = 0x1".to_string(),
            line_number: 3,
            size: 10,
            caller: Some("0x2A4".to_string()),
        };

        let finding = Finding::never_freed("0x1".to_string(), record);
        assert_eq!(finding.kind, FindingKind::NeverFreed);
        assert_eq!(finding.line_number, 3);
        assert_eq!(finding.caller.as_deref(), Some("0x2A4"));
    }
}
