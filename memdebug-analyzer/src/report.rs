//! Report rendering
//!
//! The text report prints every finding as the offending trace line prefixed
//! with its line number, followed by a `>>` marker line:
//!
//! ```text
//!   2: free(0x2)
//! >> 0x2 not allocated
//!   1: malloc(10) = 0x1
//! >> 0x1 never freed
//! ```

use crate::config::{AnalyzerConfig, ReportFormat};
use crate::types::{Analysis, Finding, Result, TraceStats};
use serde::Serialize;
use std::io::Write;

/// Write an analysis in the configured format
pub fn write_report<W: Write>(
    analysis: &Analysis,
    config: &AnalyzerConfig,
    out: &mut W,
) -> Result<()> {
    match config.format {
        ReportFormat::Text => write_text(analysis, config, out),
        ReportFormat::Json => write_json(analysis, config, out),
    }
}

/// Write the line-oriented report
pub fn write_text<W: Write>(
    analysis: &Analysis,
    config: &AnalyzerConfig,
    out: &mut W,
) -> Result<()> {
    for finding in &analysis.findings {
        write_finding(finding, config.show_callers, out)?;
    }

    if config.summary {
        write_summary(&analysis.stats, out)?;
    }

    Ok(())
}

fn write_finding<W: Write>(finding: &Finding, show_callers: bool, out: &mut W) -> Result<()> {
    writeln!(out, "{:3}: {}", finding.line_number, finding.line)?;
    writeln!(out, ">> {} {}", finding.address, finding.kind)?;

    if show_callers {
        if let Some(caller) = &finding.caller {
            writeln!(out, ">> caller {}", caller)?;
        }
    }

    Ok(())
}

fn write_summary<W: Write>(stats: &TraceStats, out: &mut W) -> Result<()> {
    writeln!(out, "-- summary --")?;
    writeln!(
        out,
        "events: {} malloc, {} realloc, {} free",
        stats.mallocs, stats.reallocs, stats.frees
    )?;
    writeln!(out, "not allocated: {}", stats.not_allocated)?;
    writeln!(
        out,
        "outstanding: {} allocations, {} bytes",
        stats.outstanding_allocations, stats.outstanding_bytes
    )?;
    writeln!(out, "peak outstanding: {} bytes", stats.peak_outstanding_bytes)?;
    if let Some(lowest) = stats.lowest_free_memory {
        writeln!(out, "lowest free memory: {} bytes", lowest)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    findings: &'a [Finding],
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a TraceStats>,
}

/// Write the analysis as a single JSON document
///
/// Callers are always present in the finding objects when known; `stats` is
/// only included when the summary is enabled.
pub fn write_json<W: Write>(
    analysis: &Analysis,
    config: &AnalyzerConfig,
    out: &mut W,
) -> Result<()> {
    let report = JsonReport {
        findings: &analysis.findings,
        stats: config.summary.then_some(&analysis.stats),
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
