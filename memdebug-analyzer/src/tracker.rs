//! Allocation tracking state machine
//!
//! Replays a trace one line at a time, keeping at most one outstanding record
//! per address. `free` and `realloc` on an address without a record produce a
//! not-allocated finding; whatever is left at end of input is reported as
//! never freed.

use crate::parser::{decode_latin1, parse_line, split_lines, TraceLine};
use crate::types::{
    AllocationRecord, Analysis, Finding, FindingKind, Result, TraceStats, NULL_ADDRESS,
};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Targets for a `caller = ...` line following an event
#[derive(Debug, Default)]
struct PendingCaller {
    /// Address of the record the event created
    allocation: Option<String>,
    /// Index of the finding the event produced
    finding: Option<usize>,
}

/// Replays allocator events and collects findings
#[derive(Debug, Default)]
pub struct AllocationTracker {
    /// Outstanding allocations in first-insertion order
    allocations: IndexMap<String, AllocationRecord>,
    /// Not-allocated findings in trace order
    findings: Vec<Finding>,
    stats: TraceStats,
    pending_caller: Option<PendingCaller>,
}

impl AllocationTracker {
    /// Create a tracker with no outstanding allocations
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one trace line and apply it
    ///
    /// # Arguments
    /// * `line_number` - 1-based position of the line in the trace
    /// * `line` - Line text without its terminator
    pub fn process_line(&mut self, line_number: usize, line: &str) {
        self.stats.lines = self.stats.lines.max(line_number);

        let parsed = match parse_line(line) {
            Some(parsed) => parsed,
            None => {
                log::trace!("Ignoring line {}: {:?}", line_number, line);
                return;
            }
        };

        if parsed.is_event() {
            self.pending_caller = None;
        }

        match parsed {
            TraceLine::Malloc { size, address } => {
                self.malloc(line_number, line, size, address);
            }
            TraceLine::Realloc {
                old_address,
                size,
                new_address,
            } => {
                self.realloc(line_number, line, &old_address, size, new_address);
            }
            TraceLine::Free { address } => {
                self.free(line_number, line, &address);
            }
            TraceLine::FreeMemory(bytes) => {
                let lowest = self.stats.lowest_free_memory.get_or_insert(bytes);
                *lowest = (*lowest).min(bytes);
            }
            TraceLine::Caller(caller) => self.attach_caller(caller),
        }
    }

    /// `malloc(size) = address`: record the allocation, replacing any record
    /// already held for `address`
    pub fn malloc(&mut self, line_number: usize, line: &str, size: u64, address: String) {
        log::debug!("{}: malloc({}) = {}", line_number, size, address);
        self.stats.mallocs += 1;

        self.insert(address.clone(), line_number, line, size);
        self.pending_caller = Some(PendingCaller {
            allocation: Some(address),
            finding: None,
        });
    }

    /// `realloc(old_address, size) = new_address`
    ///
    /// A missing record for `old_address` is reported, but the new
    /// allocation is recorded regardless.
    pub fn realloc(
        &mut self,
        line_number: usize,
        line: &str,
        old_address: &str,
        size: u64,
        new_address: String,
    ) {
        log::debug!(
            "{}: realloc({}, {}) = {}",
            line_number,
            old_address,
            size,
            new_address
        );
        self.stats.reallocs += 1;

        let mut pending = PendingCaller::default();
        if old_address != NULL_ADDRESS && self.release(old_address).is_none() {
            pending.finding = Some(self.report_not_allocated(line_number, line, old_address));
        }

        self.insert(new_address.clone(), line_number, line, size);
        pending.allocation = Some(new_address);
        self.pending_caller = Some(pending);
    }

    /// `free(address)`: release the record; `free(0x0)` is a no-op
    pub fn free(&mut self, line_number: usize, line: &str, address: &str) {
        log::debug!("{}: free({})", line_number, address);
        self.stats.frees += 1;

        if address == NULL_ADDRESS {
            return;
        }

        if self.release(address).is_none() {
            let finding = self.report_not_allocated(line_number, line, address);
            self.pending_caller = Some(PendingCaller {
                allocation: None,
                finding: Some(finding),
            });
        }
    }

    /// Number of currently outstanding allocations
    pub fn outstanding(&self) -> usize {
        self.allocations.len()
    }

    /// Look up the outstanding record for an address
    pub fn get(&self, address: &str) -> Option<&AllocationRecord> {
        self.allocations.get(address)
    }

    /// End of input: report every outstanding record as never freed
    pub fn finish(self) -> Analysis {
        let AllocationTracker {
            allocations,
            mut findings,
            mut stats,
            ..
        } = self;

        stats.outstanding_allocations = allocations.len();
        findings.extend(
            allocations
                .into_iter()
                .map(|(address, record)| Finding::never_freed(address, record)),
        );

        Analysis { findings, stats }
    }

    /// Replay every line of a trace stream
    ///
    /// Input is decoded as Latin-1. A line ends at `\n`, `\r\n` or a lone `\r`.
    pub fn process_reader<R: BufRead>(&mut self, mut reader: R) -> Result<()> {
        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let text = decode_latin1(&buf);
            for line in split_lines(&text) {
                line_number += 1;
                self.process_line(line_number, line);
            }
        }

        Ok(())
    }

    fn insert(&mut self, address: String, line_number: usize, line: &str, size: u64) {
        let record = AllocationRecord {
            line: line.to_string(),
            line_number,
            size,
            caller: None,
        };

        if let Some(previous) = self.allocations.insert(address, record) {
            self.stats.outstanding_bytes = self.stats.outstanding_bytes.saturating_sub(previous.size);
        }
        self.stats.outstanding_bytes = self.stats.outstanding_bytes.saturating_add(size);
        self.stats.peak_outstanding_bytes = self
            .stats
            .peak_outstanding_bytes
            .max(self.stats.outstanding_bytes);
    }

    fn release(&mut self, address: &str) -> Option<AllocationRecord> {
        let record = self.allocations.shift_remove(address)?;
        self.stats.outstanding_bytes = self.stats.outstanding_bytes.saturating_sub(record.size);
        Some(record)
    }

    fn report_not_allocated(&mut self, line_number: usize, line: &str, address: &str) -> usize {
        log::debug!("{}: {} not allocated", line_number, address);
        self.stats.not_allocated += 1;

        self.findings.push(Finding {
            kind: FindingKind::NotAllocated,
            address: address.to_string(),
            line_number,
            line: line.to_string(),
            caller: None,
        });
        self.findings.len() - 1
    }

    fn attach_caller(&mut self, caller: String) {
        // Only the first caller line after an event belongs to it
        let pending = match self.pending_caller.take() {
            Some(pending) => pending,
            None => return,
        };

        if let Some(address) = pending.allocation {
            if let Some(record) = self.allocations.get_mut(&address) {
                record.caller = Some(caller.clone());
            }
        }
        if let Some(index) = pending.finding {
            if let Some(finding) = self.findings.get_mut(index) {
                finding.caller = Some(caller);
            }
        }
    }
}

/// Analyze a complete trace stream
pub fn analyze<R: BufRead>(reader: R) -> Result<Analysis> {
    let mut tracker = AllocationTracker::new();
    tracker.process_reader(reader)?;
    Ok(tracker.finish())
}

/// Analyze a trace file
pub fn analyze_file(path: &Path) -> Result<Analysis> {
    log::info!("Analyzing trace file: {:?}", path);
    let file = File::open(path)?;
    analyze(BufReader::new(file))
}
