//! Trace line parser
//!
//! Classifies a single line of allocator log output. The firmware logger
//! prints one event line per allocator call, followed by a `free = N` line
//! (remaining memory) and a `caller = 0x...` line (return address).
//!
//! Anything that does not match one of the known grammars exactly is not an
//! error; the caller simply skips it.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MALLOC: Regex = Regex::new(r"^malloc\(([0-9]+)\) = (0x[0-9A-F]+)$").unwrap();
    static ref REALLOC: Regex =
        Regex::new(r"^realloc\((0x[0-9A-F]+), ([0-9]+)\) = (0x[0-9A-F]+)$").unwrap();
    static ref FREE: Regex = Regex::new(r"^free\((0x[0-9A-F]+)\)$").unwrap();
    static ref FREE_MEMORY: Regex = Regex::new(r"^free = ([0-9]+)$").unwrap();
    static ref CALLER: Regex = Regex::new(r"^caller = (0x[0-9A-F]+)$").unwrap();
}

/// A recognized trace line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceLine {
    /// `malloc(<size>) = <address>`
    Malloc { size: u64, address: String },
    /// `realloc(<old>, <size>) = <new>`
    Realloc {
        old_address: String,
        size: u64,
        new_address: String,
    },
    /// `free(<address>)`
    Free { address: String },
    /// `free = <bytes>`
    FreeMemory(u64),
    /// `caller = <address>`
    Caller(String),
}

impl TraceLine {
    /// True for lines that are allocator events (as opposed to follow-up lines)
    pub fn is_event(&self) -> bool {
        matches!(
            self,
            TraceLine::Malloc { .. } | TraceLine::Realloc { .. } | TraceLine::Free { .. }
        )
    }
}

/// Parse one trace line (without its line terminator)
///
/// Returns `None` for lines matching no known grammar. Decimal fields too
/// large for 64 bits saturate at `u64::MAX`.
pub fn parse_line(line: &str) -> Option<TraceLine> {
    if let Some(caps) = MALLOC.captures(line) {
        return Some(TraceLine::Malloc {
            size: parse_decimal(&caps[1]),
            address: caps[2].to_string(),
        });
    }

    if let Some(caps) = REALLOC.captures(line) {
        return Some(TraceLine::Realloc {
            old_address: caps[1].to_string(),
            size: parse_decimal(&caps[2]),
            new_address: caps[3].to_string(),
        });
    }

    if let Some(caps) = FREE.captures(line) {
        return Some(TraceLine::Free {
            address: caps[1].to_string(),
        });
    }

    if let Some(caps) = FREE_MEMORY.captures(line) {
        return Some(TraceLine::FreeMemory(parse_decimal(&caps[1])));
    }

    if let Some(caps) = CALLER.captures(line) {
        return Some(TraceLine::Caller(caps[1].to_string()));
    }

    None
}

/// Grammar-checked digit run; overflow is the only way parsing fails
fn parse_decimal(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

/// Decode raw trace bytes as Latin-1
///
/// Each byte maps to the code point of the same value, so decoding never
/// fails on line noise from the serial console.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Split text into lines at `\n`, `\r\n` or a lone `\r`
///
/// Terminators are not part of the returned lines. A final line without a
/// terminator is still returned; a trailing terminator does not start an
/// extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(|c| c == '\r' || c == '\n') {
            Some(end) => {
                lines.push(&rest[..end]);
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }

    lines
}
