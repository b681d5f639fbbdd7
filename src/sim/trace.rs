//! JSON workload traces for the CLI driver.
//!
//! A trace is a JSON array of timed accesses against flat linear addresses:
//!
//! ```json
//! [
//!   { "cycle": 0, "addr": 4096, "write": false },
//!   { "cycle": 3, "addr": 8192, "write": true }
//! ]
//! ```
//!
//! Addresses are split into (bank, row, col) by the configured
//! [`AddressMapper`](crate::common::AddressMapper) before submission.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

/// One timed access in a workload trace.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct TraceEntry {
    /// Earliest cycle at which the access may be submitted.
    pub cycle: u64,
    /// Flat linear address.
    pub addr: u64,
    /// `true` for a write access.
    #[serde(default)]
    pub write: bool,
}

/// Loads a trace file, sorted by submission cycle.
///
/// # Errors
///
/// Returns an [`io::Error`] when the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<TraceEntry>, io::Error> {
    let content = fs::read_to_string(path)?;
    let mut entries: Vec<TraceEntry> = serde_json::from_str(&content)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    entries.sort_by_key(|entry| entry.cycle);
    Ok(entries)
}

/// Generates a synthetic trace when no file is given: a mixed read/write
/// stream striding through the address space so it crosses banks and rows.
pub fn synthetic(count: u64) -> Vec<TraceEntry> {
    (0..count)
        .map(|i| TraceEntry {
            cycle: i * 2,
            addr: i * 64,
            write: i % 3 == 0,
        })
        .collect()
}
