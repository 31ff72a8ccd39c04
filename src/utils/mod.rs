//! Utility functions shared by the library and the binary.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration file (JSON, user config directory)
//! - [`progress`] - Progress bars, no-op without the `progress` feature

pub mod app_data;
pub mod progress;

pub use app_data::*;

use anyhow::{bail, Result};

/// Get the number of CPUs available
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Parse a record delimiter: a single byte, or one of the escapes
/// `\n`, `\t`, `\0`.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\\n" => Ok(b'\n'),
        "\\t" => Ok(b'\t'),
        "\\0" => Ok(b'\0'),
        _ if s.len() == 1 => Ok(s.as_bytes()[0]),
        _ => bail!("delimiter must be a single byte or one of \\n, \\t, \\0 (got {:?})", s),
    }
}
