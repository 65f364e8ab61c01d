// ── Error log records ──

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One diagnostic entry from a controller's error log.
///
/// Field values are kept exactly as the log file printed them. `timestamp`
/// stays a string: the file's `YYYY-MM-DD hh:mm:ss` form orders correctly
/// under plain lexicographic comparison, which the global merge relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Owning controller, stamped from the log header.
    pub device: String,
    /// Line ordinal as printed in the file; `None` when the field does not
    /// parse as a base-10 integer.
    pub line: Option<u32>,
    pub level: String,
    pub timestamp: String,
    pub error_code: String,
    pub tcb_addr: String,
    pub prg_cntr: String,
    pub data1: String,
    pub data2: String,
    /// Free-text message from the record's second physical line.
    pub error: String,
}

impl LogRecord {
    /// Global ordering key: `(timestamp, device)`, both ascending.
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.timestamp, &self.device)
    }
}

/// Parse result for one device's error-log file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorLog {
    /// Generation timestamp from the file's first line.
    pub generated: String,
    /// Device name from the file header.
    pub device: String,
    /// Model from the file header.
    pub model: String,
    /// Software version from the file header.
    pub software_version: String,
    /// Parsed records in file order.
    pub items: Vec<Arc<LogRecord>>,
    /// The file text this log was parsed from, kept for re-inspection.
    pub raw: String,
}
