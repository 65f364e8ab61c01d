// ── Error log parser ──
//
// Controllers emit a fixed-format CRLF text file:
//
//   line 0     a 14-character label, then the generation timestamp
//   lines 1-3  "Device: ..", "Model: ..", "SoftwareVersion: .."
//   lines 4-5  blank separators
//   line 6..   records, two physical lines each:
//       <Line>\t<Level>\t<TimeStamp>\t<ErrorCode>\t<TCBAddr>\t<PrgCntr>\t<Data1>\t<Data2>
//       \t\t<Error message>
//
// Parsing never fails. Malformed input degrades to the best-effort partial
// result, down to an all-empty log when the header is unreadable.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::model::{ErrorLog, LogRecord};

/// Index of the first record line.
const BODY_START: usize = 6;
/// Width of the fixed label preceding the generation timestamp.
const GENERATED_LABEL_LEN: usize = 14;

/// Parse a raw error-log file into an [`ErrorLog`].
///
/// The returned log always retains the input text in `raw`, even when
/// nothing else could be extracted.
pub fn parse_error_log(text: &str) -> ErrorLog {
    let mut log = ErrorLog {
        raw: text.to_owned(),
        ..ErrorLog::default()
    };

    let lines: Vec<&str> = text.split("\r\n").collect();
    if lines.len() < 4 {
        debug!(lines = lines.len(), "error log file too short to carry a header");
        return log;
    }

    let (Some(device), Some(model), Some(software_version)) = (
        header_value(lines[1]),
        header_value(lines[2]),
        header_value(lines[3]),
    ) else {
        warn!("error log header unreadable, returning empty log");
        return log;
    };

    log.generated = lines[0].get(GENERATED_LABEL_LEN..).unwrap_or_default().to_owned();
    log.device = device;
    log.model = model;
    log.software_version = software_version;

    let mut end = lines.len();
    while end > 0 && lines[end - 1].is_empty() {
        end -= 1;
    }

    // A dangling half record at the end is not reconstructable; drop it.
    let body = lines.get(BODY_START..end).unwrap_or_default();
    for pair in body.chunks_exact(2) {
        if let [values_line, error_line] = pair {
            log.items
                .push(Arc::new(parse_record(&log.device, values_line, error_line)));
        }
    }
    log
}

/// Value of a `Label: value` header line: the text after the first colon,
/// trimmed. `None` when the line has no colon.
fn header_value(line: &str) -> Option<String> {
    line.split_once(':').map(|(_, value)| value.trim().to_owned())
}

fn parse_record(device: &str, values_line: &str, error_line: &str) -> LogRecord {
    let values: Vec<&str> = values_line.split('\t').collect();
    let field = |index: usize| values.get(index).copied().unwrap_or_default().to_owned();

    LogRecord {
        device: device.to_owned(),
        line: values.first().and_then(|v| v.parse().ok()),
        level: field(1),
        timestamp: field(2),
        error_code: field(3),
        tcb_addr: field(4),
        prg_cntr: field(5),
        data1: field(6),
        data2: field(7),
        error: error_line.trim().to_owned(),
    }
}
