// ── Global log merge ──

use std::sync::Arc;

use crate::model::LogRecord;

/// Fold one device's freshly fetched records into the global aggregate.
///
/// Both inputs are sorted by `(timestamp, device)` and `fresh` holds
/// records from exactly one device. The result keeps every other device's
/// entries in order and replaces that device's previous entries with
/// `fresh`, so a re-fetch supersedes rather than duplicates. On an exact
/// key tie the previously aggregated record comes first.
///
/// An empty `fresh` returns the aggregate unchanged: stale entries persist
/// until their device reports data again.
pub fn merge_records(
    aggregate: &[Arc<LogRecord>],
    fresh: &[Arc<LogRecord>],
) -> Vec<Arc<LogRecord>> {
    let Some(first) = fresh.first() else {
        return aggregate.to_vec();
    };
    let device = first.device.as_str();

    let mut merged = Vec::with_capacity(aggregate.len() + fresh.len());
    let mut kept = aggregate.iter().filter(|r| r.device != device).peekable();
    let mut incoming = fresh.iter().peekable();

    loop {
        let take_kept = match (kept.peek(), incoming.peek()) {
            (Some(k), Some(f)) => k.sort_key() <= f.sort_key(),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_kept { kept.next() } else { incoming.next() };
        if let Some(record) = next {
            merged.push(Arc::clone(record));
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(device: &str, timestamp: &str, error: &str) -> Arc<LogRecord> {
        Arc::new(LogRecord {
            device: device.to_owned(),
            line: None,
            level: "ERROR".to_owned(),
            timestamp: timestamp.to_owned(),
            error_code: String::new(),
            tcb_addr: String::new(),
            prg_cntr: String::new(),
            data1: String::new(),
            data2: String::new(),
            error: error.to_owned(),
        })
    }

    fn keys(records: &[Arc<LogRecord>]) -> Vec<(String, String)> {
        records
            .iter()
            .map(|r| (r.timestamp.clone(), r.device.clone()))
            .collect()
    }

    #[test]
    fn interleaves_by_timestamp_then_device() {
        let aggregate = vec![
            record("B", "2024-01-01 00:00", "b1"),
            record("B", "2024-01-03 00:00", "b2"),
        ];
        let fresh = vec![
            record("A", "2024-01-02 00:00", "a1"),
            record("A", "2024-01-03 00:00", "a2"),
        ];

        let merged = merge_records(&aggregate, &fresh);
        assert_eq!(
            keys(&merged),
            vec![
                ("2024-01-01 00:00".to_owned(), "B".to_owned()),
                ("2024-01-02 00:00".to_owned(), "A".to_owned()),
                ("2024-01-03 00:00".to_owned(), "A".to_owned()),
                ("2024-01-03 00:00".to_owned(), "B".to_owned()),
            ]
        );
    }

    #[test]
    fn refetch_supersedes_previous_entries() {
        let aggregate = vec![
            record("A", "2024-01-01 00:00", "old"),
            record("B", "2024-01-02 00:00", "kept"),
        ];
        let fresh = vec![record("A", "2024-01-05 00:00", "new")];

        let merged = merge_records(&aggregate, &fresh);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].error, "kept");
        assert_eq!(merged[1].error, "new");
    }

    #[test]
    fn merging_the_same_batch_twice_is_idempotent() {
        let fresh = vec![
            record("A", "2024-01-01 00:00", "a1"),
            record("A", "2024-01-02 00:00", "a2"),
        ];
        let once = merge_records(&[], &fresh);
        let twice = merge_records(&once, &fresh);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_fresh_keeps_stale_entries() {
        let aggregate = vec![record("A", "2024-01-01 00:00", "stale")];
        let merged = merge_records(&aggregate, &[]);
        assert_eq!(merged, aggregate);
    }

    #[test]
    fn equal_timestamps_order_by_device() {
        let aggregate = vec![record("B", "2024-01-01 00:00", "held")];
        let fresh = vec![record("A", "2024-01-01 00:00", "incoming")];

        let merged = merge_records(&aggregate, &fresh);
        assert_eq!(merged[0].error, "incoming");
        assert_eq!(merged[1].error, "held");
    }
}
