//! Record assembly and the clock it is stamped with.

use chrono::{DateTime, Utc};

use crate::MetadataRecord;
use crate::utils::config::TIMESTAMP_FORMAT;

/// Source of "now". Injected so tests can pin `ingested_at`.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `YYYY-MM-DD HH:MM:SS`, sub-second part dropped.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Assemble the persisted record. `column_count` is derived from `header`.
pub fn build_record(
    object_key: &str,
    size_bytes: u64,
    header: Vec<String>,
    data_row_count: u64,
    now: DateTime<Utc>,
) -> MetadataRecord {
    MetadataRecord {
        id: object_key.to_string(),
        ingested_at: format_timestamp(now),
        size_bytes,
        row_count: data_row_count,
        column_count: header.len() as u64,
        column_names: header,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn build_stamps_fixed_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        let clock = FixedClock(now);
        let record = build_record(
            "data/q1 sales.csv",
            29,
            vec!["id".into(), "name".into(), "amount".into()],
            2,
            clock.now(),
        );
        assert_eq!(record.id, "data/q1 sales.csv");
        assert_eq!(record.ingested_at, "2024-03-01 09:05:07");
        assert_eq!(record.size_bytes, 29);
        assert_eq!(record.row_count, 2);
        assert_eq!(record.column_count, 3);
        assert_eq!(record.column_names, vec!["id", "name", "amount"]);
    }

    #[test]
    fn timestamp_drops_subseconds() {
        let ts = Utc
            .with_ymd_and_hms(2023, 12, 31, 23, 59, 59)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(999))
            .unwrap();
        assert_eq!(format_timestamp(ts), "2023-12-31 23:59:59");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let record = build_record("a.csv", 4, vec!["a".into()], 0, now);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ingestedAt"], "2024-01-02 03:04:05");
        assert_eq!(json["columnCount"], 1);
        assert_eq!(json["columnNames"][0], "a");
    }
}
