use chrono::{DateTime, Utc};

/// Builds Hive-style date-partitioned keys:
/// `{prefix}year=YYYY/month=MM/day=DD/{stem}_YYYYmmdd_HHMMSS.jsonl`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedKey {
    prefix: String,
    stem: String,
}

impl PartitionedKey {
    pub fn new(prefix: &str, stem: &str) -> Self {
        let mut prefix = prefix.trim_start_matches('/').to_string();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self {
            prefix,
            stem: stem.to_string(),
        }
    }

    /// Key for raw order batches
    pub fn raw(prefix: &str) -> Self {
        Self::new(prefix, "orders")
    }

    /// Key for enriched order batches
    pub fn processed(prefix: &str) -> Self {
        Self::new(prefix, "processed")
    }

    pub fn key_at(&self, at: DateTime<Utc>) -> String {
        format!(
            "{}{}/{}_{}.jsonl",
            self.prefix,
            at.format("year=%Y/month=%m/day=%d"),
            self.stem,
            at.format("%Y%m%d_%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_keys_are_partitioned_by_utc_date() {
        let at = Utc.with_ymd_and_hms(2025, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(
            PartitionedKey::raw("raw/").key_at(at),
            "raw/year=2025/month=03/day=05/orders_20250305_070809.jsonl"
        );
        assert_eq!(
            PartitionedKey::processed("processed").key_at(at),
            "processed/year=2025/month=03/day=05/processed_20250305_070809.jsonl"
        );
    }

    #[test]
    fn test_empty_prefix() {
        let at = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            PartitionedKey::new("", "orders").key_at(at),
            "year=2025/month=12/day=31/orders_20251231_235959.jsonl"
        );
    }
}
