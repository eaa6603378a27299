use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::domain::RawOrder;
use crate::error::PipelineError;
use crate::metrics::{EnrichmentMetrics, IngestMetrics};
use crate::pipeline::ingestion::{parse_lines, to_ndjson};
use crate::pipeline::processing::DefaultEnricher;
use crate::pipeline::storage::{ObjectMeta, ObjectStore, PartitionedKey};

/// Outcome of processing one raw order object
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    pub source: String,
    /// Orders decoded from the raw object
    pub total_input: usize,
    pub total_processed: usize,
    pub invalid_orders: usize,
    pub malformed_lines: usize,
    pub location: String,
    pub object: ObjectMeta,
}

/// Reads a raw batch, enriches it and writes the processed batch
pub struct ProcessUseCase {
    store: Arc<dyn ObjectStore>,
    enricher: DefaultEnricher,
    processed_key: PartitionedKey,
}

impl ProcessUseCase {
    pub fn new(store: Arc<dyn ObjectStore>, enricher: DefaultEnricher, processed_prefix: &str) -> Self {
        Self {
            store,
            enricher,
            processed_key: PartitionedKey::processed(processed_prefix),
        }
    }

    pub async fn process_key(&self, raw_key: &str) -> Result<ProcessingReport> {
        self.process_key_at(raw_key, Utc::now()).await
    }

    /// Process `raw_key`, partitioning the output by `now`
    pub async fn process_key_at(&self, raw_key: &str, now: DateTime<Utc>) -> Result<ProcessingReport> {
        let span = tracing::info_span!("process_batch", run_id = %Uuid::new_v4(), key = %raw_key);
        async move {
            info!("Processing {}", self.store.location(raw_key));

            let bytes = match self.store.get(raw_key).await {
                Ok(bytes) => bytes,
                Err(e @ PipelineError::ObjectNotFound(_)) => {
                    IngestMetrics::record_object_missing();
                    return Err(e.into());
                }
                Err(e) => return Err(e).context("reading raw order object"),
            };
            let size = bytes.len();
            let content = String::from_utf8(bytes).map_err(PipelineError::from)?;

            let parsed = parse_lines::<RawOrder>(&content);
            IngestMetrics::record_object_parsed(parsed.records.len(), parsed.malformed.len(), size);

            let started = Instant::now();
            let outcome = self.enricher.enrich_batch_at(&parsed.records, now);
            EnrichmentMetrics::record_batch(&outcome.stats, started.elapsed().as_secs_f64());

            info!(
                processed = outcome.stats.enriched,
                invalid = outcome.stats.rejected,
                "Orders processed"
            );
            if !parsed.malformed.is_empty() {
                warn!("{} malformed lines skipped", parsed.malformed.len());
            }

            let output_key = self.processed_key.key_at(now);
            let body = to_ndjson(&outcome.enriched)?;
            let object = self
                .store
                .put(&output_key, body.into_bytes())
                .await
                .context("writing processed order object")?;
            let location = self.store.location(&output_key);
            info!("Processed batch stored at {}", location);

            Ok::<_, anyhow::Error>(ProcessingReport {
                source: self.store.location(raw_key),
                total_input: outcome.stats.total_input,
                total_processed: outcome.stats.enriched,
                invalid_orders: outcome.stats.rejected,
                malformed_lines: parsed.malformed.len(),
                location,
                object,
            })
        }
        .instrument(span)
        .await
    }
}

/// Newest object under `prefix`; partitioned keys sort chronologically
pub async fn latest_key(store: &dyn ObjectStore, prefix: &str) -> Result<Option<String>> {
    let keys = store.list(prefix).await?;
    Ok(keys.into_iter().filter(|k| k.ends_with(".jsonl")).max())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EnrichedOrder;
    use crate::pipeline::ingestion::ParsedBatch;
    use crate::pipeline::processing::test_support::sample_order;
    use crate::pipeline::storage::InMemoryObjectStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 16, 9, 30, 0).unwrap()
    }

    async fn store_with_raw(lines: &[String]) -> Arc<InMemoryObjectStore> {
        let store = Arc::new(InMemoryObjectStore::new("test-bucket"));
        let mut body = lines.join("\n");
        body.push('\n');
        store.put("raw/batch.jsonl", body.into_bytes()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_process_counts_invalid_and_malformed() {
        let mut broken = sample_order("ORD-2");
        broken.subtotal += 5.0;
        let lines = vec![
            serde_json::to_string(&sample_order("ORD-1")).unwrap(),
            serde_json::to_string(&broken).unwrap(),
            "{not json".to_string(),
            serde_json::to_string(&sample_order("ORD-3")).unwrap(),
        ];
        let store = store_with_raw(&lines).await;
        let use_case = ProcessUseCase::new(store.clone(), DefaultEnricher::new(), "processed/");

        let report = use_case.process_key_at("raw/batch.jsonl", now()).await.unwrap();

        assert_eq!(report.total_input, 3);
        assert_eq!(report.total_processed, 2);
        assert_eq!(report.invalid_orders, 1);
        assert_eq!(report.malformed_lines, 1);
        assert_eq!(
            report.location,
            "s3://test-bucket/processed/year=2025/month=03/day=16/processed_20250316_093000.jsonl"
        );

        let written = store.get(&report.object.key).await.unwrap();
        let parsed: ParsedBatch<EnrichedOrder> = parse_lines(&String::from_utf8(written).unwrap());
        let ids: Vec<&str> = parsed.records.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["ORD-1", "ORD-3"]);
        assert!(parsed.malformed.is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_still_writes_output() {
        let store = Arc::new(InMemoryObjectStore::new("test-bucket"));
        store.put("raw/empty.jsonl", Vec::new()).await.unwrap();
        let use_case = ProcessUseCase::new(store.clone(), DefaultEnricher::new(), "processed/");

        let report = use_case.process_key_at("raw/empty.jsonl", now()).await.unwrap();
        assert_eq!(report.total_processed, 0);
        assert_eq!(report.object.size, 0);
    }

    #[tokio::test]
    async fn test_missing_raw_object_is_an_error() {
        let store = Arc::new(InMemoryObjectStore::new("test-bucket"));
        let use_case = ProcessUseCase::new(store, DefaultEnricher::new(), "processed/");

        let err = use_case.process_key_at("raw/missing.jsonl", now()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ObjectNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_latest_key_picks_newest_partition() {
        let store = InMemoryObjectStore::new("b");
        for key in [
            "raw/year=2025/month=03/day=09/orders_20250309_235959.jsonl",
            "raw/year=2025/month=03/day=15/orders_20250315_080000.jsonl",
            "raw/year=2025/month=03/day=15/orders_20250315_070000.jsonl",
        ] {
            store.put(key, Vec::new()).await.unwrap();
        }

        assert_eq!(
            latest_key(&store, "raw/").await.unwrap().as_deref(),
            Some("raw/year=2025/month=03/day=15/orders_20250315_080000.jsonl")
        );
        assert_eq!(latest_key(&store, "processed/").await.unwrap(), None);
    }
}
