use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::generator::{GenerationStats, OrderGenerator};
use crate::metrics::GeneratorMetrics;
use crate::pipeline::ingestion::to_ndjson;
use crate::pipeline::storage::{ObjectMeta, ObjectStore, PartitionedKey};

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub statistics: GenerationStats,
    pub location: String,
    pub object: ObjectMeta,
}

/// Generates a synthetic batch and stores it under the raw prefix
pub struct GenerateUseCase {
    store: Arc<dyn ObjectStore>,
    generator: OrderGenerator,
    raw_key: PartitionedKey,
}

impl GenerateUseCase {
    pub fn new(store: Arc<dyn ObjectStore>, generator: OrderGenerator, raw_prefix: &str) -> Self {
        Self {
            store,
            generator,
            raw_key: PartitionedKey::raw(raw_prefix),
        }
    }

    pub async fn generate(&mut self, count: usize) -> Result<GenerationReport> {
        self.generate_at(count, Utc::now()).await
    }

    pub async fn generate_at(&mut self, count: usize, now: DateTime<Utc>) -> Result<GenerationReport> {
        let orders = self.generator.generate_batch(count, now);
        let statistics = GenerationStats::from_orders(&orders);
        GeneratorMetrics::record_batch(&statistics);

        let key = self.raw_key.key_at(now);
        let body = to_ndjson(&orders)?;
        let object = self
            .store
            .put(&key, body.into_bytes())
            .await
            .context("writing raw order object")?;
        let location = self.store.location(&key);

        info!(
            orders = statistics.total_orders,
            revenue = statistics.total_revenue,
            "Generated order batch stored at {}",
            location
        );

        Ok(GenerationReport {
            statistics,
            location,
            object,
        })
    }
}
