//! Enrichment phase metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};
use crate::pipeline::processing::BatchStats;

pub struct EnrichmentMetrics;

impl EnrichmentMetrics {
    pub fn record_batch(stats: &BatchStats, duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "enrichment", "batches")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "enrichment", "orders_enriched"))
            .increment(stats.enriched as u64);
        ::metrics::counter!(phase_metric!(counter, "enrichment", "orders_rejected"))
            .increment(stats.rejected as u64);
        ::metrics::histogram!(phase_metric!(histogram, "enrichment", "batch_duration_seconds"))
            .record(duration_secs);
        ::metrics::gauge!(phase_metric!(gauge, "enrichment", "last_batch_size"))
            .set(stats.total_input as f64);
    }
}

impl PhaseMetrics for EnrichmentMetrics {
    fn register_metrics() {
        use metrics::{counter, gauge, histogram};

        let _ = counter!(phase_metric!(counter, "enrichment", "batches"));
        let _ = counter!(phase_metric!(counter, "enrichment", "orders_enriched"));
        let _ = counter!(phase_metric!(counter, "enrichment", "orders_rejected"));
        let _ = histogram!(phase_metric!(histogram, "enrichment", "batch_duration_seconds"));
        let _ = gauge!(phase_metric!(gauge, "enrichment", "last_batch_size"));
    }

    fn phase_name() -> &'static str {
        "enrichment"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "enrichment", "batches"),
                metric_type: MetricType::Counter,
                help: "Order batches run through enrichment",
            },
            MetricDoc {
                name: phase_metric!(counter, "enrichment", "orders_enriched"),
                metric_type: MetricType::Counter,
                help: "Orders that passed validation and were enriched",
            },
            MetricDoc {
                name: phase_metric!(counter, "enrichment", "orders_rejected"),
                metric_type: MetricType::Counter,
                help: "Orders rejected by validation or derivation",
            },
            MetricDoc {
                name: phase_metric!(histogram, "enrichment", "batch_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Wall time to enrich one batch",
            },
            MetricDoc {
                name: phase_metric!(gauge, "enrichment", "last_batch_size"),
                metric_type: MetricType::Gauge,
                help: "Input orders in the most recent batch",
            },
        ]
    }
}
