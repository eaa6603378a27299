//! Generator phase metrics

use crate::generator::GenerationStats;
use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct GeneratorMetrics;

impl GeneratorMetrics {
    pub fn record_batch(stats: &GenerationStats) {
        ::metrics::counter!(phase_metric!(counter, "generator", "batches")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "generator", "orders_generated"))
            .increment(stats.total_orders as u64);
        ::metrics::histogram!(phase_metric!(histogram, "generator", "batch_revenue"))
            .record(stats.total_revenue);
    }
}

impl PhaseMetrics for GeneratorMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "generator", "batches"));
        let _ = counter!(phase_metric!(counter, "generator", "orders_generated"));
        let _ = histogram!(phase_metric!(histogram, "generator", "batch_revenue"));
    }

    fn phase_name() -> &'static str {
        "generator"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "generator", "batches"),
                metric_type: MetricType::Counter,
                help: "Synthetic order batches generated",
            },
            MetricDoc {
                name: phase_metric!(counter, "generator", "orders_generated"),
                metric_type: MetricType::Counter,
                help: "Synthetic orders generated",
            },
            MetricDoc {
                name: phase_metric!(histogram, "generator", "batch_revenue"),
                metric_type: MetricType::Histogram,
                help: "Total order value per generated batch",
            },
        ]
    }
}
