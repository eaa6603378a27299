//! Ingest phase metrics: decoding raw NDJSON objects

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct IngestMetrics;

impl IngestMetrics {
    pub fn record_object_parsed(records: usize, malformed: usize, bytes: usize) {
        ::metrics::counter!(phase_metric!(counter, "ingest", "objects_read")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "ingest", "records_parsed")).increment(records as u64);
        ::metrics::counter!(phase_metric!(counter, "ingest", "lines_malformed")).increment(malformed as u64);
        ::metrics::histogram!(phase_metric!(histogram, "ingest", "object_bytes")).record(bytes as f64);
    }

    pub fn record_object_missing() {
        ::metrics::counter!(phase_metric!(counter, "ingest", "objects_missing")).increment(1);
    }
}

impl PhaseMetrics for IngestMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "ingest", "objects_read"));
        let _ = counter!(phase_metric!(counter, "ingest", "records_parsed"));
        let _ = counter!(phase_metric!(counter, "ingest", "lines_malformed"));
        let _ = counter!(phase_metric!(counter, "ingest", "objects_missing"));
        let _ = histogram!(phase_metric!(histogram, "ingest", "object_bytes"));
    }

    fn phase_name() -> &'static str {
        "ingest"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "ingest", "objects_read"),
                metric_type: MetricType::Counter,
                help: "Raw order objects read from storage",
            },
            MetricDoc {
                name: phase_metric!(counter, "ingest", "records_parsed"),
                metric_type: MetricType::Counter,
                help: "Order records decoded from raw objects",
            },
            MetricDoc {
                name: phase_metric!(counter, "ingest", "lines_malformed"),
                metric_type: MetricType::Counter,
                help: "Lines dropped because they were not valid order JSON",
            },
            MetricDoc {
                name: phase_metric!(counter, "ingest", "objects_missing"),
                metric_type: MetricType::Counter,
                help: "Requested raw objects that did not exist",
            },
            MetricDoc {
                name: phase_metric!(histogram, "ingest", "object_bytes"),
                metric_type: MetricType::Histogram,
                help: "Size of raw objects read",
            },
        ]
    }
}
