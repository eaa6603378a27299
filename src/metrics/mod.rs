//! Metrics for the order pipeline.
//!
//! Each pipeline phase owns a submodule with its metric names, recording
//! helpers and documentation. Calls go through the `metrics` facade and are
//! no-ops until a recorder is installed.

pub mod enrichment;
pub mod generator;
pub mod ingest;
pub mod registry;

pub use enrichment::EnrichmentMetrics;
pub use generator::GeneratorMetrics;
pub use ingest::IngestMetrics;

use std::sync::Once;
use tracing::{info, warn};

use crate::constants::METRICS_ADDR_ENV;

static INIT: Once = Once::new();

/// Install the Prometheus exporter when `SHOPFAST_METRICS_ADDR` is set.
///
/// Idempotent. Must be called from within a tokio runtime because the
/// exporter serves `/metrics` on a background task.
pub fn init_metrics() {
    INIT.call_once(|| {
        let Ok(addr_str) = std::env::var(METRICS_ADDR_ENV) else {
            info!("{} not set, metrics exporter disabled", METRICS_ADDR_ENV);
            return;
        };

        let addr = match addr_str.parse::<std::net::SocketAddr>() {
            Ok(addr) => addr,
            Err(e) => {
                warn!("Invalid metrics addr '{}': {}, exporter disabled", addr_str, e);
                return;
            }
        };

        match metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
        {
            Ok(()) => {
                info!("Prometheus exporter listening at http://{}/metrics", addr);
                registry::register_all_metrics();
            }
            Err(e) => warn!("Failed to install Prometheus exporter: {}", e),
        }
    });
}

/// Implemented by each phase's metrics collection
pub trait PhaseMetrics {
    /// Pre-register every metric so it appears before first use
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

/// Builds metric names as `shopfast_{phase}_{name}` with a `_total` suffix
/// for counters
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("shopfast_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("shopfast_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("shopfast_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
