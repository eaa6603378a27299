//! Registers every phase's metrics and detects naming conflicts early

use crate::metrics::{MetricDoc, PhaseMetrics};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<super::ingest::IngestMetrics>(&mut all_metrics);
    register_phase_metrics::<super::enrichment::EnrichmentMetrics>(&mut all_metrics);
    register_phase_metrics::<super::generator::GeneratorMetrics>(&mut all_metrics);

    info!("Registered {} total metrics across all phases", all_metrics.len());
    log_metrics_summary(&all_metrics);
}

/// Returns the number of metrics that conflicted with an earlier phase
fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, (&'static str, MetricDoc)>) -> usize {
    T::register_metrics();
    collect_phase_docs::<T>(all_metrics)
}

fn collect_phase_docs<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, (&'static str, MetricDoc)>) -> usize {
    let phase_name = T::phase_name();
    let mut conflicts = 0;

    for doc in T::metrics_documentation() {
        if let Some((owner, _)) = all_metrics.get(doc.name) {
            warn!(
                "Metric name conflict: '{}' is defined by both '{}' and '{}'",
                doc.name, owner, phase_name
            );
            conflicts += 1;
        } else {
            all_metrics.insert(doc.name, (phase_name, doc));
        }
    }

    conflicts
}

/// Per-phase listing of the registered metrics, at debug level
fn log_metrics_summary(all_metrics: &HashMap<&'static str, (&'static str, MetricDoc)>) {
    for (phase, names) in group_by_name_phase(all_metrics) {
        debug!("Phase '{}': {} metrics", phase, names.len());
        for name in names {
            debug!("  - {}", name);
        }
    }
}

/// Metric names grouped by the phase segment of the name, both sorted
fn group_by_name_phase(
    all_metrics: &HashMap<&'static str, (&'static str, MetricDoc)>,
) -> BTreeMap<&'static str, Vec<&'static str>> {
    let mut by_phase: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
    for &name in all_metrics.keys() {
        by_phase.entry(extract_phase_from_metric_name(name)).or_default().push(name);
    }
    for names in by_phase.values_mut() {
        names.sort_unstable();
    }
    by_phase
}

/// Phase segment of a metric name (`shopfast_ingest_objects_read_total` -> `ingest`)
pub fn extract_phase_from_metric_name(metric_name: &str) -> &str {
    if let Some(stripped) = metric_name.strip_prefix("shopfast_") {
        if let Some(next_underscore) = stripped.find('_') {
            return &stripped[..next_underscore];
        }
    }
    "unknown"
}
