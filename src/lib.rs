pub mod app;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod generator;
pub mod logging;
pub mod metrics;
pub mod pipeline;

pub use domain::{EnrichedOrder, LineItem, OrderStatus, RawOrder};
pub use pipeline::processing::{BatchOutcome, BatchStats, DefaultEnricher, Enricher};
