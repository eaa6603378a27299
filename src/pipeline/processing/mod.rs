// Order enrichment core: validation gate, metric derivers and the batch orchestrator

pub mod derive;
pub mod enrich;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use enrich::{BatchOutcome, BatchStats, DefaultEnricher, Enricher, EnrichmentError};
pub use validate::{DefaultOrderValidator, OrderValidator, ValidationError, ValidationReport};
