// Application use cases wiring the enrichment core to storage

pub mod generate_use_case;
pub mod process_use_case;

pub use generate_use_case::{GenerateUseCase, GenerationReport};
pub use process_use_case::{latest_key, ProcessUseCase, ProcessingReport};
