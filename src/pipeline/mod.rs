// Order pipeline: ingestion framing, enrichment core, and object storage

pub mod ingestion;
pub mod processing;
pub mod storage;
