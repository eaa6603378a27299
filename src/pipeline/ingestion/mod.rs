// Pipeline ingestion: decoding raw order batches

pub mod ndjson;

pub use ndjson::{parse_lines, to_ndjson, MalformedLine, ParsedBatch};
