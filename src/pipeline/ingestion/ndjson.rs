//! Newline-delimited JSON framing for order batches.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;

/// A line that could not be decoded into a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedLine {
    /// 1-based line number within the object
    pub line_number: usize,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct ParsedBatch<T> {
    pub records: Vec<T>,
    pub malformed: Vec<MalformedLine>,
}

/// Decode one record per non-blank line. Malformed lines are logged and
/// collected; they never fail the batch.
pub fn parse_lines<T: DeserializeOwned>(content: &str) -> ParsedBatch<T> {
    let mut records = Vec::new();
    let mut malformed = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                let line_number = idx + 1;
                warn!(line = line_number, error = %e, "Skipping malformed line");
                malformed.push(MalformedLine {
                    line_number,
                    error: e.to_string(),
                });
            }
        }
    }

    ParsedBatch { records, malformed }
}

/// One JSON object per line, each terminated by `\n`
pub fn to_ndjson<T: Serialize>(records: &[T]) -> Result<String> {
    let mut buffer = String::new();
    for record in records {
        buffer.push_str(&serde_json::to_string(record)?);
        buffer.push('\n');
    }
    Ok(buffer)
}
