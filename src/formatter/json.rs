use super::{FileRecord, Formatter};
use crate::errors::AggregationError;
use crate::settings::AggregationSettings;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::trace;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDocument<'a> {
    folder: Option<&'a str>,
    timestamp: String,
    file_count: usize,
    total_size: u64,
    files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    name: &'a str,
    path: &'a str,
    size: u64,
    content: &'a str,
}

pub struct JsonFormatter {}

impl JsonFormatter {
    pub fn new() -> Self {
        JsonFormatter {}
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for JsonFormatter {
    fn format(
        &self,
        records: &[FileRecord],
        folder_label: Option<&str>,
        _settings: &AggregationSettings,
        timestamp: DateTime<Utc>,
    ) -> Result<String, AggregationError> {
        let document = JsonDocument {
            folder: folder_label,
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            file_count: records.len(),
            total_size: records.iter().map(|r| r.size).sum(),
            files: records
                .iter()
                .map(|r| JsonFile {
                    name: &r.name,
                    path: &r.path,
                    size: r.size,
                    content: &r.content,
                })
                .collect(),
        };

        let output = serde_json::to_string_pretty(&document)?;
        trace!("JSON output length: {}", output.len());
        Ok(output)
    }
}
