use crate::errors::AggregationError;
use crate::settings::{AggregationSettings, OutputFormat};
use chrono::{DateTime, Utc};
use tracing::debug;

pub mod json;
pub mod markdown;
pub mod plaintext;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use plaintext::{strip_markdown, PlainTextFormatter};

/// Content marker used when a file could not be read during a batch.
pub const READ_ERROR_MARKER: &str = "*Error reading file*";

/// One file's text as it goes into the rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    /// Path relative to the aggregated folder, or the full path for a single file.
    pub path: String,
    pub content: String,
    pub size: u64,
}

impl FileRecord {
    pub fn new(name: &str, path: &str, content: String, size: u64) -> Self {
        FileRecord {
            name: name.to_owned(),
            path: path.to_owned(),
            content,
            size,
        }
    }

    pub fn read_error(name: &str, path: &str) -> Self {
        FileRecord::new(name, path, READ_ERROR_MARKER.to_owned(), 0)
    }
}

pub trait Formatter: Send + Sync {
    fn format(
        &self,
        records: &[FileRecord],
        folder_label: Option<&str>,
        settings: &AggregationSettings,
        timestamp: DateTime<Utc>,
    ) -> Result<String, AggregationError>;
}

pub fn formatter_for(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new()),
        OutputFormat::Plaintext => Box::new(PlainTextFormatter::new()),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}

/// Renders `records` in the format chosen by `settings`. Deterministic for a
/// fixed `timestamp`.
pub fn format_records(
    records: &[FileRecord],
    folder_label: Option<&str>,
    settings: &AggregationSettings,
    timestamp: DateTime<Utc>,
) -> Result<String, AggregationError> {
    let folder_label = folder_label.filter(|label| !label.is_empty());
    debug!(
        "Formatting {} records as {} (folder: {:?})",
        records.len(),
        settings.output_format,
        folder_label
    );
    formatter_for(settings.output_format).format(records, folder_label, settings, timestamp)
}

/// Shared layout of the text renderings: optional folder banner, then each
/// record's optional header and body, with the separator between records.
pub(crate) fn render_sections<H, B>(
    records: &[FileRecord],
    banner: Option<String>,
    separator: &str,
    header: H,
    body: B,
) -> String
where
    H: Fn(&FileRecord) -> Option<String>,
    B: Fn(&FileRecord) -> String,
{
    let mut output = String::new();
    if let Some(banner) = banner {
        output.push_str(&banner);
        output.push_str("\n\n");
    }

    for (index, record) in records.iter().enumerate() {
        if let Some(header) = header(record) {
            output.push_str(&header);
            output.push_str("\n\n");
        }
        output.push_str(&body(record));
        if index + 1 < records.len() {
            output.push_str("\n\n");
            output.push_str(separator);
            output.push_str("\n\n");
        }
    }
    output
}
