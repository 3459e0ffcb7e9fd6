use super::{render_sections, FileRecord, Formatter};
use crate::errors::AggregationError;
use crate::settings::AggregationSettings;
use chrono::{DateTime, Utc};
use tracing::trace;

pub struct MarkdownFormatter {}

impl MarkdownFormatter {
    pub fn new() -> Self {
        MarkdownFormatter {}
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for MarkdownFormatter {
    fn format(
        &self,
        records: &[FileRecord],
        folder_label: Option<&str>,
        settings: &AggregationSettings,
        _timestamp: DateTime<Utc>,
    ) -> Result<String, AggregationError> {
        let banner = folder_label
            .filter(|_| settings.include_folder_structure)
            .map(|label| format!("# Folder: {}", label));
        // File headings sit one level below the folder banner.
        let heading = if folder_label.is_some() { "##" } else { "#" };

        let output = render_sections(
            records,
            banner,
            &settings.custom_separator,
            |record| {
                settings
                    .include_file_names
                    .then(|| format!("{} {}", heading, record.path))
            },
            |record| record.content.clone(),
        );
        trace!("Markdown output length: {}", output.len());
        Ok(output)
    }
}
