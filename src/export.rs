use crate::errors::AggregationError;
use crate::settings::AggregationSettings;
use crate::storage::StorageWriter;
use crate::utils::{join_path, normalize_path};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

/// ISO-8601 with colons replaced and the sub-second part dropped.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

pub fn export_timestamp(now: DateTime<Utc>) -> String {
    now.format(EXPORT_TIMESTAMP_FORMAT).to_string()
}

/// Folder exports land in, as a logical path.
pub fn export_folder(settings: &AggregationSettings) -> String {
    normalize_path(&settings.export_location)
}

/// Endless sequence of destination paths for one export: the plain name
/// first, then `-1`, `-2`, ... suffixes. Every candidate is distinct.
#[derive(Debug, Clone)]
pub struct ExportCandidates {
    folder: String,
    stem: String,
    extension: &'static str,
    counter: u64,
}

impl ExportCandidates {
    pub fn new(base_name: &str, settings: &AggregationSettings, now: DateTime<Utc>) -> Self {
        let stem = if settings.include_timestamp {
            format!("{}-{}", base_name, export_timestamp(now))
        } else {
            base_name.to_owned()
        };
        ExportCandidates {
            folder: export_folder(settings),
            stem,
            extension: settings.output_format.extension(),
            counter: 0,
        }
    }

    pub fn next_candidate(&mut self) -> String {
        let file_name = if self.counter == 0 {
            format!("{}.{}", self.stem, self.extension)
        } else {
            format!("{}-{}.{}", self.stem, self.counter, self.extension)
        };
        self.counter += 1;
        join_path(&self.folder, &file_name)
    }
}

impl Iterator for ExportCandidates {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.next_candidate())
    }
}

/// First candidate path `exists` does not claim.
pub fn resolve_with<F>(
    base_name: &str,
    settings: &AggregationSettings,
    now: DateTime<Utc>,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let mut candidates = ExportCandidates::new(base_name, settings, now);
    loop {
        let candidate = candidates.next_candidate();
        if !exists(&candidate) {
            return candidate;
        }
        trace!("Export path taken: {}", candidate);
    }
}

/// Makes sure the export folder exists, then picks a free path in it.
pub async fn resolve_export_path<W>(
    writer: &W,
    base_name: &str,
    settings: &AggregationSettings,
    now: DateTime<Utc>,
) -> Result<String, AggregationError>
where
    W: StorageWriter + ?Sized,
{
    let folder = export_folder(settings);
    if !folder.is_empty() && !writer.exists(&folder).await {
        debug!("Creating export folder: {}", folder);
        writer.create_folder(&folder).await?;
    }

    let mut candidates = ExportCandidates::new(base_name, settings, now);
    loop {
        let candidate = candidates.next_candidate();
        if !writer.exists(&candidate).await {
            debug!("Resolved export path: {}", candidate);
            return Ok(candidate);
        }
        trace!("Export path taken: {}", candidate);
    }
}
