use crate::collector::collect;
use crate::errors::AggregationError;
use crate::filter::{check_eligibility, filter_eligible};
use crate::formatter::{format_records, FileRecord};
use crate::selector::FileSelector;
use crate::settings::AggregationSettings;
use crate::storage::{FileRef, FolderRef, StorageReader};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// A finished rendering plus what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub output: String,
    pub file_count: usize,
    /// Sum of the selected files' sizes as reported by storage, before reading.
    pub total_size: u64,
    pub folder: Option<String>,
}

/// Runs the collect, filter, select, read, format pipeline over one storage.
pub struct Aggregator<'a, S: ?Sized> {
    storage: &'a S,
    settings: &'a AggregationSettings,
    timestamp: Option<DateTime<Utc>>,
}

impl<'a, S> Aggregator<'a, S>
where
    S: StorageReader + ?Sized,
{
    pub fn new(storage: &'a S, settings: &'a AggregationSettings) -> Self {
        Aggregator {
            storage,
            settings,
            timestamp: None,
        }
    }

    /// Pins the generation time, which otherwise is the moment of formatting.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn settings(&self) -> &AggregationSettings {
        self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or_else(Utc::now)
    }

    pub async fn aggregate_file(&self, file: &FileRef) -> Result<Aggregation, AggregationError> {
        check_eligibility(file, self.settings)?;

        debug!("Reading single file: {}", file.path);
        let content = self.storage.read(file).await?;
        let records = [FileRecord::new(&file.name, &file.path, content, file.size)];
        let output = format_records(&records, None, self.settings, self.now())?;

        Ok(Aggregation {
            output,
            file_count: 1,
            total_size: file.size,
            folder: None,
        })
    }

    /// Aggregates every eligible file under `folder`.
    ///
    /// With the selection prompt enabled and at least `selectionThreshold`
    /// candidates, `selector` decides which files go in; an empty answer
    /// aborts with [`AggregationError::NoFilesSelected`]. A file that fails to
    /// read becomes a placeholder record instead of failing the batch.
    pub async fn aggregate_folder(
        &self,
        folder: &FolderRef,
        selector: Option<&dyn FileSelector>,
    ) -> Result<Aggregation, AggregationError> {
        let candidates = filter_eligible(collect(folder), self.settings);
        if candidates.is_empty() {
            return Err(AggregationError::NoValidFiles(folder.name.clone()));
        }
        debug!(
            "{} eligible files in '{}'",
            candidates.len(),
            folder.name
        );

        let selected = match selector {
            Some(selector) if self.needs_selection(candidates.len()) => {
                info!("Asking for a selection among {} files", candidates.len());
                let chosen = selector.select(candidates).await;
                if chosen.is_empty() {
                    return Err(AggregationError::NoFilesSelected);
                }
                chosen
            }
            _ => candidates,
        };

        let total_size = selected.iter().map(|f| f.size).sum();
        let mut records = Vec::with_capacity(selected.len());
        for file in &selected {
            let path = relative_path(&folder.path, file);
            match self.storage.read(file).await {
                Ok(content) => records.push(FileRecord::new(&file.name, &path, content, file.size)),
                Err(e) => {
                    warn!("Failed to read file {}: {}", file.path, e);
                    records.push(FileRecord::read_error(&file.name, &path));
                }
            }
        }

        let output = format_records(&records, Some(&folder.name), self.settings, self.now())?;
        Ok(Aggregation {
            output,
            file_count: selected.len(),
            total_size,
            folder: Some(folder.name.clone()),
        })
    }

    pub fn needs_selection(&self, candidate_count: usize) -> bool {
        self.settings.show_selection_modal && candidate_count >= self.settings.selection_threshold
    }
}

/// Path of `file` relative to the aggregated root. The root's own path and
/// the following separator are removed; a file outside the root falls back to
/// its bare name.
pub fn relative_path(root_path: &str, file: &FileRef) -> String {
    let root = root_path.trim_matches('/');
    if root.is_empty() {
        return file.path.clone();
    }
    match file
        .path
        .strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('/'))
    {
        Some(rest) if !rest.is_empty() => rest.to_owned(),
        _ => file.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_root_prefix_only() {
        let file = FileRef::new("Projects/alpha/notes/todo.md", 10);
        assert_eq!(relative_path("Projects/alpha", &file), "notes/todo.md");
        assert_eq!(relative_path("Projects", &file), "alpha/notes/todo.md");
    }

    #[test]
    fn vault_root_keeps_full_path() {
        let file = FileRef::new("a/b.md", 1);
        assert_eq!(relative_path("", &file), "a/b.md");
    }

    #[test]
    fn sibling_prefix_is_not_stripped() {
        let file = FileRef::new("Projects-old/a.md", 1);
        assert_eq!(relative_path("Projects", &file), "a.md");
    }
}
