use crate::aggregate::{Aggregation, Aggregator};
use crate::errors::AggregationError;
use crate::export::resolve_export_path;
use crate::reporting::{
    copied_file_message, copied_folder_message, exported_file_message, exported_folder_message,
    failure_message,
};
use crate::selector::FileSelector;
use crate::settings::AggregationSettings;
use crate::sink::{ContentSink, Notifier};
use crate::storage::{FileRef, FolderRef, StorageReader, StorageWriter};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Result of an export: where the file went and what it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: String,
    pub aggregation: Aggregation,
}

/// The four user-facing commands: copy or export, a file or a folder.
///
/// Every outcome, success or rejection, is also reported to the notifier.
pub struct ContentsCopier<'a, S: ?Sized> {
    storage: &'a S,
    settings: &'a AggregationSettings,
    notifier: &'a dyn Notifier,
    timestamp: Option<DateTime<Utc>>,
}

impl<'a, S> ContentsCopier<'a, S>
where
    S: StorageReader + ?Sized,
{
    pub fn new(
        storage: &'a S,
        settings: &'a AggregationSettings,
        notifier: &'a dyn Notifier,
    ) -> Self {
        ContentsCopier {
            storage,
            settings,
            notifier,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// One clock reading per operation, shared by the rendering and the
    /// export file name.
    fn aggregator(&self) -> Aggregator<'a, S> {
        let now = self.timestamp.unwrap_or_else(Utc::now);
        Aggregator::new(self.storage, self.settings).with_timestamp(now)
    }

    fn report<T>(
        &self,
        action: &str,
        result: Result<T, AggregationError>,
    ) -> Result<T, AggregationError> {
        if let Err(e) = &result {
            debug!("{} ended with {}", action, e.code());
            self.notifier.error(&failure_message(action, e));
        }
        result
    }

    pub async fn copy_file(
        &self,
        file: &FileRef,
        sink: &dyn ContentSink,
    ) -> Result<Aggregation, AggregationError> {
        let result = async {
            let aggregation = self.aggregator().aggregate_file(file).await?;
            sink.write(&aggregation.output).await?;
            Ok::<_, AggregationError>(aggregation)
        }
        .await;
        let aggregation = self.report("copy file contents", result)?;
        self.notifier.notify(&copied_file_message(
            &file.name,
            file.size,
            sink.destination(),
        ));
        Ok(aggregation)
    }

    pub async fn copy_folder(
        &self,
        folder: &FolderRef,
        selector: Option<&dyn FileSelector>,
        sink: &dyn ContentSink,
    ) -> Result<Aggregation, AggregationError> {
        let result = async {
            let aggregation = self.aggregator().aggregate_folder(folder, selector).await?;
            sink.write(&aggregation.output).await?;
            Ok::<_, AggregationError>(aggregation)
        }
        .await;
        let aggregation = self.report("copy folder contents", result)?;
        self.notifier.notify(&copied_folder_message(
            aggregation.file_count,
            aggregation.total_size,
            &folder.name,
            sink.destination(),
        ));
        Ok(aggregation)
    }
}

impl<'a, S> ContentsCopier<'a, S>
where
    S: StorageReader + StorageWriter + ?Sized,
{
    async fn write_export(
        &self,
        base_name: &str,
        aggregator: &Aggregator<'a, S>,
        aggregation: Aggregation,
    ) -> Result<ExportOutcome, AggregationError> {
        let path =
            resolve_export_path(self.storage, base_name, self.settings, aggregator.now()).await?;
        self.storage.create_file(&path, &aggregation.output).await?;
        info!("Wrote {} bytes to {}", aggregation.output.len(), path);
        Ok(ExportOutcome { path, aggregation })
    }

    pub async fn export_file(&self, file: &FileRef) -> Result<ExportOutcome, AggregationError> {
        let result = async {
            let aggregator = self.aggregator();
            let aggregation = aggregator.aggregate_file(file).await?;
            self.write_export(&file.name, &aggregator, aggregation).await
        }
        .await;
        let outcome = self.report("export file contents", result)?;
        self.notifier.notify(&exported_file_message(
            &file.name,
            file.size,
            &outcome.path,
        ));
        Ok(outcome)
    }

    pub async fn export_folder(
        &self,
        folder: &FolderRef,
        selector: Option<&dyn FileSelector>,
    ) -> Result<ExportOutcome, AggregationError> {
        let result = async {
            let aggregator = self.aggregator();
            let aggregation = aggregator.aggregate_folder(folder, selector).await?;
            let base_name = format!("{}-contents", folder.name);
            self.write_export(&base_name, &aggregator, aggregation).await
        }
        .await;
        let outcome = self.report("export folder contents", result)?;
        self.notifier.notify(&exported_folder_message(
            outcome.aggregation.file_count,
            outcome.aggregation.total_size,
            &folder.name,
            &outcome.path,
        ));
        Ok(outcome)
    }
}
