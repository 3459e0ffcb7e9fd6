use crate::errors::AggregationError;
use crate::settings::AggregationSettings;
use crate::storage::FileRef;
use tracing::trace;

/// True when the file is within the size limit and has a supported extension.
pub fn is_eligible(file: &FileRef, settings: &AggregationSettings) -> bool {
    let eligible = check_eligibility(file, settings).is_ok();
    trace!("Eligibility of {}: {}", file.path, eligible);
    eligible
}

/// Same test as [`is_eligible`], reporting which rule rejected the file.
/// Size is checked before the extension.
pub fn check_eligibility(
    file: &FileRef,
    settings: &AggregationSettings,
) -> Result<(), AggregationError> {
    if file.size > settings.max_file_size_bytes() {
        return Err(AggregationError::FileTooLarge {
            size: file.size,
            max_kb: settings.max_file_size,
        });
    }
    if !settings.supports_extension(&file.extension) {
        return Err(AggregationError::UnsupportedExtension(
            file.extension.to_lowercase(),
        ));
    }
    Ok(())
}

pub fn filter_eligible(files: Vec<FileRef>, settings: &AggregationSettings) -> Vec<FileRef> {
    files
        .into_iter()
        .filter(|file| is_eligible(file, settings))
        .collect()
}
