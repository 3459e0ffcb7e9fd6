use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("File too large: {size} bytes exceeds {max_kb} KB")]
    FileTooLarge { size: u64, max_kb: u64 },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("No valid files found in folder: {0}")]
    NoValidFiles(String),

    #[error("No files selected")]
    NoFilesSelected,

    #[error("Read failed for {path}: {reason}")]
    ReadFailure { path: String, reason: String },

    #[error("Write failed for {path}: {reason}")]
    WriteFailure { path: String, reason: String },

    #[error("Clipboard write failed: {0}")]
    ClipboardError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("IO Error: {0}")]
    IoError(String),
}

impl AggregationError {
    /// Stable reason code reported alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            AggregationError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AggregationError::UnsupportedExtension(_) => "UNSUPPORTED_EXTENSION",
            AggregationError::NoValidFiles(_) => "NO_VALID_FILES",
            AggregationError::NoFilesSelected => "NO_FILES_SELECTED",
            AggregationError::ReadFailure { .. } => "READ_FAILURE",
            AggregationError::WriteFailure { .. } => "WRITE_FAILURE",
            AggregationError::ClipboardError(_) => "CLIPBOARD_FAILURE",
            AggregationError::ConfigError(_) => "CONFIG_ERROR",
            AggregationError::NotFound(_) => "NOT_FOUND",
            AggregationError::IoError(_) => "IO_ERROR",
        }
    }

    /// Rejections abort one operation but are expected outcomes, not faults.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AggregationError::FileTooLarge { .. }
                | AggregationError::UnsupportedExtension(_)
                | AggregationError::NoValidFiles(_)
                | AggregationError::NoFilesSelected
        )
    }
}

impl From<std::io::Error> for AggregationError {
    fn from(err: std::io::Error) -> Self {
        AggregationError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AggregationError {
    fn from(err: serde_json::Error) -> Self {
        AggregationError::ConfigError(err.to_string())
    }
}

impl From<walkdir::Error> for AggregationError {
    fn from(err: walkdir::Error) -> Self {
        AggregationError::IoError(err.to_string())
    }
}
