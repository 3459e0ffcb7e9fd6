use crate::errors::AggregationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs as async_fs;
use tracing::{debug, info, warn};

pub const DEFAULT_SEPARATOR: &str = "---";
pub const DEFAULT_EXPORT_LOCATION: &str = "Exports";
pub const DEFAULT_MAX_FILE_SIZE_KB: u64 = 1000;
pub const DEFAULT_SELECTION_THRESHOLD: usize = 10;
pub const DEFAULT_FILE_EXTENSIONS: &[&str] = &["md", "txt", "json", "csv", "js", "ts", "py"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Plaintext,
    Json,
    // Unrecognised values fall back to markdown.
    #[default]
    #[serde(other)]
    Markdown,
}

impl OutputFormat {
    /// File extension used when exporting this rendering.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Plaintext => "txt",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Plaintext => "plaintext",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = AggregationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "plaintext" | "text" | "txt" => Ok(OutputFormat::Plaintext),
            "json" => Ok(OutputFormat::Json),
            other => Err(AggregationError::ConfigError(format!(
                "Unknown output format: {}",
                other
            ))),
        }
    }
}

/// User preferences for one aggregation run.
///
/// Persisted as camelCase JSON. Unknown keys are ignored and missing keys take
/// their default, so older settings files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregationSettings {
    pub include_folder_structure: bool,
    pub include_file_names: bool,
    /// Upper bound per file, in KB.
    #[serde(deserialize_with = "non_negative")]
    pub max_file_size: u64,
    pub file_extensions: BTreeSet<String>,
    pub output_format: OutputFormat,
    pub custom_separator: String,
    pub show_selection_modal: bool,
    #[serde(deserialize_with = "non_negative")]
    pub selection_threshold: usize,
    pub export_location: String,
    pub include_timestamp: bool,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        AggregationSettings {
            include_folder_structure: true,
            include_file_names: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE_KB,
            file_extensions: DEFAULT_FILE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_format: OutputFormat::Markdown,
            custom_separator: DEFAULT_SEPARATOR.to_owned(),
            show_selection_modal: true,
            selection_threshold: DEFAULT_SELECTION_THRESHOLD,
            export_location: DEFAULT_EXPORT_LOCATION.to_owned(),
            include_timestamp: true,
        }
    }
}

impl AggregationSettings {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size.saturating_mul(1024)
    }

    pub fn supports_extension(&self, extension: &str) -> bool {
        self.file_extensions.contains(&extension.to_lowercase())
    }

    /// Restores defaults for values that would break the pipeline.
    pub fn normalized(mut self) -> Self {
        if self.max_file_size == 0 {
            warn!("maxFileSize must be positive, using {}", DEFAULT_MAX_FILE_SIZE_KB);
            self.max_file_size = DEFAULT_MAX_FILE_SIZE_KB;
        }
        if self.selection_threshold == 0 {
            warn!(
                "selectionThreshold must be positive, using {}",
                DEFAULT_SELECTION_THRESHOLD
            );
            self.selection_threshold = DEFAULT_SELECTION_THRESHOLD;
        }
        if self.custom_separator.is_empty() {
            self.custom_separator = DEFAULT_SEPARATOR.to_owned();
        }
        if self.export_location.trim().is_empty() {
            self.export_location = DEFAULT_EXPORT_LOCATION.to_owned();
        }
        self.file_extensions = self
            .file_extensions
            .iter()
            .filter_map(|ext| normalize_extension(ext))
            .collect();
        self
    }

    /// Applies one `key = value` change coming from the settings surface.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), AggregationError> {
        debug!("Updating setting {} = {:?}", key, value);
        match key {
            "includeFolderStructure" => self.include_folder_structure = parse_bool(key, value)?,
            "includeFileNames" => self.include_file_names = parse_bool(key, value)?,
            "maxFileSize" => self.max_file_size = parse_positive(key, value)?,
            "fileExtensions" => {
                self.file_extensions = value.split(',').filter_map(normalize_extension).collect()
            }
            "outputFormat" => self.output_format = value.parse()?,
            "customSeparator" => {
                self.custom_separator = if value.is_empty() {
                    DEFAULT_SEPARATOR.to_owned()
                } else {
                    value.to_owned()
                }
            }
            "showSelectionModal" => self.show_selection_modal = parse_bool(key, value)?,
            "selectionThreshold" => self.selection_threshold = parse_positive(key, value)? as usize,
            "exportLocation" => {
                let trimmed = value.trim();
                self.export_location = if trimmed.is_empty() {
                    DEFAULT_EXPORT_LOCATION.to_owned()
                } else {
                    trimmed.to_owned()
                }
            }
            "includeTimestamp" => self.include_timestamp = parse_bool(key, value)?,
            _ => {
                return Err(AggregationError::ConfigError(format!(
                    "Unknown setting: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}

/// Reads a signed count, clamping negatives to 0 so `normalized` can restore
/// the default instead of the whole file failing to load.
fn non_negative<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let value = i64::deserialize(deserializer)?;
    Ok(T::try_from(value.max(0)).unwrap_or_default())
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.').to_lowercase();
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AggregationError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(AggregationError::ConfigError(format!(
            "{} expects true or false, got {:?}",
            key, value
        ))),
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64, AggregationError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AggregationError::ConfigError(format!(
            "{} expects a positive integer, got {:?}",
            key, value
        ))),
    }
}

/// Load-on-start, save-on-change persistence for [`AggregationSettings`].
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SettingsStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<AggregationSettings, AggregationError> {
        if !async_fs::try_exists(&self.path).await? {
            debug!(
                "No settings file at {}, using defaults",
                self.path.display()
            );
            return Ok(AggregationSettings::default());
        }

        let raw = async_fs::read_to_string(&self.path).await?;
        let settings: AggregationSettings = serde_json::from_str(&raw)?;
        info!("Loaded settings from {}", self.path.display());
        Ok(settings.normalized())
    }

    pub async fn save(&self, settings: &AggregationSettings) -> Result<(), AggregationError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(settings)?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| AggregationError::WriteFailure {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
