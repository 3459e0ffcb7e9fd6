pub mod actions;
pub mod aggregate;
pub mod collector;
pub mod errors;
pub mod export;
pub mod filter;
pub mod formatter;
pub mod logger;
pub mod reporting;
pub mod selector;
pub mod settings;
pub mod sink;
pub mod storage;
pub mod utils;

pub use actions::{ContentsCopier, ExportOutcome};
pub use aggregate::{Aggregation, Aggregator};
pub use errors::AggregationError;
pub use settings::{AggregationSettings, OutputFormat, SettingsStore};
pub use storage::{Entry, FileRef, FolderRef, LocalVault};
