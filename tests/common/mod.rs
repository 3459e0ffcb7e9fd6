#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use copy_contents::errors::AggregationError;
use copy_contents::selector::FileSelector;
use copy_contents::sink::{ContentSink, Notifier};
use copy_contents::storage::{Entry, FileRef, FolderRef, StorageReader, StorageWriter};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
}

pub fn file(path: &str, size: u64) -> Entry {
    Entry::File(FileRef::new(path, size))
}

pub fn folder(path: &str, children: Vec<Entry>) -> Entry {
    Entry::Folder(folder_ref(path, children))
}

pub fn folder_ref(path: &str, children: Vec<Entry>) -> FolderRef {
    let name = path.rsplit('/').next().unwrap_or(path);
    FolderRef::new(name, path).with_children(children)
}

/// Vault held in memory. Files listed as unreadable fail on read.
#[derive(Default)]
pub struct MemoryVault {
    files: Mutex<BTreeMap<String, String>>,
    folders: Mutex<BTreeSet<String>>,
    unreadable: BTreeSet<String>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_owned(), content.to_owned());
        self
    }

    pub fn with_folder(self, path: &str) -> Self {
        self.folders.lock().unwrap().insert(path.to_owned());
        self
    }

    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(path.to_owned());
        self
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn has_folder(&self, path: &str) -> bool {
        self.folders.lock().unwrap().contains(path)
    }

    /// `FileRef` for a stored file, sized by its content.
    pub fn file_ref(&self, path: &str) -> FileRef {
        let size = self.content(path).map(|c| c.len() as u64).unwrap_or(0);
        FileRef::new(path, size)
    }
}

#[async_trait]
impl StorageReader for MemoryVault {
    async fn read(&self, file: &FileRef) -> Result<String, AggregationError> {
        if self.unreadable.contains(&file.path) {
            return Err(AggregationError::ReadFailure {
                path: file.path.clone(),
                reason: "permission denied".to_owned(),
            });
        }
        self.content(&file.path)
            .ok_or_else(|| AggregationError::ReadFailure {
                path: file.path.clone(),
                reason: "missing".to_owned(),
            })
    }
}

#[async_trait]
impl StorageWriter for MemoryVault {
    async fn exists(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.has_folder(path)
    }

    async fn create_folder(&self, path: &str) -> Result<(), AggregationError> {
        self.folders.lock().unwrap().insert(path.to_owned());
        Ok(())
    }

    async fn create_file(&self, path: &str, content: &str) -> Result<(), AggregationError> {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(AggregationError::WriteFailure {
                path: path.to_owned(),
                reason: "already exists".to_owned(),
            });
        }
        files.insert(path.to_owned(), content.to_owned());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub writes: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSink for RecordingSink {
    async fn write(&self, text: &str) -> Result<(), AggregationError> {
        self.writes.lock().unwrap().push(text.to_owned());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_owned());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_owned());
    }
}

/// Answers with the listed paths, in the listed order, and remembers how it
/// was called.
pub struct ScriptedSelector {
    answer: Vec<String>,
    pub offered: Mutex<Vec<Vec<String>>>,
}

impl ScriptedSelector {
    pub fn answering(paths: &[&str]) -> Self {
        ScriptedSelector {
            answer: paths.iter().map(|p| p.to_string()).collect(),
            offered: Mutex::new(Vec::new()),
        }
    }

    pub fn cancelling() -> Self {
        Self::answering(&[])
    }

    pub fn calls(&self) -> usize {
        self.offered.lock().unwrap().len()
    }
}

#[async_trait]
impl FileSelector for ScriptedSelector {
    async fn select(&self, files: Vec<FileRef>) -> Vec<FileRef> {
        self.offered
            .lock()
            .unwrap()
            .push(files.iter().map(|f| f.path.clone()).collect());
        self.answer
            .iter()
            .filter_map(|path| files.iter().find(|f| &f.path == path).cloned())
            .collect()
    }
}
