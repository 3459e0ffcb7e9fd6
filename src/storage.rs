use crate::errors::AggregationError;
use crate::utils::{extension_of, file_name, normalize_path};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// A file entry as the storage layer reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    /// Full logical path, slash-separated, relative to the vault root.
    pub path: String,
    pub size: u64,
    /// Lowercased, without the dot.
    pub extension: String,
}

impl FileRef {
    pub fn new(path: &str, size: u64) -> Self {
        let path = normalize_path(path);
        let name = file_name(&path).to_owned();
        let extension = extension_of(&name);
        FileRef {
            name,
            path,
            size,
            extension,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef {
    pub name: String,
    /// Logical path; `""` for the vault root.
    pub path: String,
    pub children: Vec<Entry>,
}

impl FolderRef {
    pub fn new(name: &str, path: &str) -> Self {
        FolderRef {
            name: name.to_owned(),
            path: normalize_path(path),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Entry>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(FileRef),
    Folder(FolderRef),
}

#[async_trait]
pub trait StorageReader: Send + Sync {
    async fn read(&self, file: &FileRef) -> Result<String, AggregationError>;
}

#[async_trait]
pub trait StorageWriter: Send + Sync {
    async fn exists(&self, path: &str) -> bool;
    async fn create_folder(&self, path: &str) -> Result<(), AggregationError>;
    /// Creates a new file; fails if something already lives at `path`.
    async fn create_file(&self, path: &str, content: &str) -> Result<(), AggregationError>;
}

/// A directory on disk acting as the vault. Logical paths are relative to it.
#[derive(Debug, Clone)]
pub struct LocalVault {
    root: PathBuf,
}

impl LocalVault {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        LocalVault {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, logical: &str) -> PathBuf {
        let logical = normalize_path(logical);
        if logical.is_empty() {
            self.root.clone()
        } else {
            self.root.join(logical)
        }
    }

    fn logical_path(&self, absolute: &Path) -> String {
        let relative = absolute.strip_prefix(&self.root).unwrap_or(absolute);
        relative
            .iter()
            .map(|c| c.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn root_label(&self) -> String {
        self.root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "vault".to_owned())
    }

    /// Looks up a single entry, taking a snapshot of the subtree for folders.
    pub fn entry(&self, logical: &str) -> Result<Entry, AggregationError> {
        let absolute = self.resolve(logical);
        let metadata = std::fs::metadata(&absolute)
            .map_err(|_| AggregationError::NotFound(normalize_path(logical)))?;
        if metadata.is_dir() {
            Ok(Entry::Folder(self.folder(logical)?))
        } else {
            Ok(Entry::File(FileRef::new(logical, metadata.len())))
        }
    }

    /// Snapshot of a folder tree. Children are sorted by file name and hidden
    /// entries (leading `.`) are skipped, as the vault's config lives there.
    pub fn folder(&self, logical: &str) -> Result<FolderRef, AggregationError> {
        let logical = normalize_path(logical);
        let absolute = self.resolve(&logical);
        if !absolute.is_dir() {
            return Err(AggregationError::NotFound(logical));
        }
        debug!("Snapshotting folder: {}", absolute.display());

        let root_name = if logical.is_empty() {
            self.root_label()
        } else {
            file_name(&logical).to_owned()
        };
        let mut stack = vec![FolderRef::new(&root_name, &logical)];

        for entry in WalkDir::new(&absolute)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry?;
            while stack.len() > entry.depth() {
                attach_top(&mut stack);
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let path = self.logical_path(entry.path());

            if entry.file_type().is_dir() {
                trace!("Entering folder: {}", path);
                stack.push(FolderRef::new(&name, &path));
            } else if entry.file_type().is_file() {
                let size = entry.metadata()?.len();
                trace!("Found file: {} ({} bytes)", path, size);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Entry::File(FileRef::new(&path, size)));
                }
            }
        }

        while stack.len() > 1 {
            attach_top(&mut stack);
        }
        stack
            .pop()
            .ok_or_else(|| AggregationError::NotFound(logical.clone()))
    }
}

fn attach_top(stack: &mut Vec<FolderRef>) {
    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(Entry::Folder(done));
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

#[async_trait]
impl StorageReader for LocalVault {
    async fn read(&self, file: &FileRef) -> Result<String, AggregationError> {
        async_fs::read_to_string(self.resolve(&file.path))
            .await
            .map_err(|e| AggregationError::ReadFailure {
                path: file.path.clone(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl StorageWriter for LocalVault {
    async fn exists(&self, path: &str) -> bool {
        async_fs::try_exists(self.resolve(path))
            .await
            .unwrap_or(false)
    }

    async fn create_folder(&self, path: &str) -> Result<(), AggregationError> {
        async_fs::create_dir_all(self.resolve(path))
            .await
            .map_err(|e| AggregationError::WriteFailure {
                path: path.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn create_file(&self, path: &str, content: &str) -> Result<(), AggregationError> {
        let write_failure = |e: std::io::Error| AggregationError::WriteFailure {
            path: path.to_owned(),
            reason: e.to_string(),
        };
        let mut file = async_fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.resolve(path))
            .await
            .map_err(write_failure)?;
        file.write_all(content.as_bytes())
            .await
            .map_err(write_failure)?;
        file.flush().await.map_err(write_failure)?;
        debug!("Created file {} ({} bytes)", path, content.len());
        Ok(())
    }
}
