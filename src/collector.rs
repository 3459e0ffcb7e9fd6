use crate::storage::{Entry, FileRef, FolderRef};
use tracing::debug;

/// Every file beneath `folder`, depth first, in child order.
pub fn collect(folder: &FolderRef) -> Vec<FileRef> {
    let mut files = Vec::new();
    collect_into(folder, &mut files);
    debug!("Collected {} files under '{}'", files.len(), folder.path);
    files
}

fn collect_into(folder: &FolderRef, files: &mut Vec<FileRef>) {
    for child in &folder.children {
        match child {
            Entry::File(file) => files.push(file.clone()),
            Entry::Folder(sub) => collect_into(sub, files),
        }
    }
}
