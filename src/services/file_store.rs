use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::AppError;

/// Read-only view of the document share.
pub trait FileStore {
    fn is_dir(&self, path: &Path) -> bool;

    /// Every file below `dir`, recursively, in native walk order.
    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError>;

    /// Files directly inside `dir`.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError>;
}

impl<F: FileStore + ?Sized> FileStore for &F {
    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        (**self).walk_files(dir)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        (**self).list_files(dir)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    /// Only a failure on `dir` itself is an error. Unreadable entries below
    /// it are skipped so one bad sub-folder does not hide the rest.
    fn collect(walker: WalkDir) -> Result<Vec<PathBuf>, AppError> {
        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    warn!(path = ?err.path(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

impl FileStore for LocalFileStore {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        Self::collect(WalkDir::new(dir).follow_links(true))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        Self::collect(WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true))
    }
}
