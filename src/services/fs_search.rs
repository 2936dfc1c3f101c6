use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AppError;
use crate::models::search::{MatchSource, SearchHit, SearchMode};
use crate::scope_path;
use crate::services::file_store::FileStore;
use crate::services::query_normalizer::FileMatcher;

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

fn to_hit(path: &Path) -> Option<SearchHit> {
    let file_name = path.file_name()?.to_string_lossy().to_string();
    Some(SearchHit {
        file_name,
        file_path: scope_path::normalize_path(path),
        match_source: MatchSource::Filesystem,
    })
}

pub fn year_folder(root: &Path, year: &str) -> PathBuf {
    root.join(year)
}

pub struct FilesystemSearchEngine<F> {
    store: F,
}

impl<F: FileStore> FilesystemSearchEngine<F> {
    pub fn new(store: F) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &F {
        &self.store
    }

    fn existing_folder(&self, root: &Path, year: &str) -> Result<PathBuf, AppError> {
        let folder = year_folder(root, year);
        if !self.store.is_dir(&folder) {
            return Err(AppError::LocationNotFound(folder));
        }
        Ok(folder)
    }

    /// PDFs anywhere under `root/year` whose names satisfy the query, in walk
    /// order. `query` must already be validated.
    pub fn search(
        &self,
        root: &Path,
        year: &str,
        mode: SearchMode,
        query: &str,
    ) -> Result<Vec<SearchHit>, AppError> {
        let folder = self.existing_folder(root, year)?;
        let matcher = FileMatcher::for_query(query, mode);
        debug!(folder = %folder.display(), ?matcher, "walking year folder");

        let hits = self
            .store
            .walk_files(&folder)?
            .iter()
            .filter(|path| is_pdf(path))
            .filter_map(|path| to_hit(path))
            .filter(|hit| matcher.matches(&hit.file_name))
            .collect();
        Ok(hits)
    }

    /// PDFs directly inside `root/year`, naturally sorted, for tagging.
    pub fn browse(&self, root: &Path, year: &str) -> Result<Vec<SearchHit>, AppError> {
        let folder = self.existing_folder(root, year)?;
        let mut hits: Vec<SearchHit> = self
            .store
            .list_files(&folder)?
            .iter()
            .filter(|path| is_pdf(path))
            .filter_map(|path| to_hit(path))
            .collect();
        hits.sort_by(|a, b| natural_cmp(&a.file_name, &b.file_name));
        Ok(hits)
    }
}

/// Orders names the way people read them: digit runs compare by value
/// (`page2` < `page10`), letters case-insensitively. Ties fall back to the
/// raw string so the order is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natord::compare_ignore_case(a, b).then_with(|| a.cmp(b))
}
