use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::AppError;
use crate::models::record::RecordType;
use crate::models::search::SearchHit;
use crate::scope_path;
use crate::services::fs_search;
use crate::services::search_service::validate_year;
use crate::state::AppState;

fn required_year(year: &str) -> Result<&str, AppError> {
    validate_year(Some(year))?
        .ok_or_else(|| AppError::InvalidQuery("Please enter a registration year.".to_string()))
}

/// PDFs directly inside a year folder, in natural order.
pub fn browse_year_folder(
    state: &AppState,
    record_type: RecordType,
    year: &str,
) -> Result<Vec<SearchHit>, AppError> {
    let year = required_year(year)?;
    let root = state.config.root_for(record_type);
    let hits = state.search.files().browse(root, year).inspect_err(|err| {
        warn!(%record_type, year, error = %err, "cannot browse year folder");
    })?;
    info!(%record_type, year, count = hits.len(), "browsed year folder");
    Ok(hits)
}

/// Path of a document picked from a year folder listing. The name must be a
/// bare file name inside that folder.
pub fn resolve_document(
    state: &AppState,
    record_type: RecordType,
    year: &str,
    file_name: &str,
) -> Result<PathBuf, AppError> {
    let year = required_year(year)?;
    if !scope_path::is_plain_segment(file_name) {
        return Err(AppError::InvalidQuery(format!(
            "Not a file name: {file_name}"
        )));
    }

    let path = fs_search::year_folder(state.config.root_for(record_type), year).join(file_name);
    if !path.is_file() {
        warn!(path = %path.display(), "document not found");
        return Err(AppError::LocationNotFound(path));
    }
    Ok(path)
}
