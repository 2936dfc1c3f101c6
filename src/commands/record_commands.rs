use tracing::info;

use crate::data::repository;
use crate::error::AppError;
use crate::models::record::{IndexRow, RecordType};
use crate::state::AppState;

pub fn save_record(state: &AppState, row: &IndexRow) -> Result<(), AppError> {
    if row.file_path.trim().is_empty() {
        return Err(AppError::InvalidQuery("A tagged record needs a file path.".to_string()));
    }
    if row.name.trim().is_empty() {
        return Err(AppError::InvalidQuery("A tagged record needs a name.".to_string()));
    }

    let conn = state.index().connect()?;
    repository::upsert_record(&conn, row)?;
    info!(record_type = %row.record_type, path = %row.file_path, "record tagged");
    Ok(())
}

pub fn load_record(
    state: &AppState,
    record_type: RecordType,
    path: &str,
) -> Result<Option<IndexRow>, AppError> {
    let conn = state.index().connect()?;
    repository::get_by_path(&conn, record_type, path)
}

/// Returns whether a row was removed.
pub fn delete_record(
    state: &AppState,
    record_type: RecordType,
    path: &str,
) -> Result<bool, AppError> {
    let conn = state.index().connect()?;
    let removed = repository::delete_by_path(&conn, record_type, path)? > 0;
    if removed {
        info!(%record_type, path, "record untagged");
    }
    Ok(removed)
}
