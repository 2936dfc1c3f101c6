pub mod migrations;
pub mod repository;
pub mod sqlite_index;

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use crate::scope_path;

/// Exposes `normalize_path(text)` to SQL so stored paths can be compared in
/// canonical form whichever separator they were written with.
pub fn register_path_function(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "normalize_path",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let path: Option<String> = ctx.get(0)?;
            Ok(path.map(|p| scope_path::normalize(&p)))
        },
    )
}
