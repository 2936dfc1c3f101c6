use std::collections::BTreeMap;

use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::error::AppError;
use crate::models::record::{IndexRow, RecordSchema, RecordType};
use crate::scope_path;

fn record_columns(schema: &RecordSchema) -> Vec<&'static str> {
    let mut columns = vec!["file_path"];
    columns.extend_from_slice(schema.name_columns);
    columns.extend_from_slice(&[
        schema.date_column,
        schema.reg_no_column,
        "page_no",
        "book_no",
        "date_of_reg",
        "late_registration",
        "details",
    ]);
    columns
}

/// Inserts or replaces the row keyed by the canonical form of `file_path`.
pub fn upsert_record(conn: &Connection, row: &IndexRow) -> Result<i64, AppError> {
    let schema = row.record_type.schema();
    let columns = record_columns(schema);

    let file_path = scope_path::normalize(&row.file_path);
    let details = if row.details.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&row.details)?)
    };

    let mut values: Vec<&dyn ToSql> = Vec::with_capacity(columns.len());
    values.push(&file_path);
    values.push(&row.name);
    if schema.name_columns.len() > 1 {
        values.push(&row.spouse_name);
    }
    values.push(&row.record_date);
    values.push(&row.reg_no);
    values.push(&row.page_no);
    values.push(&row.book_no);
    values.push(&row.date_of_reg);
    values.push(&row.late_registration);
    values.push(&details);

    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let updates: Vec<String> = columns[1..]
        .iter()
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();

    let sql = format!(
        "INSERT INTO {table} ({columns}) VALUES ({placeholders})
         ON CONFLICT(file_path) DO UPDATE SET {updates}, tagged_at = CURRENT_TIMESTAMP",
        table = schema.table,
        columns = columns.join(", "),
        placeholders = placeholders.join(", "),
        updates = updates.join(", "),
    );

    conn.execute(&sql, params_from_iter(values))?;
    Ok(conn.last_insert_rowid())
}

fn row_to_record(record_type: RecordType, row: &Row<'_>) -> rusqlite::Result<IndexRow> {
    let schema = record_type.schema();
    let name_count = schema.name_columns.len();
    let spouse_name = if name_count > 1 { row.get(2)? } else { None };
    let base = 1 + name_count;

    let details: Option<String> = row.get(base + 6)?;

    Ok(IndexRow {
        record_type,
        file_path: row.get(0)?,
        name: row.get(1)?,
        spouse_name,
        record_date: row.get(base)?,
        reg_no: row.get(base + 1)?,
        page_no: row.get(base + 2)?,
        book_no: row.get(base + 3)?,
        date_of_reg: row.get(base + 4)?,
        late_registration: row.get(base + 5)?,
        details: details
            .and_then(|d| serde_json::from_str::<BTreeMap<String, String>>(&d).ok())
            .unwrap_or_default(),
    })
}

/// Looks a row up by path, comparing both sides in canonical form.
///
/// Needs `normalize_path` registered on `conn` (see [`super::register_path_function`]).
pub fn get_by_path(
    conn: &Connection,
    record_type: RecordType,
    path: &str,
) -> Result<Option<IndexRow>, AppError> {
    let schema = record_type.schema();
    let sql = format!(
        "SELECT {} FROM {} WHERE normalize_path(file_path) = ?1",
        record_columns(schema).join(", "),
        schema.table
    );

    let mut stmt = conn.prepare(&sql)?;
    let record = stmt
        .query_row(params![scope_path::normalize(path)], |row| {
            row_to_record(record_type, row)
        })
        .optional()?;

    Ok(record)
}

pub fn delete_by_path(
    conn: &Connection,
    record_type: RecordType,
    path: &str,
) -> Result<usize, AppError> {
    let sql = format!(
        "DELETE FROM {} WHERE normalize_path(file_path) = ?1",
        record_type.schema().table
    );
    let count = conn.execute(&sql, params![scope_path::normalize(path)])?;
    Ok(count)
}

/// Runs a single-column `file_path` query. Any row-level failure is an error,
/// not a skipped row.
pub fn query_file_paths(
    conn: &Connection,
    sql: &str,
    params: &[String],
) -> Result<Vec<String>, AppError> {
    let mut stmt = conn.prepare(sql)?;
    let paths = stmt
        .query_map(params_from_iter(params.iter()), |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(paths)
}

// Needed for rusqlite optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::migrations::run_migrations;
    use crate::data::register_path_function;
    use chrono::NaiveDate;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        register_path_function(&conn).unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn sample_birth() -> IndexRow {
        IndexRow {
            record_type: RecordType::Birth,
            file_path: "\\\\server\\MCR\\LIVE BIRTH\\1998\\CRUZ JUAN.pdf".to_string(),
            name: "JUAN DELA CRUZ".to_string(),
            spouse_name: None,
            record_date: NaiveDate::from_ymd_opt(1998, 3, 4),
            reg_no: Some("98-0112".to_string()),
            page_no: Some(12),
            book_no: Some(3),
            date_of_reg: NaiveDate::from_ymd_opt(1998, 3, 20),
            late_registration: false,
            details: BTreeMap::from([
                ("sex".to_string(), "MALE".to_string()),
                ("place_of_birth".to_string(), "TOWN PROPER".to_string()),
            ]),
        }
    }

    fn sample_marriage() -> IndexRow {
        IndexRow {
            record_type: RecordType::Marriage,
            file_path: "D:/MCR/MARRIAGE/2010/santos-reyes.pdf".to_string(),
            name: "PEDRO SANTOS".to_string(),
            spouse_name: Some("MARIA REYES".to_string()),
            record_date: NaiveDate::from_ymd_opt(2010, 6, 12),
            reg_no: Some("2010-044".to_string()),
            page_no: None,
            book_no: None,
            date_of_reg: None,
            late_registration: true,
            details: BTreeMap::new(),
        }
    }

    #[test]
    fn test_record_crud() {
        let conn = setup_db();
        let row = sample_birth();

        let id = upsert_record(&conn, &row).unwrap();
        assert!(id > 0);

        let fetched = get_by_path(&conn, RecordType::Birth, &row.file_path)
            .unwrap()
            .unwrap();
        assert_eq!(fetched.file_path, "//server/MCR/LIVE BIRTH/1998/CRUZ JUAN.pdf");
        assert_eq!(fetched.name, "JUAN DELA CRUZ");
        assert_eq!(fetched.record_date, NaiveDate::from_ymd_opt(1998, 3, 4));
        assert_eq!(fetched.details.get("sex").map(String::as_str), Some("MALE"));

        let count = delete_by_path(&conn, RecordType::Birth, &row.file_path).unwrap();
        assert_eq!(count, 1);
        assert!(get_by_path(&conn, RecordType::Birth, &row.file_path)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_lookup_ignores_separator_style() {
        let conn = setup_db();
        upsert_record(&conn, &sample_birth()).unwrap();

        let fetched = get_by_path(
            &conn,
            RecordType::Birth,
            "//server/MCR/LIVE BIRTH/1998/CRUZ JUAN.pdf",
        )
        .unwrap();
        assert!(fetched.is_some());
    }

    #[test]
    fn test_lookup_matches_rows_stored_with_backslashes() {
        let conn = setup_db();
        conn.execute(
            "INSERT INTO death_index (file_path, name) VALUES (?1, ?2)",
            params!["D:\\MCR\\DEATH\\2001\\x.pdf", "X"],
        )
        .unwrap();

        let fetched = get_by_path(&conn, RecordType::Death, "D:/MCR/DEATH/2001/x.pdf").unwrap();
        assert_eq!(fetched.map(|r| r.name), Some("X".to_string()));
    }

    #[test]
    fn test_upsert_replaces_existing_row() {
        let conn = setup_db();
        let mut row = sample_birth();
        upsert_record(&conn, &row).unwrap();

        row.file_path = row.file_path.replace('\\', "/");
        row.name = "JUAN P. DELA CRUZ".to_string();
        upsert_record(&conn, &row).unwrap();

        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM birth_index", [], |r| r.get(0))
            .unwrap();
        assert_eq!(total, 1);

        let fetched = get_by_path(&conn, RecordType::Birth, &row.file_path)
            .unwrap()
            .unwrap();
        assert_eq!(fetched.name, "JUAN P. DELA CRUZ");
    }

    #[test]
    fn test_marriage_round_trips_both_spouses() {
        let conn = setup_db();
        let row = sample_marriage();
        upsert_record(&conn, &row).unwrap();

        let fetched = get_by_path(&conn, RecordType::Marriage, &row.file_path)
            .unwrap()
            .unwrap();
        assert_eq!(fetched, row);
    }

    #[test]
    fn test_query_file_paths_binds_params() {
        let conn = setup_db();
        upsert_record(&conn, &sample_marriage()).unwrap();

        let paths = query_file_paths(
            &conn,
            "SELECT file_path FROM marriage_index WHERE wife_name LIKE ?1",
            &["%REYES%".to_string()],
        )
        .unwrap();
        assert_eq!(paths, vec!["D:/MCR/MARRIAGE/2010/santos-reyes.pdf".to_string()]);
    }

    #[test]
    fn test_query_file_paths_surfaces_sql_errors() {
        let conn = setup_db();
        let result = query_file_paths(&conn, "SELECT file_path FROM no_such_table", &[]);
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
