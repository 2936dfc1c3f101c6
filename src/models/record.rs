use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Birth,
    Death,
    Marriage,
}

/// Table and column wiring for one record type.
#[derive(Debug)]
pub struct RecordSchema {
    pub table: &'static str,
    /// Columns searched in Name mode. Marriage carries both spouses.
    pub name_columns: &'static [&'static str],
    /// Record date: ordering key and Date-mode target.
    pub date_column: &'static str,
    pub reg_no_column: &'static str,
}

const BIRTH_SCHEMA: RecordSchema = RecordSchema {
    table: "birth_index",
    name_columns: &["name"],
    date_column: "date_of_birth",
    reg_no_column: "reg_no",
};

const DEATH_SCHEMA: RecordSchema = RecordSchema {
    table: "death_index",
    name_columns: &["name"],
    date_column: "date_of_death",
    reg_no_column: "reg_no",
};

const MARRIAGE_SCHEMA: RecordSchema = RecordSchema {
    table: "marriage_index",
    name_columns: &["husband_name", "wife_name"],
    date_column: "date_of_marriage",
    reg_no_column: "reg_no",
};

impl RecordType {
    pub const ALL: [RecordType; 3] = [Self::Birth, Self::Death, Self::Marriage];

    pub fn schema(self) -> &'static RecordSchema {
        match self {
            Self::Birth => &BIRTH_SCHEMA,
            Self::Death => &DEATH_SCHEMA,
            Self::Marriage => &MARRIAGE_SCHEMA,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Birth => write!(f, "birth"),
            Self::Death => write!(f, "death"),
            Self::Marriage => write!(f, "marriage"),
        }
    }
}

impl std::str::FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "birth" | "live birth" => Ok(Self::Birth),
            "death" => Ok(Self::Death),
            "marriage" => Ok(Self::Marriage),
            _ => Err(format!("unknown record type: {s}")),
        }
    }
}

/// One tagged document in a record type's index table.
///
/// `name` is the registrant (child, deceased) or, for marriages, the husband;
/// `spouse_name` is only stored for marriages. Type-specific attributes that
/// search never touches (sex, parents, places, cause of death) live in
/// `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub record_type: RecordType,
    pub file_path: String,
    pub name: String,
    #[serde(default)]
    pub spouse_name: Option<String>,
    #[serde(default)]
    pub record_date: Option<NaiveDate>,
    #[serde(default)]
    pub reg_no: Option<String>,
    #[serde(default)]
    pub page_no: Option<i64>,
    #[serde(default)]
    pub book_no: Option<i64>,
    #[serde(default)]
    pub date_of_reg: Option<NaiveDate>,
    #[serde(default)]
    pub late_registration: bool,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}
