//! Configuration: where the index database lives and where each record
//! type's year folders are stored.
//!
//! Lookup order:
//! 1. an explicit path passed by the caller (must exist)
//! 2. `$CIVREG_CONFIG`
//! 3. `config.json` in the platform config directory
//! 4. built-in defaults

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::record::RecordType;

const CONFIG_FILENAME: &str = "config.json";
const DATABASE_FILENAME: &str = "registry.db";

const CONFIG_ENV: &str = "CIVREG_CONFIG";
const DATABASE_ENV: &str = "CIVREG_DATABASE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordRoots {
    pub birth: PathBuf,
    pub death: PathBuf,
    pub marriage: PathBuf,
}

impl Default for RecordRoots {
    fn default() -> Self {
        Self {
            birth: PathBuf::from(r"\\server\MCR\LIVE BIRTH"),
            death: PathBuf::from(r"\\server\MCR\DEATH"),
            marriage: PathBuf::from(r"\\server\MCR\MARRIAGE"),
        }
    }
}

impl RecordRoots {
    pub fn root_for(&self, record_type: RecordType) -> &Path {
        match record_type {
            RecordType::Birth => &self.birth,
            RecordType::Death => &self.death,
            RecordType::Marriage => &self.marriage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub roots: RecordRoots,
    /// Turn on SQLite's `case_sensitive_like`, so name search has to fall
    /// back to case variants. Mirrors servers whose LIKE is case-sensitive.
    pub case_sensitive_like: bool,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_data_dir().join(DATABASE_FILENAME),
            roots: RecordRoots::default(),
            case_sensitive_like: false,
            log_filter: "warn".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "civreg")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

impl AppConfig {
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match std::env::var_os(CONFIG_ENV) {
                Some(path) => Self::from_file(Path::new(&path))?,
                None => match default_config_path().filter(|p| p.is_file()) {
                    Some(path) => Self::from_file(&path)?,
                    None => Self::default(),
                },
            },
        };

        if let Some(db) = std::env::var_os(DATABASE_ENV).filter(|v| !v.is_empty()) {
            config.database_path = PathBuf::from(db);
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        if !path.is_file() {
            return Err(AppError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn root_for(&self, record_type: RecordType) -> &Path {
        self.roots.root_for(record_type)
    }
}
