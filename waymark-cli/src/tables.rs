//! Loading the weight and lookup tables from JSON files.
//!
//! A table that cannot be opened or decoded is replaced by its built-in
//! default; the failure is logged and reported in the plan's metadata.

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use thiserror::Error;
use waymark_core::PlanningTables;

use crate::fs::open_utf8_file;

/// Why a table file was ignored.
#[derive(Debug, Error)]
pub enum TableLoadError {
    /// The file could not be opened.
    #[error("failed to open {table} table at {path:?}: {source}")]
    Open {
        /// Which table.
        table: &'static str,
        /// Path that was opened.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file was not valid JSON of the expected shape.
    #[error("failed to parse {table} table at {path:?}: {source}")]
    Parse {
        /// Which table.
        table: &'static str,
        /// Path that was read.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Optional table file locations; `None` selects the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TablePaths {
    pub(crate) weights: Option<Utf8PathBuf>,
    pub(crate) mappings: Option<Utf8PathBuf>,
    pub(crate) times: Option<Utf8PathBuf>,
    pub(crate) sequences: Option<Utf8PathBuf>,
}

/// Tables ready for planning plus any substitutions that were made.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LoadedTables {
    pub(crate) tables: PlanningTables,
    pub(crate) warnings: Vec<String>,
}

impl TablePaths {
    /// Load every configured table, falling back to defaults on failure.
    pub(crate) fn load(&self) -> LoadedTables {
        let mut warnings = Vec::new();
        let tables = PlanningTables {
            weights: load_or_default(self.weights.as_deref(), "weights", &mut warnings),
            preferences: load_or_default(self.mappings.as_deref(), "mappings", &mut warnings),
            time_windows: load_or_default(self.times.as_deref(), "times", &mut warnings),
            sequence_rules: load_or_default(self.sequences.as_deref(), "sequences", &mut warnings),
        };
        LoadedTables { tables, warnings }
    }
}

fn load_or_default<T>(path: Option<&Utf8Path>, table: &'static str, warnings: &mut Vec<String>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return T::default();
    };
    read_table(path, table).unwrap_or_else(|err| {
        let warning = format!("{err}; using defaults");
        log::warn!("{warning}");
        warnings.push(warning);
        T::default()
    })
}

fn read_table<T: DeserializeOwned>(
    path: &Utf8Path,
    table: &'static str,
) -> Result<T, TableLoadError> {
    let file = open_utf8_file(path).map_err(|source| TableLoadError::Open {
        table,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| TableLoadError::Parse {
        table,
        path: path.to_path_buf(),
        source,
    })
}
