//! Error types for the inflector

use crate::core::types::{AuxiliaryRole, Person, Script};
use thiserror::Error;

/// Result type for inflector operations
pub type Result<T> = std::result::Result<T, InflectError>;

/// Errors surfaced to callers of the inflector
#[derive(Debug, Error)]
pub enum InflectError {
    /// A phonemic transcription used a letter outside the inventory
    #[error("the letter \"{letter}\" is not a Persian phonemic letter")]
    InvalidPhonemic { letter: char },

    /// The separator is not a space, U+200C, or the empty string
    #[error("invalid separator {0:?}: use a space, U+200C (ZWNJ), or the empty string")]
    InvalidSeparator(String),

    /// Table data failed to load or validate
    #[error("table error: {0}")]
    Table(#[from] TableError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Paradigm cache could not be encoded or decoded
    #[error("cache error: {0}")]
    Cache(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors in the conjugation or irregular-verb tables. These are detected
/// once, when the tables are frozen, and are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("malformed {table} data: {message}")]
    Parse { table: &'static str, message: String },

    #[error("{table} has no cell for {person:?}")]
    MissingCell { table: String, person: Person },

    #[error("{table} has an empty variant list for {person:?}")]
    EmptyCell { table: String, person: Person },

    /// A prefix surface with no phonology rule behind it
    #[error("no phonology rule for prefix {surface:?} in {script:?} script")]
    UnknownPrefix { surface: String, script: Script },

    #[error("no irregular verb provides the {role:?} auxiliary")]
    MissingAuxiliary { role: AuxiliaryRole },

    #[error("irregular verb {verb} has stem lists that disagree with its dual flags")]
    DualMismatch { verb: String },
}
