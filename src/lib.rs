// src/lib.rs

pub mod c_api;
pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod validation;

pub use crate::core::engine::{profile, profile_with, Generator};
pub use crate::core::phonology::Separator;
pub use crate::core::tables::Tables;
pub use crate::core::types::{
    Category, Formality, OneOrMany, Paradigm, Person, Polarity, Regularity, Script, Tense,
    VerbProfile,
};
pub use crate::error::{InflectError, Result, TableError};
pub use crate::persistence::ParadigmCache;
