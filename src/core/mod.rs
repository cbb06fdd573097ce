// File: src/core/mod.rs
pub mod builder;
pub mod engine;
pub mod phonology;
pub mod stems;
pub mod tables;
pub mod types;
