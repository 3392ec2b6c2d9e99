//! Domain layer for the contract intelligence engine.
//!
//! Contains core models, the error taxonomy, and port traits.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{EngineError, EngineResult};
