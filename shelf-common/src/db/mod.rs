//! Database models and read-only persona queries
//!
//! Schema ownership lives with the main application; these queries only
//! read the `personas` and `persona_rankings` tables.

pub mod models;
pub mod personas;

pub use models::*;
pub use personas::*;
