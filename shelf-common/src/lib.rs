//! # Shelf Common Library
//!
//! Shared code for the Shelf persona analytics services:
//! - Grade tiers (percentile, score and rank to one of nine material tiers)
//! - Persona stat vectors and similarity ranking
//! - Configuration loading
//! - Read-only persona queries

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod grading;
pub mod similarity;

pub use error::{Error, Result};
pub use grading::{Grade, Tier, TierRecord};
pub use similarity::{Attribute, Band, EntityVector, RankedCandidate};
