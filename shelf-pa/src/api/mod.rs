//! HTTP API handlers for shelf-pa

pub mod buildinfo;
pub mod error;
pub mod grade;
pub mod health;
pub mod personas;

pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use grade::{grade_percentile, grade_rank, grade_score, list_tiers};
pub use health::health_routes;
pub use personas::{
    compare_personas, persona_grade, persona_profile, persona_stats, similar_personas,
};
