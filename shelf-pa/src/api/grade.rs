//! Tier grading endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query},
    Json,
};
use serde::Deserialize;
use shelf_common::grading::{Grade, Tier, TierRecord};

use super::ApiError;

/// Query parameters for rank grading
#[derive(Debug, Deserialize)]
pub struct RankQuery {
    /// 1-based rank (1 = best)
    pub rank: i64,
    /// Population size
    pub total: i64,
}

/// GET /api/tiers
///
/// All nine tier records, lowest first, for legends and badge previews.
pub async fn list_tiers() -> Json<Vec<TierRecord>> {
    Json(Tier::all_variants().iter().map(|t| *t.record()).collect())
}

/// GET /api/grade/percentile/:value
pub async fn grade_percentile(Path(value): Path<String>) -> Result<Json<Grade>, ApiError> {
    let percentile = parse_finite("percentile", &value)?;
    Ok(Json(Grade::from_percentile(percentile)))
}

/// GET /api/grade/score/:value
pub async fn grade_score(Path(value): Path<String>) -> Result<Json<Grade>, ApiError> {
    let score = parse_finite("score", &value)?;
    Ok(Json(Grade::from_score(score)))
}

/// GET /api/grade/rank?rank=3&total=120
///
/// `total <= 0` grades as the bottom tier rather than failing.
pub async fn grade_rank(
    query: Result<Query<RankQuery>, QueryRejection>,
) -> Result<Json<Grade>, ApiError> {
    let Query(query) = query?;
    Ok(Json(Grade::from_rank(query.rank, query.total)))
}

/// Parse a numeric path segment; NaN and infinities are rejected here so
/// they never reach the grading table
fn parse_finite(name: &str, raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid {}: {}", name, raw)))
}
