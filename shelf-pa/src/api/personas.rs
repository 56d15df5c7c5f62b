//! Persona analytics endpoints
//!
//! Similarity ranking, multi-select comparison, display profiles and
//! population stats. Rows with incomplete stats are skipped as candidates
//! and rejected as the subject of a request.

use std::collections::HashSet;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shelf_common::db::{self, PersonaRow};
use shelf_common::grading::Grade;
use shelf_common::similarity::{
    self, AttributeStats, ComparisonMatrix, DisplayScore, EntityVector,
};
use tracing::{debug, warn};

use super::ApiError;
use crate::AppState;

/// Upper bound on `limit` for similar-persona requests
const MAX_SIMILAR_LIMIT: usize = 100;

/// Upper bound on distinct ids in one comparison request
const MAX_COMPARE_SELECTION: usize = 50;

/// Query parameters for similar personas
#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    /// Number of results; defaults to the configured limit
    pub limit: Option<usize>,
}

/// One similar persona
#[derive(Debug, Serialize)]
pub struct SimilarPersona {
    pub candidate_entity_id: String,
    pub display_name: String,
    pub distance: f64,
    /// Distance rounded to one decimal for display
    pub distance_label: String,
}

/// Similar-persona response
#[derive(Debug, Serialize)]
pub struct SimilarResponse {
    pub reference_entity_id: String,
    /// Comparable candidates before the limit was applied
    pub total_candidates: usize,
    pub limit: usize,
    pub results: Vec<SimilarPersona>,
}

/// GET /api/personas/:id/similar?limit=10
pub async fn similar_personas(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<SimilarQuery>, QueryRejection>,
) -> Result<Json<SimilarResponse>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(state.similar_limit);
    if limit == 0 || limit > MAX_SIMILAR_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_SIMILAR_LIMIT
        )));
    }

    let reference = load_reference(&state, &id).await?;
    let population = comparable(db::load_personas(&state.db).await?);

    let ranked = similarity::rank_by_similarity(&reference, &population);
    let total_candidates = ranked.len();
    debug!(
        "Ranked {} candidates for {} (limit {})",
        total_candidates, id, limit
    );

    let results = ranked
        .into_iter()
        .take(limit)
        .map(|r| SimilarPersona {
            distance_label: similarity::format_distance(r.distance),
            candidate_entity_id: r.candidate_entity_id,
            display_name: r.display_name,
            distance: r.distance,
        })
        .collect();

    Ok(Json(SimilarResponse {
        reference_entity_id: reference.entity_id,
        total_candidates,
        limit,
        results,
    }))
}

/// Multi-select comparison request
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub ids: Vec<String>,
}

/// Comparison response: matrix plus names in matrix order
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub display_names: Vec<String>,
    #[serde(flatten)]
    pub matrix: ComparisonMatrix,
}

/// POST /api/personas/compare
///
/// Body: `{ "ids": ["a", "b", "c"] }`. Duplicate ids are compared once;
/// at most `MAX_COMPARE_SELECTION` distinct ids are accepted.
pub async fn compare_personas(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    let mut seen = HashSet::new();
    let mut ids: Vec<String> = Vec::new();
    for id in request.ids {
        if seen.contains(&id) {
            continue;
        }
        if ids.len() == MAX_COMPARE_SELECTION {
            return Err(ApiError::BadRequest(format!(
                "at most {} personas can be compared at once",
                MAX_COMPARE_SELECTION
            )));
        }
        seen.insert(id.clone());
        ids.push(id);
    }
    if ids.is_empty() {
        return Err(ApiError::BadRequest("ids must not be empty".to_string()));
    }

    let rows = db::load_personas_by_ids(&state.db, &ids).await?;
    if rows.len() != ids.len() {
        let missing: Vec<&str> = ids
            .iter()
            .filter(|id| !rows.iter().any(|r| &r.id == *id))
            .map(|id| id.as_str())
            .collect();
        return Err(ApiError::NotFound(format!(
            "Unknown personas: {}",
            missing.join(", ")
        )));
    }

    let selection = rows
        .iter()
        .map(PersonaRow::to_entity_vector)
        .collect::<shelf_common::Result<Vec<EntityVector>>>()?;

    Ok(Json(CompareResponse {
        display_names: selection.iter().map(|e| e.display_name.clone()).collect(),
        matrix: similarity::compare_selection(&selection),
    }))
}

/// Display profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub entity_id: String,
    pub display_name: String,
    pub scores: Vec<DisplayScore>,
}

/// GET /api/personas/:id/profile
pub async fn persona_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let entity = load_reference(&state, &id).await?;
    let scores = similarity::display_profile(&entity);

    Ok(Json(ProfileResponse {
        entity_id: entity.entity_id,
        display_name: entity.display_name,
        scores,
    }))
}

/// Population stats response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Personas included in the stats
    pub population: usize,
    /// Personas skipped for incomplete stats
    pub skipped: usize,
    pub attributes: Vec<AttributeStats>,
}

/// GET /api/personas/stats
pub async fn persona_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let rows = db::load_personas(&state.db).await?;
    let total = rows.len();
    let population = comparable(rows);

    Ok(Json(StatsResponse {
        population: population.len(),
        skipped: total - population.len(),
        attributes: similarity::attribute_stats(&population),
    }))
}

/// Persona grade response
#[derive(Debug, Serialize)]
pub struct PersonaGradeResponse {
    pub persona_id: String,
    pub rank: i64,
    pub total: i64,
    /// Grade from competitive standing
    pub ranking: Grade,
    /// Grade from the absolute score, when the persona has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Grade>,
}

/// GET /api/personas/:id/grade
pub async fn persona_grade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PersonaGradeResponse>, ApiError> {
    let ranking = db::load_ranking(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No ranking for persona {}", id)))?;

    Ok(Json(PersonaGradeResponse {
        ranking: Grade::from_rank(ranking.rank, ranking.total),
        score: ranking.score.map(Grade::from_score),
        persona_id: ranking.persona_id,
        rank: ranking.rank,
        total: ranking.total,
    }))
}

/// Load one persona and require a complete stat vector
async fn load_reference(state: &AppState, id: &str) -> Result<EntityVector, ApiError> {
    let row = db::load_persona(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Persona not found: {}", id)))?;
    Ok(row.to_entity_vector()?)
}

/// Convert rows to vectors, dropping incomplete ones
fn comparable(rows: Vec<PersonaRow>) -> Vec<EntityVector> {
    rows.iter()
        .filter_map(|row| match row.to_entity_vector() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Skipping persona {}: {}", row.id, e);
                None
            }
        })
        .collect()
}
