//! Persona queries

use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use super::models::{persona_columns, PersonaRow, RankingRow};
use crate::{Error, Result};

/// Most ids bound into a single `IN (...)` lookup
pub const MAX_IDS_PER_QUERY: usize = 500;

/// All personas, ordered by display name
pub async fn load_personas(pool: &SqlitePool) -> Result<Vec<PersonaRow>> {
    let sql = format!(
        "SELECT {} FROM personas ORDER BY display_name ASC, id ASC",
        persona_columns()
    );
    let rows = sqlx::query_as::<_, PersonaRow>(&sql).fetch_all(pool).await?;
    debug!("Loaded {} personas", rows.len());
    Ok(rows)
}

/// One persona by id
pub async fn load_persona(pool: &SqlitePool, id: &str) -> Result<Option<PersonaRow>> {
    let sql = format!("SELECT {} FROM personas WHERE id = ?", persona_columns());
    let row = sqlx::query_as::<_, PersonaRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Personas for a multi-select, in the order the ids were given
///
/// Unknown ids are skipped; duplicates are returned once. More than
/// `MAX_IDS_PER_QUERY` ids is rejected as invalid input.
pub async fn load_personas_by_ids(pool: &SqlitePool, ids: &[String]) -> Result<Vec<PersonaRow>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    if ids.len() > MAX_IDS_PER_QUERY {
        return Err(Error::InvalidInput(format!(
            "{} ids requested, at most {} per lookup",
            ids.len(),
            MAX_IDS_PER_QUERY
        )));
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT {} FROM personas WHERE id IN ({})",
        persona_columns(),
        placeholders
    );
    let mut query = sqlx::query_as::<_, PersonaRow>(&sql);
    for id in ids {
        query = query.bind(id.as_str());
    }
    let mut by_id: HashMap<String, PersonaRow> = query
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| (row.id.clone(), row))
        .collect();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Latest ranking aggregate for a persona
pub async fn load_ranking(pool: &SqlitePool, persona_id: &str) -> Result<Option<RankingRow>> {
    let row = sqlx::query_as::<_, RankingRow>(
        "SELECT persona_id, rank, total, score FROM persona_rankings WHERE persona_id = ?",
    )
    .bind(persona_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
