//! Database models

use serde::{Deserialize, Serialize};

use crate::similarity::{Attribute, EntityVector, ATTRIBUTE_COUNT};
use crate::Result;

/// One row of the `personas` table
///
/// Stat columns are nullable: profiles are filled in incrementally by
/// editors, and a persona with any missing stat cannot be compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersonaRow {
    pub id: String,
    pub display_name: String,
    pub temperance: Option<f64>,
    pub loyalty: Option<f64>,
    pub courage: Option<f64>,
    pub honesty: Option<f64>,
    pub diligence: Option<f64>,
    pub humility: Option<f64>,
    pub compassion: Option<f64>,
    pub justice: Option<f64>,
    pub command: Option<f64>,
    pub charisma: Option<f64>,
    pub insight: Option<f64>,
    pub endurance: Option<f64>,
    pub boldness: Option<f64>,
    pub sociability: Option<f64>,
    pub idealism: Option<f64>,
    pub spontaneity: Option<f64>,
}

impl PersonaRow {
    /// Stat columns in `Attribute` order
    pub fn stats(&self) -> [Option<f64>; ATTRIBUTE_COUNT] {
        [
            self.temperance,
            self.loyalty,
            self.courage,
            self.honesty,
            self.diligence,
            self.humility,
            self.compassion,
            self.justice,
            self.command,
            self.charisma,
            self.insight,
            self.endurance,
            self.boldness,
            self.sociability,
            self.idealism,
            self.spontaneity,
        ]
    }

    /// Validate the row into a comparable stat vector
    pub fn to_entity_vector(&self) -> Result<EntityVector> {
        EntityVector::from_partial(self.id.clone(), self.display_name.clone(), self.stats())
    }
}

/// Comma-separated `personas` column list matching `PersonaRow`
pub fn persona_columns() -> String {
    let mut columns = vec!["id", "display_name"];
    columns.extend(Attribute::all_variants().iter().map(|a| a.column_name()));
    columns.join(", ")
}

/// One row of the `persona_rankings` aggregate table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RankingRow {
    pub persona_id: String,
    /// 1-based competitive rank
    pub rank: i64,
    /// Population size the rank was taken from
    pub total: i64,
    /// Absolute point total, when the persona has one
    pub score: Option<f64>,
}
