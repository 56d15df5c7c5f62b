//! Persona stat vectors

use serde::Serialize;

use super::attributes::{Attribute, ATTRIBUTE_COUNT};
use crate::{Error, Result};

/// Read-only 16-stat snapshot of one persona
///
/// Values are stored raw (not display-scaled) in `Attribute` order.
/// Construction checks that every stat is finite and inside its band's
/// range; the similarity functions themselves assume that has happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityVector {
    pub entity_id: String,
    pub display_name: String,
    values: [f64; ATTRIBUTE_COUNT],
}

impl EntityVector {
    /// Build a vector from a complete set of raw stats
    pub fn new(
        entity_id: impl Into<String>,
        display_name: impl Into<String>,
        values: [f64; ATTRIBUTE_COUNT],
    ) -> Result<Self> {
        let entity_id = entity_id.into();
        for attr in Attribute::all_variants() {
            let value = values[attr.position()];
            if !value.is_finite() || !attr.band().contains(value) {
                let (lo, hi) = attr.band().bounds();
                return Err(Error::InvalidInput(format!(
                    "persona {}: {} = {} outside [{}, {}]",
                    entity_id, attr, value, lo, hi
                )));
            }
        }

        Ok(Self {
            entity_id,
            display_name: display_name.into(),
            values,
        })
    }

    /// Build a vector from possibly-missing stats (nullable columns)
    ///
    /// Fails on the first missing stat; a persona without a full profile
    /// cannot be compared.
    pub fn from_partial(
        entity_id: impl Into<String>,
        display_name: impl Into<String>,
        values: [Option<f64>; ATTRIBUTE_COUNT],
    ) -> Result<Self> {
        let entity_id = entity_id.into();
        let mut complete = [0.0; ATTRIBUTE_COUNT];
        for attr in Attribute::all_variants() {
            complete[attr.position()] = values[attr.position()].ok_or_else(|| {
                Error::InvalidInput(format!("persona {}: missing {}", entity_id, attr))
            })?;
        }
        Self::new(entity_id, display_name, complete)
    }

    /// Raw value of one stat
    pub fn get(&self, attribute: Attribute) -> f64 {
        self.values[attribute.position()]
    }

    pub fn values(&self) -> &[f64; ATTRIBUTE_COUNT] {
        &self.values
    }
}
