//! Persona stat attributes and their bands

use serde::{Deserialize, Serialize};

/// Number of stats in a persona vector (8 virtues + 4 abilities + 4 tendencies)
pub const ATTRIBUTE_COUNT: usize = 16;

/// Semantic grouping of persona stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Eight character virtues, each in [0, 10]
    Virtue,
    /// Four abilities, each in [0, 10]
    Ability,
    /// Four bipolar tendency axes, each in [-5, 5]
    Tendency,
}

impl Band {
    /// Inclusive native range of attributes in this band
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Band::Virtue | Band::Ability => (0.0, 10.0),
            Band::Tendency => (-5.0, 5.0),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let (lo, hi) = self.bounds();
        (lo..=hi).contains(&value)
    }

    /// Attributes belonging to this band, in vector order
    pub fn attributes(&self) -> &'static [Attribute] {
        let all = Attribute::all_variants();
        match self {
            Band::Virtue => &all[0..8],
            Band::Ability => &all[8..12],
            Band::Tendency => &all[12..16],
        }
    }
}

/// One of the sixteen persona stats, declared in vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Temperance,
    Loyalty,
    Courage,
    Honesty,
    Diligence,
    Humility,
    Compassion,
    Justice,

    Command,
    Charisma,
    Insight,
    Endurance,

    /// cautious (-5) to bold (+5)
    Boldness,
    /// reserved (-5) to outgoing (+5)
    Sociability,
    /// pragmatic (-5) to idealistic (+5)
    Idealism,
    /// planned (-5) to spontaneous (+5)
    Spontaneity,
}

impl Attribute {
    /// Position of this attribute inside an `EntityVector`
    pub fn position(&self) -> usize {
        *self as usize
    }

    pub fn band(&self) -> Band {
        match self.position() {
            0..=7 => Band::Virtue,
            8..=11 => Band::Ability,
            _ => Band::Tendency,
        }
    }

    /// All attributes in vector order
    pub fn all_variants() -> &'static [Attribute; ATTRIBUTE_COUNT] {
        &[
            Attribute::Temperance,
            Attribute::Loyalty,
            Attribute::Courage,
            Attribute::Honesty,
            Attribute::Diligence,
            Attribute::Humility,
            Attribute::Compassion,
            Attribute::Justice,
            Attribute::Command,
            Attribute::Charisma,
            Attribute::Insight,
            Attribute::Endurance,
            Attribute::Boldness,
            Attribute::Sociability,
            Attribute::Idealism,
            Attribute::Spontaneity,
        ]
    }

    /// Column name in the `personas` table
    pub fn column_name(&self) -> &'static str {
        match self {
            Attribute::Temperance => "temperance",
            Attribute::Loyalty => "loyalty",
            Attribute::Courage => "courage",
            Attribute::Honesty => "honesty",
            Attribute::Diligence => "diligence",
            Attribute::Humility => "humility",
            Attribute::Compassion => "compassion",
            Attribute::Justice => "justice",
            Attribute::Command => "command",
            Attribute::Charisma => "charisma",
            Attribute::Insight => "insight",
            Attribute::Endurance => "endurance",
            Attribute::Boldness => "boldness",
            Attribute::Sociability => "sociability",
            Attribute::Idealism => "idealism",
            Attribute::Spontaneity => "spontaneity",
        }
    }

    /// Parse attribute from its column name (case insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        Self::all_variants()
            .iter()
            .copied()
            .find(|attr| attr.column_name() == key)
    }

    /// Labels for the two poles of a tendency axis
    pub fn poles(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Attribute::Boldness => Some(("cautious", "bold")),
            Attribute::Sociability => Some(("reserved", "outgoing")),
            Attribute::Idealism => Some(("pragmatic", "idealistic")),
            Attribute::Spontaneity => Some(("planned", "spontaneous")),
            _ => None,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Rescale a raw stat onto the common 0-100 display scale
///
/// Tendencies map [-5, 5] to [0, 100]; virtues and abilities map [0, 10]
/// to [0, 100]. Presentation only: distances are always computed on raw
/// values.
pub fn to_display_score(attribute: Attribute, raw: f64) -> f64 {
    match attribute.band() {
        Band::Tendency => (raw + 5.0) * 10.0,
        Band::Virtue | Band::Ability => raw * 10.0,
    }
}
