//! Grade tiers for competitive standing and absolute scores
//!
//! Maps a percentile ("top X%"), a raw score (0-100) or a (rank, total)
//! pair onto one of nine ordered tiers. Each tier carries a fixed material
//! identity used by badges: display name, short label, numeral and colors.
//!
//! Percentile cut points are the nine-grade college entrance exam bands
//! (4 / 11 / 23 / 40 / 60 / 77 / 89 / 96). Score bands are ten points wide
//! except the top band (81-100) and the bottom band (0-10).
//!
//! **Input policy:**
//! - NaN resolves to the lowest tier for every entry point
//! - Anything outside [0, 100] is clamped before the table lookup
//! - A rank with `total <= 0` is treated as percentile 100

use serde::{Deserialize, Serialize};

/// Nine ordered grade tiers, lowest first
///
/// Derived ordering follows declaration order, so `Tier::Legend > Tier::Iron`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Tier 1: bottom 4% of the population / score 0-10
    Iron,
    /// Tier 2
    Bronze,
    /// Tier 3
    Silver,
    /// Tier 4
    Gold,
    /// Tier 5: the median band
    Platinum,
    /// Tier 6
    Emerald,
    /// Tier 7
    Diamond,
    /// Tier 8
    Master,
    /// Tier 9: top 4% of the population / score 81-100
    Legend,
}

/// Static descriptive record for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierRecord {
    /// 1 (lowest) to 9 (highest)
    pub tier_index: u8,
    pub display_name: &'static str,
    pub short_label: &'static str,
    /// Exam-style grade numeral; the highest tier reads "I"
    pub numeral: &'static str,
    pub color_primary: &'static str,
    pub color_secondary: &'static str,
    pub border_color: &'static str,
    /// Highest percentile (lower = more exclusive) still in this tier
    pub percentile_upper_bound: f64,
    /// Lowest raw score still in this tier
    pub score_lower_bound: f64,
}

/// Tier table indexed by `tier_index - 1`
///
/// Percentile upper bounds descend and score lower bounds ascend with the
/// index; the lowest tier covers percentile 100 and score 0 so both ranges
/// partition [0, 100].
static TIER_TABLE: [TierRecord; 9] = [
    TierRecord {
        tier_index: 1,
        display_name: "Iron",
        short_label: "IRN",
        numeral: "IX",
        color_primary: "#5b5b5b",
        color_secondary: "#8a8a8a",
        border_color: "#3d3d3d",
        percentile_upper_bound: 100.0,
        score_lower_bound: 0.0,
    },
    TierRecord {
        tier_index: 2,
        display_name: "Bronze",
        short_label: "BRZ",
        numeral: "VIII",
        color_primary: "#8c5a2b",
        color_secondary: "#c08552",
        border_color: "#5e3b1a",
        percentile_upper_bound: 96.0,
        score_lower_bound: 11.0,
    },
    TierRecord {
        tier_index: 3,
        display_name: "Silver",
        short_label: "SLV",
        numeral: "VII",
        color_primary: "#9ea7b0",
        color_secondary: "#d5dbe0",
        border_color: "#6f7880",
        percentile_upper_bound: 89.0,
        score_lower_bound: 21.0,
    },
    TierRecord {
        tier_index: 4,
        display_name: "Gold",
        short_label: "GLD",
        numeral: "VI",
        color_primary: "#c9a227",
        color_secondary: "#f1d67a",
        border_color: "#8e7016",
        percentile_upper_bound: 77.0,
        score_lower_bound: 31.0,
    },
    TierRecord {
        tier_index: 5,
        display_name: "Platinum",
        short_label: "PLT",
        numeral: "V",
        color_primary: "#4fa3a5",
        color_secondary: "#a6dcdc",
        border_color: "#2f6f71",
        percentile_upper_bound: 60.0,
        score_lower_bound: 41.0,
    },
    TierRecord {
        tier_index: 6,
        display_name: "Emerald",
        short_label: "EMR",
        numeral: "IV",
        color_primary: "#1f9d55",
        color_secondary: "#7ee2a8",
        border_color: "#136a39",
        percentile_upper_bound: 40.0,
        score_lower_bound: 51.0,
    },
    TierRecord {
        tier_index: 7,
        display_name: "Diamond",
        short_label: "DIA",
        numeral: "III",
        color_primary: "#3b82f6",
        color_secondary: "#a5c8ff",
        border_color: "#1d4ed8",
        percentile_upper_bound: 23.0,
        score_lower_bound: 61.0,
    },
    TierRecord {
        tier_index: 8,
        display_name: "Master",
        short_label: "MST",
        numeral: "II",
        color_primary: "#8b5cf6",
        color_secondary: "#d0bcff",
        border_color: "#5b21b6",
        percentile_upper_bound: 11.0,
        score_lower_bound: 71.0,
    },
    TierRecord {
        tier_index: 9,
        display_name: "Legend",
        short_label: "LGD",
        numeral: "I",
        color_primary: "#e11d48",
        color_secondary: "#fda4af",
        border_color: "#9f1239",
        percentile_upper_bound: 4.0,
        score_lower_bound: 81.0,
    },
];

impl Tier {
    /// Tier index, 1 (lowest) to 9 (highest)
    pub fn index(&self) -> u8 {
        *self as u8 + 1
    }

    /// Look up a tier by its 1-based index
    pub fn from_index(index: u8) -> Option<Self> {
        Self::all_variants().get(usize::from(index).checked_sub(1)?).copied()
    }

    /// Static descriptive record for this tier
    pub fn record(&self) -> &'static TierRecord {
        &TIER_TABLE[*self as usize]
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        self.record().display_name
    }

    /// All tiers, lowest first
    ///
    /// Useful for legends and validation
    pub fn all_variants() -> &'static [Tier] {
        &[
            Tier::Iron,
            Tier::Bronze,
            Tier::Silver,
            Tier::Gold,
            Tier::Platinum,
            Tier::Emerald,
            Tier::Diamond,
            Tier::Master,
            Tier::Legend,
        ]
    }

    /// Parse tier from its stored material key
    ///
    /// Accepts the material name in any case and `tierN` / `tier_N` aliases.
    pub fn from_str(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        if let Some(n) = key.strip_prefix("tier") {
            return n.trim_start_matches('_').parse::<u8>().ok().and_then(Self::from_index);
        }
        match key.as_str() {
            "iron" => Some(Tier::Iron),
            "bronze" => Some(Tier::Bronze),
            "silver" => Some(Tier::Silver),
            "gold" => Some(Tier::Gold),
            "platinum" => Some(Tier::Platinum),
            "emerald" => Some(Tier::Emerald),
            "diamond" => Some(Tier::Diamond),
            "master" => Some(Tier::Master),
            "legend" => Some(Tier::Legend),
            _ => None,
        }
    }

    /// Canonical lowercase material key
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Tier::Iron => "iron",
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
            Tier::Emerald => "emerald",
            Tier::Diamond => "diamond",
            Tier::Master => "master",
            Tier::Legend => "legend",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tier for a population percentile ("top X%", lower is better)
///
/// Walks the table from the top tier down and returns the first tier whose
/// upper bound admits the percentile.
pub fn tier_from_percentile(percentile: f64) -> Tier {
    if percentile.is_nan() {
        return Tier::Iron;
    }
    let p = percentile.clamp(0.0, 100.0);

    Tier::all_variants()
        .iter()
        .rev()
        .copied()
        .find(|tier| p <= tier.record().percentile_upper_bound)
        .unwrap_or(Tier::Iron)
}

/// Tier for an absolute score in [0, 100]
pub fn tier_from_score(score: f64) -> Tier {
    if score.is_nan() {
        return Tier::Iron;
    }
    let s = score.clamp(0.0, 100.0);

    Tier::all_variants()
        .iter()
        .rev()
        .copied()
        .find(|tier| s >= tier.record().score_lower_bound)
        .unwrap_or(Tier::Iron)
}

/// Percentile of a 1-based rank within a population of `total`
///
/// Returns 100 (worst) when `total <= 0`.
pub fn percentile_from_rank(rank: i64, total: i64) -> f64 {
    if total <= 0 {
        return 100.0;
    }
    (rank as f64 / total as f64) * 100.0
}

/// Tier for a 1-based competitive rank (rank 1 = best)
///
/// Ranks outside `1..=total` are not rejected; they resolve through the
/// percentile clamp.
pub fn tier_from_rank(rank: i64, total: i64) -> Tier {
    tier_from_percentile(percentile_from_rank(rank, total))
}

/// Grade snapshot handed to badge renderers
#[derive(Debug, Clone, Serialize)]
pub struct Grade {
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub record: TierRecord,
}

impl Grade {
    fn new(tier: Tier, percentile: Option<f64>, score: Option<f64>) -> Self {
        Self {
            tier,
            percentile,
            score,
            record: *tier.record(),
        }
    }

    pub fn from_percentile(percentile: f64) -> Self {
        Self::new(tier_from_percentile(percentile), Some(percentile), None)
    }

    pub fn from_score(score: f64) -> Self {
        Self::new(tier_from_score(score), None, Some(score))
    }

    pub fn from_rank(rank: i64, total: i64) -> Self {
        let percentile = percentile_from_rank(rank, total);
        Self::new(tier_from_percentile(percentile), Some(percentile), None)
    }
}
