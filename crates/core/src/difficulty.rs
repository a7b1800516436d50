//! Difficulty classification from step and paint counts.
//!
//! Maps a project's step/paint counts onto a discrete difficulty tier by
//! scanning an ordered range table. Classification is monotone: increasing
//! either count never lowers the resulting tier.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tier enum
// ---------------------------------------------------------------------------

/// Discrete difficulty tier for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyTier {
    /// Convert from a document-store string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            _ => Err(format!(
                "Invalid difficulty tier '{s}'. Must be one of: beginner, intermediate, advanced, expert"
            )),
        }
    }

    /// Convert to the document-store string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Human-readable label for display in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }

    /// Ordinal position of the tier (0 = Beginner .. 3 = Expert).
    pub fn rank(self) -> u8 {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
            Self::Expert => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Range table
// ---------------------------------------------------------------------------

/// One row of the classification table: a tier with inclusive step and
/// paint count ranges.
pub struct DifficultyRange {
    pub tier: DifficultyTier,
    pub min_steps: u32,
    pub max_steps: u32,
    pub min_paints: u32,
    pub max_paints: u32,
}

/// Ordered classification table, scanned first-match. Lower bounds are 0 and
/// upper bounds nest so that classification stays monotone in both counts.
/// Expert is the open-ended fallback and carries no row.
pub const DIFFICULTY_RANGES: &[DifficultyRange] = &[
    DifficultyRange {
        tier: DifficultyTier::Beginner,
        min_steps: 0,
        max_steps: 3,
        min_paints: 0,
        max_paints: 5,
    },
    DifficultyRange {
        tier: DifficultyTier::Intermediate,
        min_steps: 0,
        max_steps: 8,
        min_paints: 0,
        max_paints: 12,
    },
    DifficultyRange {
        tier: DifficultyTier::Advanced,
        min_steps: 0,
        max_steps: 15,
        min_paints: 0,
        max_paints: 20,
    },
];

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a project's difficulty from its step and paint counts.
///
/// Returns the first table row where both counts fall within range, or
/// `Expert` when the counts exceed every bounded row.
pub fn classify_difficulty(step_count: u32, paint_count: u32) -> DifficultyTier {
    for range in DIFFICULTY_RANGES {
        let steps_ok = step_count >= range.min_steps && step_count <= range.max_steps;
        let paints_ok = paint_count >= range.min_paints && paint_count <= range.max_paints;
        if steps_ok && paints_ok {
            return range.tier;
        }
    }
    DifficultyTier::Expert
}
