//! Complexity scoring for relative project ranking.
//!
//! A weighted sum over a project's step, paint, and photo counts plus the
//! number of distinct techniques, on top of a per-tier base. Used only for
//! display and ranking; scores have no absolute meaning.

use crate::difficulty::{classify_difficulty, DifficultyTier};
use crate::project::Project;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Points per step.
pub const STEP_WEIGHT: f64 = 2.0;
/// Points per paint in the project overview.
pub const PAINT_WEIGHT: f64 = 1.5;
/// Points per photo (project-level and per-step combined).
pub const PHOTO_WEIGHT: f64 = 0.5;
/// Points per distinct technique used.
pub const TECHNIQUE_WEIGHT: f64 = 5.0;

// ---------------------------------------------------------------------------
// Base points
// ---------------------------------------------------------------------------

/// Base score contributed by the project's difficulty tier.
pub fn base_points(tier: DifficultyTier) -> u32 {
    match tier {
        DifficultyTier::Beginner => 10,
        DifficultyTier::Intermediate => 25,
        DifficultyTier::Advanced => 50,
        DifficultyTier::Expert => 100,
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Compute a project's complexity score.
///
/// The difficulty tier is classified from the same step/paint counts, so the
/// score is monotone non-decreasing in steps, paints, photos, and distinct
/// techniques independently.
pub fn complexity_score(project: &Project) -> i64 {
    let tier = classify_difficulty(project.step_count(), project.paint_count());

    let weighted = f64::from(base_points(tier))
        + STEP_WEIGHT * f64::from(project.step_count())
        + PAINT_WEIGHT * f64::from(project.paint_count())
        + PHOTO_WEIGHT * f64::from(project.photo_count())
        + TECHNIQUE_WEIGHT * f64::from(project.unique_technique_count());

    weighted.round() as i64
}
