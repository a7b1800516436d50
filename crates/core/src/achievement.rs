//! Achievement definitions, progress evaluation, and gallery views.
//!
//! The catalog is static config compared against a user's running
//! statistics; definitions are never mutated at runtime. Progress
//! percentages are clamped to [0, 100].

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Categories & metrics
// ---------------------------------------------------------------------------

/// Gallery grouping for achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Projects,
    Steps,
    Paints,
    Photos,
    Streaks,
}

impl AchievementCategory {
    /// Convert to the document-store string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Steps => "steps",
            Self::Paints => "paints",
            Self::Photos => "photos",
            Self::Streaks => "streaks",
        }
    }
}

/// The running statistic an achievement threshold is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ProjectsCreated,
    ProjectsCompleted,
    StepsCompleted,
    PhotosAdded,
    UniquePaints,
    UniqueBrands,
    UniqueTechniques,
    DailyStreakLongest,
    WeeklyStreakLongest,
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Static achievement definition. Thresholds are always > 0.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub metric: Metric,
    pub threshold: u32,
    pub points: u32,
    pub icon: &'static str,
    pub category: AchievementCategory,
}

/// The full achievement catalog, in canonical display order.
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    // -- projects --
    AchievementDef {
        id: "first_brush",
        name: "First Brush",
        description: "Create your first project",
        metric: Metric::ProjectsCreated,
        threshold: 1,
        points: 10,
        icon: "brush",
        category: AchievementCategory::Projects,
    },
    AchievementDef {
        id: "project_collector",
        name: "Project Collector",
        description: "Create 5 projects",
        metric: Metric::ProjectsCreated,
        threshold: 5,
        points: 25,
        icon: "stack",
        category: AchievementCategory::Projects,
    },
    AchievementDef {
        id: "pile_of_shame",
        name: "Pile of Shame",
        description: "Create 15 projects",
        metric: Metric::ProjectsCreated,
        threshold: 15,
        points: 50,
        icon: "mountain",
        category: AchievementCategory::Projects,
    },
    AchievementDef {
        id: "finisher",
        name: "Finisher",
        description: "Complete your first project",
        metric: Metric::ProjectsCompleted,
        threshold: 1,
        points: 20,
        icon: "flag",
        category: AchievementCategory::Projects,
    },
    AchievementDef {
        id: "closer",
        name: "Closer",
        description: "Complete 5 projects",
        metric: Metric::ProjectsCompleted,
        threshold: 5,
        points: 50,
        icon: "trophy",
        category: AchievementCategory::Projects,
    },
    AchievementDef {
        id: "shelf_of_glory",
        name: "Shelf of Glory",
        description: "Complete 20 projects",
        metric: Metric::ProjectsCompleted,
        threshold: 20,
        points: 100,
        icon: "crown",
        category: AchievementCategory::Projects,
    },
    // -- steps --
    AchievementDef {
        id: "step_by_step",
        name: "Step by Step",
        description: "Complete 10 steps",
        metric: Metric::StepsCompleted,
        threshold: 10,
        points: 15,
        icon: "footprints",
        category: AchievementCategory::Steps,
    },
    AchievementDef {
        id: "methodical",
        name: "Methodical",
        description: "Complete 50 steps",
        metric: Metric::StepsCompleted,
        threshold: 50,
        points: 40,
        icon: "list",
        category: AchievementCategory::Steps,
    },
    AchievementDef {
        id: "assembly_line",
        name: "Assembly Line",
        description: "Complete 200 steps",
        metric: Metric::StepsCompleted,
        threshold: 200,
        points: 100,
        icon: "factory",
        category: AchievementCategory::Steps,
    },
    // -- paints --
    AchievementDef {
        id: "paint_curious",
        name: "Paint Curious",
        description: "Use 5 different paints",
        metric: Metric::UniquePaints,
        threshold: 5,
        points: 10,
        icon: "droplet",
        category: AchievementCategory::Paints,
    },
    AchievementDef {
        id: "paint_collector",
        name: "Paint Collector",
        description: "Use 25 different paints",
        metric: Metric::UniquePaints,
        threshold: 25,
        points: 30,
        icon: "palette",
        category: AchievementCategory::Paints,
    },
    AchievementDef {
        id: "paint_librarian",
        name: "Paint Librarian",
        description: "Use 100 different paints",
        metric: Metric::UniquePaints,
        threshold: 100,
        points: 75,
        icon: "library",
        category: AchievementCategory::Paints,
    },
    AchievementDef {
        id: "brand_explorer",
        name: "Brand Explorer",
        description: "Use paints from 3 different brands",
        metric: Metric::UniqueBrands,
        threshold: 3,
        points: 15,
        icon: "compass",
        category: AchievementCategory::Paints,
    },
    AchievementDef {
        id: "technique_explorer",
        name: "Technique Explorer",
        description: "Use 4 different techniques",
        metric: Metric::UniqueTechniques,
        threshold: 4,
        points: 25,
        icon: "wand",
        category: AchievementCategory::Paints,
    },
    // -- photos --
    AchievementDef {
        id: "first_snapshot",
        name: "First Snapshot",
        description: "Add your first photo",
        metric: Metric::PhotosAdded,
        threshold: 1,
        points: 10,
        icon: "camera",
        category: AchievementCategory::Photos,
    },
    AchievementDef {
        id: "gallery_builder",
        name: "Gallery Builder",
        description: "Add 25 photos",
        metric: Metric::PhotosAdded,
        threshold: 25,
        points: 35,
        icon: "image",
        category: AchievementCategory::Photos,
    },
    AchievementDef {
        id: "chronicler",
        name: "Chronicler",
        description: "Add 100 photos",
        metric: Metric::PhotosAdded,
        threshold: 100,
        points: 80,
        icon: "film",
        category: AchievementCategory::Photos,
    },
    // -- streaks --
    AchievementDef {
        id: "week_of_paint",
        name: "Week of Paint",
        description: "Reach a 7-day activity streak",
        metric: Metric::DailyStreakLongest,
        threshold: 7,
        points: 20,
        icon: "calendar",
        category: AchievementCategory::Streaks,
    },
    AchievementDef {
        id: "month_of_paint",
        name: "Month of Paint",
        description: "Reach a 30-day activity streak",
        metric: Metric::DailyStreakLongest,
        threshold: 30,
        points: 60,
        icon: "flame",
        category: AchievementCategory::Streaks,
    },
    AchievementDef {
        id: "season_closer",
        name: "Season Closer",
        description: "Reach a 12-week completion streak",
        metric: Metric::WeeklyStreakLongest,
        threshold: 12,
        points: 70,
        icon: "medal",
        category: AchievementCategory::Streaks,
    },
];

/// Look up a catalog definition by id.
pub fn find_achievement(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Sum the catalog points for a set of unlocked achievement ids.
///
/// Ids not present in the catalog contribute nothing.
pub fn total_points<'a>(unlocked_ids: impl IntoIterator<Item = &'a str>) -> u32 {
    unlocked_ids
        .into_iter()
        .filter_map(find_achievement)
        .map(|a| a.points)
        .sum()
}

// ---------------------------------------------------------------------------
// Progress evaluation
// ---------------------------------------------------------------------------

/// Progress of one achievement against the current statistic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementProgress {
    pub current: u32,
    pub required: u32,
    /// Clamped to [0, 100].
    pub percentage: u8,
    pub is_unlocked: bool,
}

/// Evaluate one achievement definition against the current statistic value.
pub fn evaluate_progress(def: &AchievementDef, current: u32) -> AchievementProgress {
    let pct = (f64::from(current) / f64::from(def.threshold) * 100.0).round() as u32;
    AchievementProgress {
        current,
        required: def.threshold,
        percentage: pct.min(100) as u8,
        is_unlocked: current >= def.threshold,
    }
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

/// One row of the achievement gallery.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryEntry {
    pub def: &'static AchievementDef,
    pub progress: AchievementProgress,
    pub unlocked_at: Option<Timestamp>,
}

/// Sort key for the achievement gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GallerySort {
    Category,
    UnlockState,
    Recency,
    Points,
    Name,
}

/// Filter gallery entries by category and/or unlock state.
pub fn filter_gallery(
    entries: &[GalleryEntry],
    category: Option<AchievementCategory>,
    only_unlocked: bool,
) -> Vec<GalleryEntry> {
    entries
        .iter()
        .filter(|e| category.is_none_or(|c| e.def.category == c))
        .filter(|e| !only_unlocked || e.progress.is_unlocked)
        .cloned()
        .collect()
}

/// Sort gallery entries in place. All sorts are stable, so entries that
/// compare equal keep their catalog order.
pub fn sort_gallery(entries: &mut [GalleryEntry], sort: GallerySort) {
    match sort {
        GallerySort::Category => entries.sort_by_key(|e| e.def.category),
        // Unlocked entries first.
        GallerySort::UnlockState => entries.sort_by_key(|e| !e.progress.is_unlocked),
        // Most recently unlocked first; locked entries last.
        GallerySort::Recency => entries.sort_by_key(|e| std::cmp::Reverse(e.unlocked_at)),
        // Highest points first.
        GallerySort::Points => entries.sort_by_key(|e| std::cmp::Reverse(e.def.points)),
        GallerySort::Name => entries.sort_by_key(|e| e.def.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn ts(day: u32) -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn entry(id: &str, current: u32, unlocked_at: Option<Timestamp>) -> GalleryEntry {
        let def = find_achievement(id).unwrap();
        GalleryEntry {
            def,
            progress: evaluate_progress(def, current),
            unlocked_at,
        }
    }

    // -- catalog invariants ---------------------------------------------------

    #[test]
    fn catalog_ids_unique() {
        let ids: BTreeSet<&str> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), ACHIEVEMENTS.len());
    }

    #[test]
    fn catalog_thresholds_positive() {
        for def in ACHIEVEMENTS {
            assert!(def.threshold > 0, "{} has zero threshold", def.id);
        }
    }

    #[test]
    fn catalog_points_positive() {
        for def in ACHIEVEMENTS {
            assert!(def.points > 0, "{} has zero points", def.id);
        }
    }

    #[test]
    fn find_known_achievement() {
        let def = find_achievement("first_brush").unwrap();
        assert_eq!(def.threshold, 1);
        assert_eq!(def.category, AchievementCategory::Projects);
    }

    #[test]
    fn find_unknown_achievement() {
        assert!(find_achievement("nope").is_none());
    }

    // -- total_points ---------------------------------------------------------

    #[test]
    fn total_points_sums_catalog_values() {
        // first_brush (10) + finisher (20)
        assert_eq!(total_points(["first_brush", "finisher"]), 30);
    }

    #[test]
    fn total_points_ignores_unknown_ids() {
        assert_eq!(total_points(["first_brush", "ghost_badge"]), 10);
    }

    #[test]
    fn total_points_empty() {
        assert_eq!(total_points(Vec::<&str>::new()), 0);
    }

    // -- evaluate_progress ----------------------------------------------------

    #[test]
    fn progress_partway() {
        let def = find_achievement("step_by_step").unwrap(); // threshold 10
        let p = evaluate_progress(def, 7);
        assert_eq!(p.percentage, 70);
        assert!(!p.is_unlocked);
    }

    #[test]
    fn progress_at_threshold() {
        let def = find_achievement("step_by_step").unwrap();
        let p = evaluate_progress(def, 10);
        assert_eq!(p.percentage, 100);
        assert!(p.is_unlocked);
    }

    #[test]
    fn progress_past_threshold_clamped() {
        let def = find_achievement("step_by_step").unwrap();
        let p = evaluate_progress(def, 15);
        assert_eq!(p.percentage, 100);
        assert!(p.is_unlocked);
    }

    #[test]
    fn progress_zero() {
        let def = find_achievement("step_by_step").unwrap();
        let p = evaluate_progress(def, 0);
        assert_eq!(p.percentage, 0);
        assert!(!p.is_unlocked);
    }

    #[test]
    fn progress_rounds() {
        let def = find_achievement("paint_collector").unwrap(); // threshold 25
        // 17/25 = 68%
        assert_eq!(evaluate_progress(def, 17).percentage, 68);
        // 1/25 = 4%
        assert_eq!(evaluate_progress(def, 1).percentage, 4);
    }

    #[test]
    fn progress_in_unit_range_for_all_defs() {
        for def in ACHIEVEMENTS {
            for current in [0, 1, def.threshold, def.threshold * 3, u32::MAX / 200] {
                let p = evaluate_progress(def, current);
                assert!(p.percentage <= 100);
                assert_eq!(p.is_unlocked, current >= def.threshold);
            }
        }
    }

    // -- filter_gallery -------------------------------------------------------

    #[test]
    fn filter_by_category() {
        let entries = vec![
            entry("first_brush", 1, Some(ts(1))),
            entry("first_snapshot", 0, None),
        ];
        let filtered = filter_gallery(&entries, Some(AchievementCategory::Photos), false);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].def.id, "first_snapshot");
    }

    #[test]
    fn filter_only_unlocked() {
        let entries = vec![
            entry("first_brush", 1, Some(ts(1))),
            entry("first_snapshot", 0, None),
        ];
        let filtered = filter_gallery(&entries, None, true);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].def.id, "first_brush");
    }

    #[test]
    fn filter_no_criteria_keeps_all() {
        let entries = vec![
            entry("first_brush", 1, Some(ts(1))),
            entry("first_snapshot", 0, None),
        ];
        assert_eq!(filter_gallery(&entries, None, false).len(), 2);
    }

    // -- sort_gallery ---------------------------------------------------------

    #[test]
    fn sort_by_unlock_state_puts_unlocked_first() {
        let mut entries = vec![
            entry("first_snapshot", 0, None),
            entry("first_brush", 1, Some(ts(1))),
        ];
        sort_gallery(&mut entries, GallerySort::UnlockState);
        assert_eq!(entries[0].def.id, "first_brush");
    }

    #[test]
    fn sort_by_recency_most_recent_first() {
        let mut entries = vec![
            entry("first_brush", 1, Some(ts(1))),
            entry("finisher", 1, Some(ts(5))),
            entry("first_snapshot", 0, None),
        ];
        sort_gallery(&mut entries, GallerySort::Recency);
        assert_eq!(entries[0].def.id, "finisher");
        assert_eq!(entries[1].def.id, "first_brush");
        assert_eq!(entries[2].def.id, "first_snapshot");
    }

    #[test]
    fn sort_by_points_descending() {
        let mut entries = vec![
            entry("first_brush", 1, None),  // 10 points
            entry("closer", 0, None),       // 50 points
        ];
        sort_gallery(&mut entries, GallerySort::Points);
        assert_eq!(entries[0].def.id, "closer");
    }

    #[test]
    fn sort_by_name_alphabetical() {
        let mut entries = vec![
            entry("step_by_step", 0, None), // "Step by Step"
            entry("closer", 0, None),       // "Closer"
        ];
        sort_gallery(&mut entries, GallerySort::Name);
        assert_eq!(entries[0].def.id, "closer");
    }

    #[test]
    fn sort_stable_on_equal_keys() {
        // Both locked with no timestamp: catalog order must be preserved.
        let mut entries = vec![
            entry("first_brush", 0, None),
            entry("first_snapshot", 0, None),
        ];
        sort_gallery(&mut entries, GallerySort::UnlockState);
        assert_eq!(entries[0].def.id, "first_brush");
        assert_eq!(entries[1].def.id, "first_snapshot");
    }

    #[test]
    fn sort_by_category_groups_catalog_order() {
        let mut entries = vec![
            entry("first_snapshot", 0, None), // photos
            entry("first_brush", 0, None),    // projects
            entry("gallery_builder", 0, None), // photos
        ];
        sort_gallery(&mut entries, GallerySort::Category);
        assert_eq!(entries[0].def.id, "first_brush");
        assert_eq!(entries[1].def.id, "first_snapshot");
        assert_eq!(entries[2].def.id, "gallery_builder");
    }
}
