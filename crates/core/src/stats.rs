//! Aggregate user statistics and the per-user gamification record.
//!
//! Statistics are always derived by a full rescan of the project graph
//! rather than incrementally maintained, so they self-heal after any missed
//! or duplicated mutation event. The gamification record stores only what
//! cannot be derived: unlock timestamps and streak counters.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::achievement::{
    evaluate_progress, total_points, AchievementProgress, GalleryEntry, Metric, ACHIEVEMENTS,
};
use crate::count_validation::clamp_count;
use crate::project::{Project, ProjectStatus};
use crate::streak::Streak;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// User statistics
// ---------------------------------------------------------------------------

/// Running statistics derived from the full project graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub projects_created: u32,
    pub projects_completed: u32,
    pub steps_completed: u32,
    pub photos_added: u32,
    pub unique_paints: u32,
    pub unique_brands: u32,
    pub unique_techniques: u32,
}

/// Recompute all statistics from a snapshot of the project graph.
///
/// Uniqueness is counted over step paint assignments (a paint assigned to
/// many steps counts once).
pub fn recompute_stats(projects: &[Project]) -> UserStats {
    let mut paints: BTreeSet<&str> = BTreeSet::new();
    let mut brands: BTreeSet<&str> = BTreeSet::new();
    let mut techniques = BTreeSet::new();
    let mut steps_completed = 0u32;
    let mut photos_added = 0u32;

    for project in projects {
        photos_added += project.photo_count();
        for step in &project.steps {
            if step.completed {
                steps_completed += 1;
            }
            for assignment in &step.paints {
                paints.insert(assignment.paint_id.as_str());
                brands.insert(assignment.brand.as_str());
                techniques.insert(assignment.technique);
            }
        }
    }

    UserStats {
        projects_created: projects.len() as u32,
        projects_completed: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Completed)
            .count() as u32,
        steps_completed,
        photos_added,
        unique_paints: paints.len() as u32,
        unique_brands: brands.len() as u32,
        unique_techniques: techniques.len() as u32,
    }
}

// ---------------------------------------------------------------------------
// Gamification record
// ---------------------------------------------------------------------------

/// Per-user gamification state: unlock history, points, and streaks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamificationRecord {
    /// Unlocked achievement id -> when it was unlocked.
    #[serde(default)]
    pub unlocked: BTreeMap<String, Timestamp>,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default)]
    pub daily_streak: Streak,
    #[serde(default)]
    pub weekly_streak: Streak,
    #[serde(default)]
    pub stats: UserStats,
}

/// Progress of one catalog achievement after an evaluation pass.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    pub id: &'static str,
    pub progress: AchievementProgress,
}

/// Result of evaluating the whole catalog against fresh statistics.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementEvaluation {
    /// One entry per catalog definition, in catalog order.
    pub statuses: Vec<AchievementStatus>,
    /// Ids newly unlocked by this evaluation pass.
    pub newly_unlocked: Vec<&'static str>,
}

/// The statistic value an achievement metric reads from the record.
pub fn metric_value(record: &GamificationRecord, metric: Metric) -> u32 {
    match metric {
        Metric::ProjectsCreated => record.stats.projects_created,
        Metric::ProjectsCompleted => record.stats.projects_completed,
        Metric::StepsCompleted => record.stats.steps_completed,
        Metric::PhotosAdded => record.stats.photos_added,
        Metric::UniquePaints => record.stats.unique_paints,
        Metric::UniqueBrands => record.stats.unique_brands,
        Metric::UniqueTechniques => record.stats.unique_techniques,
        Metric::DailyStreakLongest => record.daily_streak.longest,
        Metric::WeeklyStreakLongest => record.weekly_streak.longest,
    }
}

impl GamificationRecord {
    /// Refresh the record from a snapshot of the project graph: recompute
    /// statistics, evaluate every catalog achievement, record new unlocks at
    /// `now`, and recompute total points from the unlock set.
    ///
    /// Unlocks are permanent: an achievement stays unlocked even if the
    /// statistic later drops below its threshold (e.g. a project deletion).
    pub fn refresh(&mut self, projects: &[Project], now: Timestamp) -> AchievementEvaluation {
        self.stats = recompute_stats(projects);

        let mut statuses = Vec::with_capacity(ACHIEVEMENTS.len());
        let mut newly_unlocked = Vec::new();

        for def in ACHIEVEMENTS {
            let progress = evaluate_progress(def, metric_value(self, def.metric));
            if progress.is_unlocked && !self.unlocked.contains_key(def.id) {
                self.unlocked.insert(def.id.to_string(), now);
                newly_unlocked.push(def.id);
                tracing::info!(achievement = def.id, points = def.points, "achievement unlocked");
            }
            statuses.push(AchievementStatus {
                id: def.id,
                progress,
            });
        }

        self.total_points = total_points(self.unlocked.keys().map(String::as_str));

        AchievementEvaluation {
            statuses,
            newly_unlocked,
        }
    }

    /// Build the gallery view for the whole catalog from this record.
    pub fn gallery(&self) -> Vec<GalleryEntry> {
        ACHIEVEMENTS
            .iter()
            .map(|def| GalleryEntry {
                def,
                progress: evaluate_progress(def, metric_value(self, def.metric)),
                unlocked_at: self.unlocked.get(def.id).copied(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Legacy document parsing
// ---------------------------------------------------------------------------

/// Parse a gamification record from a loosely-typed stored document.
///
/// Documents written by older client versions may omit fields or carry
/// negative counters; missing fields default and counts clamp to zero.
/// Total points are recomputed from the unlock set rather than trusted.
pub fn parse_gamification_json(json: &serde_json::Value) -> GamificationRecord {
    let obj = json.as_object();

    let unlocked: BTreeMap<String, Timestamp> = obj
        .and_then(|o| o.get("unlocked"))
        .and_then(|v| v.as_object())
        .map(|map| {
            map.iter()
                .filter_map(|(id, ts)| {
                    let parsed = ts.as_str().and_then(|s| s.parse::<Timestamp>().ok())?;
                    Some((id.clone(), parsed))
                })
                .collect()
        })
        .unwrap_or_default();

    let stats = obj
        .and_then(|o| o.get("stats"))
        .and_then(|v| v.as_object())
        .map(|s| {
            let field = |name: &str| clamp_count(s.get(name).and_then(|v| v.as_i64()).unwrap_or(0));
            UserStats {
                projects_created: field("projects_created"),
                projects_completed: field("projects_completed"),
                steps_completed: field("steps_completed"),
                photos_added: field("photos_added"),
                unique_paints: field("unique_paints"),
                unique_brands: field("unique_brands"),
                unique_techniques: field("unique_techniques"),
            }
        })
        .unwrap_or_default();

    let parse_streak = |name: &str| {
        obj.and_then(|o| o.get(name))
            .and_then(|v| v.as_object())
            .map(|s| Streak {
                current: clamp_count(s.get("current").and_then(|v| v.as_i64()).unwrap_or(0)),
                longest: clamp_count(s.get("longest").and_then(|v| v.as_i64()).unwrap_or(0)),
                last_activity: s
                    .get("last_activity")
                    .and_then(|v| v.as_str())
                    .and_then(|raw| raw.parse::<Timestamp>().ok()),
            })
            .unwrap_or_default()
    };

    let total_points = total_points(unlocked.keys().map(String::as_str));

    GamificationRecord {
        unlocked,
        total_points,
        daily_streak: parse_streak("daily_streak"),
        weekly_streak: parse_streak("weekly_streak"),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::DifficultyTier;
    use crate::project::{PaintAssignment, Step, Technique};
    use chrono::TimeZone;

    fn ts() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn assignment(paint_id: &str, brand: &str, technique: Technique) -> PaintAssignment {
        PaintAssignment {
            paint_id: paint_id.to_string(),
            paint_name: paint_id.to_string(),
            brand: brand.to_string(),
            paint_type: "base".to_string(),
            usage: String::new(),
            technique,
            assigned_at: ts(),
        }
    }

    fn step(id: &str, order: u32, completed: bool) -> Step {
        Step {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            order,
            completed,
            completed_at: completed.then(ts),
            paints: Vec::new(),
            photos: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn project(id: &str, status: ProjectStatus, steps: Vec<Step>) -> Project {
        Project {
            id: id.to_string(),
            name: id.to_string(),
            status,
            difficulty: DifficultyTier::Beginner,
            steps,
            paint_overview: Vec::new(),
            photo_urls: Vec::new(),
            created_at: ts(),
        }
    }

    // -- recompute_stats ------------------------------------------------------

    #[test]
    fn stats_empty_graph() {
        assert_eq!(recompute_stats(&[]), UserStats::default());
    }

    #[test]
    fn stats_counts_projects_and_completions() {
        let projects = vec![
            project("a", ProjectStatus::Completed, vec![]),
            project("b", ProjectStatus::Started, vec![]),
            project("c", ProjectStatus::Upcoming, vec![]),
        ];
        let stats = recompute_stats(&projects);
        assert_eq!(stats.projects_created, 3);
        assert_eq!(stats.projects_completed, 1);
    }

    #[test]
    fn stats_counts_completed_steps_only() {
        let projects = vec![project(
            "a",
            ProjectStatus::Started,
            vec![step("s1", 1, true), step("s2", 2, false), step("s3", 3, true)],
        )];
        assert_eq!(recompute_stats(&projects).steps_completed, 2);
    }

    #[test]
    fn stats_unique_paints_across_projects() {
        let mut s1 = step("s1", 1, false);
        s1.paints.push(assignment("p1", "Citadel", Technique::Basecoat));
        s1.paints.push(assignment("p2", "Vallejo", Technique::Wash));
        let mut s2 = step("s2", 1, false);
        // Same paint reused in another project: counted once.
        s2.paints.push(assignment("p1", "Citadel", Technique::Drybrush));

        let projects = vec![
            project("a", ProjectStatus::Started, vec![s1]),
            project("b", ProjectStatus::Started, vec![s2]),
        ];
        let stats = recompute_stats(&projects);
        assert_eq!(stats.unique_paints, 2);
        assert_eq!(stats.unique_brands, 2);
        assert_eq!(stats.unique_techniques, 3);
    }

    #[test]
    fn stats_photos_include_project_and_step_level() {
        let mut s1 = step("s1", 1, false);
        s1.photos.push("a".to_string());
        let mut p = project("a", ProjectStatus::Started, vec![s1]);
        p.photo_urls.push("cover".to_string());

        assert_eq!(recompute_stats(&[p]).photos_added, 2);
    }

    #[test]
    fn stats_self_heal_on_rescan() {
        // Same snapshot recomputed twice gives identical stats.
        let projects = vec![project("a", ProjectStatus::Completed, vec![step("s", 1, true)])];
        assert_eq!(recompute_stats(&projects), recompute_stats(&projects));
    }

    // -- refresh --------------------------------------------------------------

    #[test]
    fn refresh_unlocks_first_project_achievement() {
        let mut record = GamificationRecord::default();
        let projects = vec![project("a", ProjectStatus::Upcoming, vec![])];

        let eval = record.refresh(&projects, ts());
        assert!(eval.newly_unlocked.contains(&"first_brush"));
        assert_eq!(record.unlocked.get("first_brush"), Some(&ts()));
        assert_eq!(record.total_points, total_points(["first_brush"]));
    }

    #[test]
    fn refresh_does_not_reunlock() {
        let mut record = GamificationRecord::default();
        let projects = vec![project("a", ProjectStatus::Upcoming, vec![])];

        let first = record.refresh(&projects, ts());
        assert!(!first.newly_unlocked.is_empty());
        let second = record.refresh(&projects, ts());
        assert!(second.newly_unlocked.is_empty());
    }

    #[test]
    fn refresh_keeps_unlock_when_stat_drops() {
        let mut record = GamificationRecord::default();
        record.refresh(&[project("a", ProjectStatus::Upcoming, vec![])], ts());
        assert!(record.unlocked.contains_key("first_brush"));

        // Project deleted: stat drops to 0 but the badge stays.
        record.refresh(&[], ts());
        assert!(record.unlocked.contains_key("first_brush"));
        assert_eq!(record.total_points, total_points(["first_brush"]));
    }

    #[test]
    fn refresh_reports_full_catalog_in_order() {
        let mut record = GamificationRecord::default();
        let eval = record.refresh(&[], ts());
        assert_eq!(eval.statuses.len(), ACHIEVEMENTS.len());
        for (status, def) in eval.statuses.iter().zip(ACHIEVEMENTS) {
            assert_eq!(status.id, def.id);
        }
    }

    #[test]
    fn refresh_reads_streak_longest() {
        let mut record = GamificationRecord::default();
        record.daily_streak.longest = 7;

        let eval = record.refresh(&[], ts());
        assert!(eval.newly_unlocked.contains(&"week_of_paint"));
    }

    #[test]
    fn progress_percentages_clamped_for_all_statuses() {
        let mut record = GamificationRecord::default();
        record.stats.projects_created = 1000;
        let eval = record.refresh(&[], ts());
        // refresh recomputes stats from the empty graph, so everything is 0.
        for status in &eval.statuses {
            assert!(status.progress.percentage <= 100);
        }
    }

    // -- gallery --------------------------------------------------------------

    #[test]
    fn gallery_covers_catalog_with_unlock_times() {
        let mut record = GamificationRecord::default();
        record.refresh(&[project("a", ProjectStatus::Upcoming, vec![])], ts());

        let gallery = record.gallery();
        assert_eq!(gallery.len(), ACHIEVEMENTS.len());
        let first_brush = gallery.iter().find(|e| e.def.id == "first_brush").unwrap();
        assert_eq!(first_brush.unlocked_at, Some(ts()));
        assert!(first_brush.progress.is_unlocked);
    }

    // -- parse_gamification_json ----------------------------------------------

    #[test]
    fn parse_full_document() {
        let json = serde_json::json!({
            "unlocked": { "first_brush": "2024-06-01T12:00:00Z" },
            "stats": { "projects_created": 4, "photos_added": 2 },
            "daily_streak": { "current": 3, "longest": 9, "last_activity": "2024-06-01T12:00:00Z" }
        });

        let record = parse_gamification_json(&json);
        assert_eq!(record.unlocked.len(), 1);
        assert_eq!(record.stats.projects_created, 4);
        assert_eq!(record.stats.photos_added, 2);
        assert_eq!(record.stats.steps_completed, 0);
        assert_eq!(record.daily_streak.current, 3);
        assert_eq!(record.daily_streak.longest, 9);
        assert!(record.daily_streak.last_activity.is_some());
        assert_eq!(record.weekly_streak, Streak::default());
    }

    #[test]
    fn parse_empty_document_defaults() {
        let record = parse_gamification_json(&serde_json::json!({}));
        assert!(record.unlocked.is_empty());
        assert_eq!(record.total_points, 0);
        assert_eq!(record.stats, UserStats::default());
    }

    #[test]
    fn parse_not_an_object_defaults() {
        let record = parse_gamification_json(&serde_json::json!("legacy"));
        assert!(record.unlocked.is_empty());
    }

    #[test]
    fn parse_clamps_negative_counters() {
        let json = serde_json::json!({
            "stats": { "projects_created": -3 },
            "daily_streak": { "current": -1, "longest": -2 }
        });
        let record = parse_gamification_json(&json);
        assert_eq!(record.stats.projects_created, 0);
        assert_eq!(record.daily_streak.current, 0);
        assert_eq!(record.daily_streak.longest, 0);
    }

    #[test]
    fn parse_recomputes_points_from_unlocks() {
        let json = serde_json::json!({
            "unlocked": { "first_brush": "2024-06-01T12:00:00Z" },
            "total_points": 9999
        });
        let record = parse_gamification_json(&json);
        assert_eq!(record.total_points, total_points(["first_brush"]));
    }

    #[test]
    fn parse_skips_malformed_unlock_timestamps() {
        let json = serde_json::json!({
            "unlocked": { "first_brush": "not a timestamp", "finisher": "2024-06-01T12:00:00Z" }
        });
        let record = parse_gamification_json(&json);
        assert_eq!(record.unlocked.len(), 1);
        assert!(record.unlocked.contains_key("finisher"));
    }
}
