//! Streak tracking for daily activity and weekly completion.
//!
//! A streak counts consecutive qualifying periods (UTC calendar days or
//! Monday-aligned weeks). Recording activity in the same period is a no-op;
//! the immediately-following period increments the streak; any larger gap
//! resets it to 1. Reads report 0 once a full period has been missed, so a
//! lapsed streak never displays stale counts.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

/// Milestones for the daily activity streak, in days.
pub const DAILY_MILESTONES: &[u32] = &[7, 14, 30, 60, 100, 365];

/// Milestones for the weekly completion streak, in weeks.
pub const WEEKLY_MILESTONES: &[u32] = &[4, 8, 12, 26, 52];

// ---------------------------------------------------------------------------
// Streak type
// ---------------------------------------------------------------------------

/// Kind of streak being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakType {
    /// Any painting activity, counted per UTC calendar day.
    DailyActivity,
    /// Completing at least one step, counted per ISO week (Monday-aligned).
    WeeklyCompletion,
}

impl StreakType {
    /// Convert from a document-store string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "daily_activity" => Ok(Self::DailyActivity),
            "weekly_completion" => Ok(Self::WeeklyCompletion),
            _ => Err(format!(
                "Invalid streak type '{s}'. Must be one of: daily_activity, weekly_completion"
            )),
        }
    }

    /// Convert to the document-store string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DailyActivity => "daily_activity",
            Self::WeeklyCompletion => "weekly_completion",
        }
    }

    /// The ascending milestone list for this streak type.
    pub fn milestones(&self) -> &'static [u32] {
        match self {
            Self::DailyActivity => DAILY_MILESTONES,
            Self::WeeklyCompletion => WEEKLY_MILESTONES,
        }
    }
}

/// The first milestone strictly greater than `current`, or `None` once the
/// list is exhausted.
///
/// # Examples
///
/// ```
/// use paintlog_core::streak::{next_milestone, StreakType};
/// assert_eq!(next_milestone(StreakType::DailyActivity, 0), Some(7));
/// assert_eq!(next_milestone(StreakType::DailyActivity, 7), Some(14));
/// assert_eq!(next_milestone(StreakType::DailyActivity, 400), None);
/// ```
pub fn next_milestone(streak_type: StreakType, current: u32) -> Option<u32> {
    streak_type
        .milestones()
        .iter()
        .copied()
        .find(|&m| m > current)
}

// ---------------------------------------------------------------------------
// Period arithmetic
// ---------------------------------------------------------------------------

/// Whole calendar days between two timestamps (display only, clamped to 0).
pub fn days_since(now: Timestamp, last_activity: Timestamp) -> u32 {
    let days = (now.date_naive() - last_activity.date_naive()).num_days();
    u32::try_from(days).unwrap_or(0)
}

/// Index of the period a timestamp falls in: day number for daily streaks,
/// Monday-aligned week number for weekly streaks. Consecutive periods have
/// consecutive indices, including across month and year boundaries.
fn period_index(streak_type: StreakType, ts: Timestamp) -> i64 {
    let date = ts.date_naive();
    let days = i64::from(date.num_days_from_ce());
    match streak_type {
        StreakType::DailyActivity => days,
        StreakType::WeeklyCompletion => {
            let monday = days - i64::from(date.weekday().num_days_from_monday());
            monday.div_euclid(7)
        }
    }
}

// ---------------------------------------------------------------------------
// Streak record
// ---------------------------------------------------------------------------

/// Current/longest streak counters with the last qualifying activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    #[serde(default)]
    pub last_activity: Option<Timestamp>,
}

impl Streak {
    /// Record a qualifying activity at `now`.
    ///
    /// Same period as the last activity: no change. Immediately-following
    /// period: increment. Larger gap (or first ever activity): reset to 1.
    /// Out-of-order timestamps earlier than the last activity are ignored.
    pub fn record_activity(&mut self, streak_type: StreakType, now: Timestamp) {
        match self.last_activity {
            None => {
                self.current = 1;
                self.last_activity = Some(now);
            }
            Some(last) => {
                let gap = period_index(streak_type, now) - period_index(streak_type, last);
                if gap < 0 {
                    return;
                }
                if gap == 1 {
                    self.current += 1;
                } else if gap > 1 {
                    self.current = 1;
                }
                self.last_activity = Some(now);
            }
        }
        self.longest = self.longest.max(self.current);
    }

    /// The streak value to display at `now`: the stored count while the
    /// streak is alive, 0 once a full period has been missed.
    pub fn effective_current(&self, streak_type: StreakType, now: Timestamp) -> u32 {
        match self.last_activity {
            None => 0,
            Some(last) => {
                let gap = period_index(streak_type, now) - period_index(streak_type, last);
                if gap > 1 {
                    0
                } else {
                    self.current
                }
            }
        }
    }
}
