//! Subscription tiers, usage limits, and permission checks.
//!
//! Limits are flat per-tier constants. Checks are stateless queries: global
//! usage counters are recomputed from the document graph by the caller and
//! project-scoped counts are recounted from the supplied project snapshot on
//! every call, so the results self-heal and never go stale.
//!
//! Actions form a closed enum. Adding a new gated action means adding a
//! variant, which forces every match site to decide its limit explicitly —
//! there is no permissive fallback for unknown actions.

use serde::{Deserialize, Serialize};

use crate::project::Project;

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Subscription plan level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Free,
    Casual,
    Pro,
    Battle,
}

impl Tier {
    /// Parse a document-store string value, clamping unknown tiers to Free.
    ///
    /// Limit checks must degrade to the most restrictive plan when a stored
    /// tier name is unrecognized, never error.
    ///
    /// # Examples
    ///
    /// ```
    /// use paintlog_core::subscription::Tier;
    /// assert_eq!(Tier::from_str_or_free("pro"), Tier::Pro);
    /// assert_eq!(Tier::from_str_or_free("mystery"), Tier::Free);
    /// ```
    pub fn from_str_or_free(s: &str) -> Self {
        match s {
            "casual" => Self::Casual,
            "pro" => Self::Pro,
            "battle" => Self::Battle,
            _ => Self::Free,
        }
    }

    /// Convert to the document-store string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Casual => "casual",
            Self::Pro => "pro",
            Self::Battle => "battle",
        }
    }

    /// Human-readable plan name for display in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Casual => "Casual",
            Self::Pro => "Pro",
            Self::Battle => "Battle",
        }
    }

    /// The next tier up, or `None` from the top tier.
    pub fn next(self) -> Option<Tier> {
        match self {
            Self::Free => Some(Self::Casual),
            Self::Casual => Some(Self::Pro),
            Self::Pro => Some(Self::Battle),
            Self::Battle => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// A single resource limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    Bounded(u32),
    Unlimited,
}

impl Limit {
    /// Whether `used + requested` stays within the limit.
    pub fn allows(self, used: u32, requested: u32) -> bool {
        match self {
            Self::Bounded(max) => u64::from(used) + u64::from(requested) <= u64::from(max),
            Self::Unlimited => true,
        }
    }

    /// How many more items fit under the limit.
    pub fn remaining(self, used: u32) -> Allowance {
        match self {
            Self::Bounded(max) => Allowance::Remaining(max.saturating_sub(used)),
            Self::Unlimited => Allowance::Unlimited,
        }
    }
}

/// Remaining allowance reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Allowance {
    Remaining(u32),
    Unlimited,
}

/// Per-tier limits table. Global limits apply across the account;
/// `*_per_project` limits are recounted per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierLimits {
    pub paints: Limit,
    pub projects: Limit,
    pub photos: Limit,
    pub steps_per_project: Limit,
    pub assignments_per_project: Limit,
    pub notes_per_project: Limit,
}

/// The limits table for a tier.
pub const fn limits(tier: Tier) -> TierLimits {
    match tier {
        Tier::Free => TierLimits {
            paints: Limit::Bounded(25),
            projects: Limit::Bounded(3),
            photos: Limit::Bounded(10),
            steps_per_project: Limit::Bounded(10),
            assignments_per_project: Limit::Bounded(20),
            notes_per_project: Limit::Bounded(15),
        },
        Tier::Casual => TierLimits {
            paints: Limit::Bounded(150),
            projects: Limit::Bounded(10),
            photos: Limit::Bounded(50),
            steps_per_project: Limit::Bounded(25),
            assignments_per_project: Limit::Bounded(100),
            notes_per_project: Limit::Bounded(50),
        },
        Tier::Pro => TierLimits {
            paints: Limit::Unlimited,
            projects: Limit::Bounded(50),
            photos: Limit::Bounded(250),
            steps_per_project: Limit::Bounded(50),
            assignments_per_project: Limit::Unlimited,
            notes_per_project: Limit::Bounded(100),
        },
        Tier::Battle => TierLimits {
            paints: Limit::Unlimited,
            projects: Limit::Unlimited,
            photos: Limit::Unlimited,
            steps_per_project: Limit::Unlimited,
            assignments_per_project: Limit::Unlimited,
            notes_per_project: Limit::Unlimited,
        },
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A gated user action. Closed set: unknown actions are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitAction {
    AddPaint,
    AddProject,
    AddPhoto,
    AddStep,
    AddPaintAssignment,
    AddNote,
}

/// Whether an action is limited account-wide or per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitScope {
    Global,
    PerProject,
}

impl LimitAction {
    /// Convert to the document-store string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddPaint => "add_paint",
            Self::AddProject => "add_project",
            Self::AddPhoto => "add_photo",
            Self::AddStep => "add_step",
            Self::AddPaintAssignment => "add_paint_assignment",
            Self::AddNote => "add_note",
        }
    }

    /// The resource name used in limit messages.
    pub fn resource_label(&self) -> &'static str {
        match self {
            Self::AddPaint => "paints",
            Self::AddProject => "projects",
            Self::AddPhoto => "photos",
            Self::AddStep => "steps per project",
            Self::AddPaintAssignment => "paint assignments per project",
            Self::AddNote => "notes per project",
        }
    }

    /// Whether this action counts against a global or per-project limit.
    pub fn scope(&self) -> LimitScope {
        match self {
            Self::AddPaint | Self::AddProject | Self::AddPhoto => LimitScope::Global,
            Self::AddStep | Self::AddPaintAssignment | Self::AddNote => LimitScope::PerProject,
        }
    }

    /// The limit this action is checked against on the given tier.
    pub fn limit(&self, tier: Tier) -> Limit {
        let table = limits(tier);
        match self {
            Self::AddPaint => table.paints,
            Self::AddProject => table.projects,
            Self::AddPhoto => table.photos,
            Self::AddStep => table.steps_per_project,
            Self::AddPaintAssignment => table.assignments_per_project,
            Self::AddNote => table.notes_per_project,
        }
    }
}

// ---------------------------------------------------------------------------
// Usage counters
// ---------------------------------------------------------------------------

/// Account-wide usage, recomputed from the document graph on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    pub paints: u32,
    pub projects: u32,
    pub photos: u32,
}

/// Recompute account-wide usage from a snapshot of the paint inventory size
/// and the full project graph. Never maintained incrementally.
pub fn recompute_usage(paint_inventory_count: usize, projects: &[Project]) -> UsageCounters {
    UsageCounters {
        paints: paint_inventory_count as u32,
        projects: projects.len() as u32,
        photos: projects.iter().map(Project::photo_count).sum(),
    }
}

fn current_count(action: LimitAction, usage: &UsageCounters, project: Option<&Project>) -> u32 {
    match action {
        LimitAction::AddPaint => usage.paints,
        LimitAction::AddProject => usage.projects,
        LimitAction::AddPhoto => usage.photos,
        // Project-scoped counts are recounted from the snapshot each call.
        LimitAction::AddStep => project.map_or(0, Project::step_count),
        LimitAction::AddPaintAssignment => project.map_or(0, Project::assignment_count),
        LimitAction::AddNote => project.map_or(0, Project::note_count),
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Whether the user may perform `requested` more of `action` on `tier`.
pub fn can_perform(
    action: LimitAction,
    requested: u32,
    tier: Tier,
    usage: &UsageCounters,
    project: Option<&Project>,
) -> bool {
    let used = current_count(action, usage, project);
    let allowed = action.limit(tier).allows(used, requested);
    if !allowed {
        tracing::debug!(
            action = action.as_str(),
            tier = tier.as_str(),
            used,
            requested,
            "usage limit denied"
        );
    }
    allowed
}

/// How many more of the action's resource the user may create.
pub fn remaining_allowance(
    action: LimitAction,
    tier: Tier,
    usage: &UsageCounters,
    project: Option<&Project>,
) -> Allowance {
    action
        .limit(tier)
        .remaining(current_count(action, usage, project))
}

/// Human-readable message shown when a limit blocks an action.
pub fn upgrade_message(action: LimitAction, tier: Tier) -> String {
    let resource = action.resource_label();
    match (action.limit(tier), tier.next()) {
        (Limit::Bounded(max), Some(next)) => format!(
            "You've reached the {} plan limit of {max} {resource}. Upgrade to {} to keep going.",
            tier.label(),
            next.label()
        ),
        (Limit::Bounded(max), None) => format!(
            "You've reached the {} plan limit of {max} {resource}.",
            tier.label()
        ),
        (Limit::Unlimited, _) => format!(
            "Your {} plan has no limit on {resource}.",
            tier.label()
        ),
    }
}

// ---------------------------------------------------------------------------
// Account summary
// ---------------------------------------------------------------------------

/// One row of the account usage screen.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LimitStatus {
    pub action: LimitAction,
    pub used: u32,
    pub limit: Limit,
}

/// Per-resource used/limit rows for the account-wide resources.
pub fn usage_summary(tier: Tier, usage: &UsageCounters) -> Vec<LimitStatus> {
    [
        LimitAction::AddPaint,
        LimitAction::AddProject,
        LimitAction::AddPhoto,
    ]
    .into_iter()
    .map(|action| LimitStatus {
        action,
        used: current_count(action, usage, None),
        limit: action.limit(tier),
    })
    .collect()
}
