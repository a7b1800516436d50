//! Project, step, and paint assignment records plus maintenance logic.
//!
//! These are plain records mirroring the documents owned by the persistence
//! layer. The maintenance helpers mutate only caller-owned data and uphold
//! the step ordering invariant: `order` values are unique and dense (1..N)
//! within a project after any reorder.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::difficulty::DifficultyTier;
use crate::error::CoreError;
use crate::types::{DocId, Timestamp};

// ---------------------------------------------------------------------------
// Length limits
// ---------------------------------------------------------------------------

/// Maximum length for a project name (mirrored in `ProjectDraft`).
pub const MAX_PROJECT_NAME_LENGTH: usize = 120;

/// Maximum length for a step title (mirrored in `StepDraft`).
pub const MAX_STEP_TITLE_LENGTH: usize = 200;

/// Maximum length for a step description (mirrored in `StepDraft`).
pub const MAX_STEP_DESCRIPTION_LENGTH: usize = 2000;

/// Maximum length for a single note.
pub const MAX_NOTE_LENGTH: usize = 1000;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Project lifecycle status.
///
/// Transitions are free-form: the UI may move a project from any status to
/// any other, so no state machine is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Upcoming,
    Started,
    Completed,
}

impl ProjectStatus {
    /// Convert from a document-store string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "started" => Ok(Self::Started),
            "completed" => Ok(Self::Completed),
            _ => Err(format!(
                "Invalid project status '{s}'. Must be one of: upcoming, started, completed"
            )),
        }
    }

    /// Convert to the document-store string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Started => "started",
            Self::Completed => "completed",
        }
    }
}

/// Painting technique recorded on a paint assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    Basecoat,
    Layering,
    Drybrush,
    Wash,
    Glaze,
    Highlight,
    Blending,
    Freehand,
}

impl Technique {
    /// Convert from a document-store string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "basecoat" => Ok(Self::Basecoat),
            "layering" => Ok(Self::Layering),
            "drybrush" => Ok(Self::Drybrush),
            "wash" => Ok(Self::Wash),
            "glaze" => Ok(Self::Glaze),
            "highlight" => Ok(Self::Highlight),
            "blending" => Ok(Self::Blending),
            "freehand" => Ok(Self::Freehand),
            _ => Err(format!("Invalid technique '{s}'")),
        }
    }

    /// Convert to the document-store string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basecoat => "basecoat",
            Self::Layering => "layering",
            Self::Drybrush => "drybrush",
            Self::Wash => "wash",
            Self::Glaze => "glaze",
            Self::Highlight => "highlight",
            Self::Blending => "blending",
            Self::Freehand => "freehand",
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A paint assigned to a step, with how it was used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintAssignment {
    pub paint_id: DocId,
    pub paint_name: String,
    pub brand: String,
    pub paint_type: String,
    pub usage: String,
    pub technique: Technique,
    pub assigned_at: Timestamp,
}

/// A free-text note attached to a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub created_at: Timestamp,
}

/// Project-level summary entry for a paint used anywhere in the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintRef {
    pub paint_id: DocId,
    pub name: String,
    pub brand: String,
}

/// One step of a painting project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub id: DocId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Display sequence, unique and dense (1..N) within the project.
    pub order: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub paints: Vec<PaintAssignment>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// A miniature-painting project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: DocId,
    pub name: String,
    pub status: ProjectStatus,
    pub difficulty: DifficultyTier,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub paint_overview: Vec<PaintRef>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// Validated input for creating a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProjectDraft {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// Validated input for creating a step.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StepDraft {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
}

impl Project {
    /// Build a new upcoming project from a validated draft.
    pub fn from_draft(draft: ProjectDraft, id: DocId, now: Timestamp) -> Result<Self, CoreError> {
        draft
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        Ok(Self {
            id,
            name: draft.name,
            status: ProjectStatus::Upcoming,
            difficulty: DifficultyTier::Beginner,
            steps: Vec::new(),
            paint_overview: Vec::new(),
            photo_urls: Vec::new(),
            created_at: now,
        })
    }
}

impl Step {
    /// Build a new step from a validated draft, appended at `order`.
    pub fn from_draft(draft: StepDraft, id: DocId, order: u32) -> Result<Self, CoreError> {
        draft
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            order,
            completed: false,
            completed_at: None,
            paints: Vec::new(),
            photos: Vec::new(),
            notes: Vec::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Derived counts
// ---------------------------------------------------------------------------

impl Project {
    /// Number of steps.
    pub fn step_count(&self) -> u32 {
        self.steps.len() as u32
    }

    /// Number of paints in the project-level overview.
    pub fn paint_count(&self) -> u32 {
        self.paint_overview.len() as u32
    }

    /// Total photo count: project-level photos plus every step's photos.
    pub fn photo_count(&self) -> u32 {
        let step_photos: usize = self.steps.iter().map(|s| s.photos.len()).sum();
        (self.photo_urls.len() + step_photos) as u32
    }

    /// Number of distinct techniques used across all step assignments.
    pub fn unique_technique_count(&self) -> u32 {
        let techniques: std::collections::BTreeSet<Technique> = self
            .steps
            .iter()
            .flat_map(|s| s.paints.iter().map(|p| p.technique))
            .collect();
        techniques.len() as u32
    }

    /// Total paint assignments across all steps.
    pub fn assignment_count(&self) -> u32 {
        self.steps.iter().map(|s| s.paints.len() as u32).sum()
    }

    /// Total notes across all steps.
    pub fn note_count(&self) -> u32 {
        self.steps.iter().map(|s| s.notes.len() as u32).sum()
    }
}

// ---------------------------------------------------------------------------
// Step ordering
// ---------------------------------------------------------------------------

impl Project {
    /// Reassign dense, unique `order` values (1..N) preserving the current
    /// relative sequence. Ties in stored order keep their array position.
    pub fn normalize_step_order(&mut self) {
        self.steps.sort_by_key(|s| s.order);
        for (idx, step) in self.steps.iter_mut().enumerate() {
            step.order = idx as u32 + 1;
        }
    }

    /// Move a step to a new 1-based position and renormalize ordering.
    ///
    /// Positions outside `[1, N]` are clamped. Unknown step ids return
    /// `CoreError::NotFound`.
    pub fn reorder_step(&mut self, step_id: &str, new_position: usize) -> Result<(), CoreError> {
        self.normalize_step_order();

        let from = self
            .steps
            .iter()
            .position(|s| s.id == step_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "step",
                id: step_id.to_string(),
            })?;

        let to = new_position.clamp(1, self.steps.len()) - 1;
        let step = self.steps.remove(from);
        self.steps.insert(to, step);

        for (idx, step) in self.steps.iter_mut().enumerate() {
            step.order = idx as u32 + 1;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Step mutation
// ---------------------------------------------------------------------------

impl Step {
    /// Mark the step completed at the given time.
    pub fn mark_completed(&mut self, now: Timestamp) {
        self.completed = true;
        self.completed_at = Some(now);
    }

    /// Clear the completed flag and timestamp.
    pub fn mark_incomplete(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }

    /// Assign a paint to this step.
    ///
    /// A paint may be assigned to many steps, but only once per step;
    /// duplicates return `CoreError::Conflict`.
    pub fn assign_paint(&mut self, assignment: PaintAssignment) -> Result<(), CoreError> {
        if self.paints.iter().any(|p| p.paint_id == assignment.paint_id) {
            return Err(CoreError::Conflict(format!(
                "Paint '{}' is already assigned to this step",
                assignment.paint_name
            )));
        }
        self.paints.push(assignment);
        Ok(())
    }

    /// Remove a paint assignment from this step. Removal is independent of
    /// the same paint's assignments on other steps.
    pub fn remove_paint(&mut self, paint_id: &str) -> Result<PaintAssignment, CoreError> {
        let idx = self
            .paints
            .iter()
            .position(|p| p.paint_id == paint_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "paint_assignment",
                id: paint_id.to_string(),
            })?;
        Ok(self.paints.remove(idx))
    }

    /// Append a note, rejecting empty or oversized text.
    pub fn add_note(&mut self, text: String, now: Timestamp) -> Result<(), CoreError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("Note text must not be empty".into()));
        }
        if trimmed.len() > MAX_NOTE_LENGTH {
            return Err(CoreError::Validation(format!(
                "Note text must not exceed {MAX_NOTE_LENGTH} characters"
            )));
        }
        self.notes.push(Note {
            text: trimmed.to_string(),
            created_at: now,
        });
        Ok(())
    }
}
