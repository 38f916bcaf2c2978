//! Task entity and the draft/patch shapes used to create and edit it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Completable, Entity};
use crate::project::ProjectId;

/// Minimum task title length in characters, after trimming.
pub const MIN_TASK_TITLE_LENGTH: usize = 3;

/// Store-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Needs attention first.
    High,
    /// The default priority.
    #[default]
    Medium,
    /// Can wait.
    Low,
}

impl Priority {
    /// All priorities, highest first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Parses a priority name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Wire name (`"high"`, `"medium"`, `"low"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Capitalised label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task in UI-facing shape.
///
/// `order` defines the display sequence within the owning list and is
/// reassigned 1..N whenever the list is reordered. Timestamps are assigned
/// by the store and may be absent on records from older backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Task title (at least three characters once trimmed).
    pub title: String,
    /// Free-form description, empty when not given.
    pub description: String,
    /// Task priority.
    pub priority: Priority,
    /// Whether the task is done.
    pub completed: bool,
    /// Name of the assigned user; empty when unassigned.
    pub assignee: String,
    /// Project this task belongs to.
    pub project_id: Option<ProjectId>,
    /// Display position (1-based once the list has been reordered).
    pub order: i64,
    /// When the store created the task.
    pub created_at: Option<DateTime<Utc>>,
    /// When the store last modified the task.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Task {
    type Id = TaskId;

    const KIND: &'static str = "task";

    fn id(&self) -> TaskId {
        self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn assignee(&self) -> Option<&str> {
        if self.assignee.is_empty() {
            None
        } else {
            Some(&self.assignee)
        }
    }
}

impl Completable for Task {
    fn is_completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

/// Fields a user supplies when creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: String,
    /// Priority, `medium` unless chosen.
    pub priority: Priority,
    /// Assigned user's name, empty for none.
    pub assignee: String,
    /// Owning project.
    pub project_id: Option<ProjectId>,
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            assignee: task.assignee.clone(),
            project_id: task.project_id,
        }
    }
}

/// A partial update to a task. `None` leaves the field untouched.
///
/// `project_id` is doubly optional so that a patch can clear the project
/// (`Some(None)`) as well as leave it alone (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New completed state.
    pub completed: Option<bool>,
    /// New assignee name (empty string unassigns).
    pub assignee: Option<String>,
    /// New project reference.
    pub project_id: Option<Option<ProjectId>>,
}

impl TaskPatch {
    /// A patch that only flips the completed flag.
    #[must_use]
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.assignee.is_none()
            && self.project_id.is_none()
    }
}

impl From<TaskDraft> for TaskPatch {
    fn from(draft: TaskDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            priority: Some(draft.priority),
            completed: None,
            assignee: Some(draft.assignee),
            project_id: Some(draft.project_id),
        }
    }
}
