//! Project entity and its draft/patch shapes.

use serde::{Deserialize, Serialize};

use crate::entity::{Completable, Entity};

/// Minimum project name length in characters, after trimming.
pub const MIN_PROJECT_NAME_LENGTH: usize = 3;

/// Maximum project name length in characters, after trimming.
pub const MAX_PROJECT_NAME_LENGTH: usize = 100;

/// Maximum project description length in characters.
pub const MAX_PROJECT_DESCRIPTION_LENGTH: usize = 500;

/// Maximum milestone length in characters.
pub const MAX_MILESTONE_LENGTH: usize = 200;

/// Minimum assignee name length when one is set.
pub const MIN_ASSIGNEE_LENGTH: usize = 3;

/// Maximum assignee name length when one is set.
pub const MAX_ASSIGNEE_LENGTH: usize = 50;

/// Store-assigned project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Not started yet (default).
    #[default]
    Planning,
    /// Work in progress.
    Active,
    /// Finished.
    Completed,
}

impl ProjectStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Planning, Self::Active, Self::Completed];

    /// Parses a status name, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planning" => Some(Self::Planning),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Capitalised label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// The next status when cycling through the lifecycle in a form.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Planning => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::Planning,
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A project in UI-facing shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Store-assigned identifier.
    pub id: ProjectId,
    /// Project name (3 to 100 characters).
    pub name: String,
    /// Description (up to 500 characters).
    pub description: String,
    /// Lifecycle stage.
    pub status: ProjectStatus,
    /// Next milestone (up to 200 characters).
    pub milestone: String,
    /// Name of the responsible user; empty when unassigned.
    pub assignee: String,
}

impl Entity for Project {
    type Id = ProjectId;

    const KIND: &'static str = "project";

    fn id(&self) -> ProjectId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn assignee(&self) -> Option<&str> {
        if self.assignee.is_empty() {
            None
        } else {
            Some(&self.assignee)
        }
    }
}

/// Completing a project marks it `completed`; reopening puts it back to
/// `active`, since a reopened project is by definition already underway.
impl Completable for Project {
    fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }

    fn set_completed(&mut self, completed: bool) {
        self.status = if completed {
            ProjectStatus::Completed
        } else {
            ProjectStatus::Active
        };
    }
}

/// Fields a user supplies when creating a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    /// Project name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Initial status.
    pub status: ProjectStatus,
    /// Milestone text.
    pub milestone: String,
    /// Responsible user's name, empty for none.
    pub assignee: String,
}

impl From<&Project> for ProjectDraft {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            milestone: project.milestone.clone(),
            assignee: project.assignee.clone(),
        }
    }
}

/// A partial update to a project. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status.
    pub status: Option<ProjectStatus>,
    /// New milestone.
    pub milestone: Option<String>,
    /// New assignee (empty string unassigns).
    pub assignee: Option<String>,
}

impl ProjectPatch {
    /// A patch that only changes the status.
    #[must_use]
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl From<ProjectDraft> for ProjectPatch {
    fn from(draft: ProjectDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            status: Some(draft.status),
            milestone: Some(draft.milestone),
            assignee: Some(draft.assignee),
        }
    }
}
