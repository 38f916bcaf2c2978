//! Search and filter pipeline for task and project lists.
//!
//! Filtering never reorders: the result is always a subsequence of the
//! input, in input order. Task lists arrive from the store sorted by
//! `order`, so filtered views stay in display order too.

use crate::project::{Project, ProjectStatus};
use crate::task::{Priority, Task};

/// Task completion filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// No filtering.
    #[default]
    All,
    /// Only tasks that are not completed.
    Active,
    /// Only completed tasks.
    Completed,
}

impl StatusFilter {
    /// Filter options in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Label for filter pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Tasks",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Whether a task with the given completed flag passes this filter.
    #[must_use]
    pub const fn accepts(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }
}

/// Task priority filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    /// No filtering.
    #[default]
    All,
    /// Exact match on one priority.
    Only(Priority),
}

impl PriorityFilter {
    /// Filter options in display order.
    pub const ALL: [Self; 4] = [
        Self::All,
        Self::Only(Priority::High),
        Self::Only(Priority::Medium),
        Self::Only(Priority::Low),
    ];

    /// Label for filter pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Priorities",
            Self::Only(p) => p.label(),
        }
    }
}

/// Project status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectStatusFilter {
    /// No filtering.
    #[default]
    All,
    /// Exact match on one status.
    Only(ProjectStatus),
}

impl ProjectStatusFilter {
    /// Filter options in display order.
    pub const ALL: [Self; 4] = [
        Self::All,
        Self::Only(ProjectStatus::Planning),
        Self::Only(ProjectStatus::Active),
        Self::Only(ProjectStatus::Completed),
    ];

    /// Lowercase label, matching the status names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(s) => s.as_str(),
        }
    }
}

/// A predicate over list entries plus knowledge of whether it filters at all.
pub trait ListQuery<E> {
    /// Whether `entry` belongs in the filtered view.
    fn matches(&self, entry: &E) -> bool;

    /// Whether this query is the no-op "show everything" query.
    fn is_unfiltered(&self) -> bool;
}

/// Returns the entries of `list` accepted by `query`, in their original order.
///
/// Pure: the input is not modified and no entry is reordered.
#[must_use]
pub fn compute_filtered_view<'a, E, Q: ListQuery<E>>(list: &'a [E], query: &Q) -> Vec<&'a E> {
    list.iter().filter(|entry| query.matches(entry)).collect()
}

/// Case-insensitive substring match against any of `fields`.
///
/// An empty query matches everything.
fn matches_search(query: &str, fields: &[&str]) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Search, status and priority filters for the task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Free-text search over title and description.
    pub search: String,
    /// Completion filter.
    pub status: StatusFilter,
    /// Priority filter.
    pub priority: PriorityFilter,
}

impl ListQuery<Task> for TaskQuery {
    fn matches(&self, task: &Task) -> bool {
        if !matches_search(&self.search, &[&task.title, &task.description]) {
            return false;
        }
        if !self.status.accepts(task.completed) {
            return false;
        }
        match self.priority {
            PriorityFilter::All => true,
            PriorityFilter::Only(p) => task.priority == p,
        }
    }

    fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && self.status == StatusFilter::All
            && self.priority == PriorityFilter::All
    }
}

/// Search and status filters for the project list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    /// Free-text search over name and description.
    pub search: String,
    /// Status filter.
    pub status: ProjectStatusFilter,
}

impl ListQuery<Project> for ProjectQuery {
    fn matches(&self, project: &Project) -> bool {
        if !matches_search(&self.search, &[&project.name, &project.description]) {
            return false;
        }
        match self.status {
            ProjectStatusFilter::All => true,
            ProjectStatusFilter::Only(s) => project.status == s,
        }
    }

    fn is_unfiltered(&self) -> bool {
        self.search.is_empty() && self.status == ProjectStatusFilter::All
    }
}

/// Sorts tasks by `order` ascending. Stable, so equal orders keep their
/// relative position.
pub fn sort_by_order(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| task.order);
}

/// Per-filter task counts for the filter sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// All tasks.
    pub total: usize,
    /// Tasks not completed.
    pub active: usize,
    /// Completed tasks.
    pub completed: usize,
    /// High-priority tasks.
    pub high: usize,
    /// Medium-priority tasks.
    pub medium: usize,
    /// Low-priority tasks.
    pub low: usize,
}

impl TaskCounts {
    /// Counts over the full, unfiltered list.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut acc, task| {
            acc.total += 1;
            if task.completed {
                acc.completed += 1;
            } else {
                acc.active += 1;
            }
            match task.priority {
                Priority::High => acc.high += 1,
                Priority::Medium => acc.medium += 1,
                Priority::Low => acc.low += 1,
            }
            acc
        })
    }

    /// Count shown next to a status filter option.
    #[must_use]
    pub const fn for_status(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.total,
            StatusFilter::Active => self.active,
            StatusFilter::Completed => self.completed,
        }
    }

    /// Count shown next to a priority filter option.
    #[must_use]
    pub const fn for_priority(&self, filter: PriorityFilter) -> usize {
        match filter {
            PriorityFilter::All => self.total,
            PriorityFilter::Only(Priority::High) => self.high,
            PriorityFilter::Only(Priority::Medium) => self.medium,
            PriorityFilter::Only(Priority::Low) => self.low,
        }
    }
}

/// Number of projects in each status, for the status filter buttons.
#[must_use]
pub fn project_status_count(projects: &[Project], filter: ProjectStatusFilter) -> usize {
    match filter {
        ProjectStatusFilter::All => projects.len(),
        ProjectStatusFilter::Only(s) => projects.iter().filter(|p| p.status == s).count(),
    }
}
