//! Summary statistics over a full entity list.
//!
//! Always computed from the unfiltered list; a filtered view would skew the
//! completion rate.

use serde::{Deserialize, Serialize};

use crate::entity::Completable;
use crate::project::{Project, ProjectStatus};

/// Aggregate progress counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of entities.
    pub total: usize,
    /// Number counted as completed.
    pub completed: usize,
    /// Number counted as active.
    pub active: usize,
    /// `round(100 * completed / total)`, or 0 for an empty list.
    pub completion_rate: u32,
}

/// Integer percentage of `part` in `total`, rounded half up. Zero when
/// `total` is zero.
#[must_use]
pub fn completion_rate(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u128;
    let total = total as u128;
    // floor(100 * part / total + 1/2)
    let rate = (200 * part + total) / (2 * total);
    u32::try_from(rate).unwrap_or(100)
}

impl Stats {
    /// Stats for a list where every entry not completed is active.
    #[must_use]
    pub fn from_completable<E: Completable>(items: &[E]) -> Self {
        let total = items.len();
        let completed = items.iter().filter(|e| e.is_completed()).count();
        Self {
            total,
            completed,
            active: total - completed,
            completion_rate: completion_rate(completed, total),
        }
    }

    /// Project stats. Only `active` projects count as active; projects still
    /// in planning count towards neither bucket.
    #[must_use]
    pub fn for_projects(projects: &[Project]) -> Self {
        let total = projects.len();
        let count = |status| projects.iter().filter(|p| p.status == status).count();
        let completed = count(ProjectStatus::Completed);
        Self {
            total,
            completed,
            active: count(ProjectStatus::Active),
            completion_rate: completion_rate(completed, total),
        }
    }
}
