//! Shared model definitions for Focus Flow.
//!
//! Everything in this crate is pure: entity types, the field mapper that
//! normalises storage records, the list filter pipeline and summary stats.
//! No module here performs I/O.

pub mod entity;
pub mod fields;
pub mod filter;
pub mod project;
pub mod stats;
pub mod task;
pub mod user;

pub use entity::{Completable, Entity};
pub use project::{Project, ProjectDraft, ProjectId, ProjectPatch, ProjectStatus};
pub use stats::Stats;
pub use task::{Priority, Task, TaskDraft, TaskId, TaskPatch};
pub use user::{User, UserId};
