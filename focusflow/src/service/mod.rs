//! Data-access services for tasks, projects and users.
//!
//! Each entity kind is reached through an async trait so the backing store
//! (the in-memory tables in [`memory`], or a remote backend) can be swapped
//! without touching the reconciler or the forms. Backend failures are turned
//! into a [`ServiceError`] at this boundary; callers never see a
//! transport-specific error shape.

pub mod access;
pub mod memory;
pub mod seed;

use std::future::Future;

use focusflow_proto::{
    Entity, Project, ProjectDraft, ProjectPatch, ProjectStatus, Stats, Task, TaskDraft, TaskId,
    TaskPatch, User, UserId,
};

pub use access::{AccessPolicy, Guarded, OwnershipPolicy};
pub use memory::{MemoryProjectStore, MemoryTaskStore, MemoryUserDirectory, Operation};

/// Errors surfaced by a data-access service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Fetching a list failed.
    #[error("failed to load {kind}s: {reason}")]
    Load {
        /// Entity kind that was being listed.
        kind: &'static str,
        /// Human-readable cause.
        reason: String,
    },

    /// The referenced identifier does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity kind that was looked up.
        kind: &'static str,
        /// The missing identifier.
        id: String,
    },

    /// The backend rejected the record.
    #[error("invalid {kind}: {reason}")]
    Validation {
        /// Entity kind being written.
        kind: &'static str,
        /// Which constraint failed.
        reason: String,
    },

    /// The acting user may not modify this entity.
    #[error("{actor} cannot modify {kind} {id} assigned to {owner}")]
    Access {
        /// Entity kind being modified.
        kind: &'static str,
        /// The entity's identifier.
        id: String,
        /// Who attempted the change.
        actor: String,
        /// Who the entity is assigned to.
        owner: String,
    },

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl ServiceError {
    /// Builds a [`ServiceError::NotFound`] for an entity id.
    pub fn not_found<E: Entity>(id: E::Id) -> Self {
        Self::NotFound {
            kind: E::KIND,
            id: id.to_string(),
        }
    }
}

/// CRUD access to one entity kind.
///
/// All operations are async and settle independently; a caller may have
/// several in flight at once.
pub trait Repository: Send + Sync + 'static {
    /// Entity type served by this repository.
    type Entity: Entity;
    /// Shape accepted by [`create`](Self::create).
    type Draft: Send + 'static;
    /// Shape accepted by [`update`](Self::update).
    type Patch: Send + 'static;

    /// Fetches every entity.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Self::Entity>, ServiceError>> + Send;

    /// Fetches one entity by id.
    fn get_by_id(
        &self,
        id: <Self::Entity as Entity>::Id,
    ) -> impl Future<Output = Result<Self::Entity, ServiceError>> + Send;

    /// Creates an entity; the store assigns its id (and order and timestamps
    /// where the kind has them).
    fn create(
        &self,
        draft: Self::Draft,
    ) -> impl Future<Output = Result<Self::Entity, ServiceError>> + Send;

    /// Merges `patch` into an existing entity and returns the result.
    fn update(
        &self,
        id: <Self::Entity as Entity>::Id,
        patch: Self::Patch,
    ) -> impl Future<Output = Result<Self::Entity, ServiceError>> + Send;

    /// Removes an entity and returns what was removed.
    fn delete(
        &self,
        id: <Self::Entity as Entity>::Id,
    ) -> impl Future<Output = Result<Self::Entity, ServiceError>> + Send;

    /// Summary counts over the whole collection.
    fn get_stats(&self) -> impl Future<Output = Result<Stats, ServiceError>> + Send;
}

/// Task-specific operations on top of [`Repository`].
pub trait TaskRepository:
    Repository<Entity = Task, Draft = TaskDraft, Patch = TaskPatch>
{
    /// Reassigns `order` to 1..N following the position of each id in
    /// `ids`. Unknown ids are skipped.
    fn update_order(&self, ids: Vec<TaskId>)
    -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Marker for the project repository shape.
pub trait ProjectRepository:
    Repository<Entity = Project, Draft = ProjectDraft, Patch = ProjectPatch>
{
}

impl<T> ProjectRepository for T where
    T: Repository<Entity = Project, Draft = ProjectDraft, Patch = ProjectPatch>
{
}

/// Read-only lookup of users for assignee pickers.
pub trait UserDirectory: Send + Sync + 'static {
    /// All users.
    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, ServiceError>> + Send;

    /// One user by id.
    fn get_by_id(&self, id: UserId) -> impl Future<Output = Result<User, ServiceError>> + Send;

    /// One user by exact display name, if any.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<User>, ServiceError>> + Send;
}

/// Builds the patch that sets an entity's completed state.
pub trait CompletionPatch {
    /// Patch that marks the entity completed (or not).
    fn completion(completed: bool) -> Self;
}

impl CompletionPatch for TaskPatch {
    fn completion(completed: bool) -> Self {
        Self::completed(completed)
    }
}

impl CompletionPatch for ProjectPatch {
    fn completion(completed: bool) -> Self {
        Self::status(if completed {
            ProjectStatus::Completed
        } else {
            ProjectStatus::Active
        })
    }
}
