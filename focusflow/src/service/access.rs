//! Ownership checks in front of a repository.
//!
//! [`Guarded`] wraps any [`Repository`] and consults an [`AccessPolicy`]
//! before every mutation of an existing entity. A rejected call never
//! reaches the inner store.

use focusflow_proto::{Entity, Stats, Task, TaskId};

use super::{Repository, ServiceError, TaskRepository};

/// Decides whether the acting user may mutate an entity.
pub trait AccessPolicy<E: Entity>: Send + Sync + 'static {
    /// Returns `Ok(())` if the change is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Access`] when it is not.
    fn authorize(&self, entity: &E) -> Result<(), ServiceError>;
}

/// No policy allows everything.
impl<E: Entity, P: AccessPolicy<E>> AccessPolicy<E> for Option<P> {
    fn authorize(&self, entity: &E) -> Result<(), ServiceError> {
        self.as_ref().map_or(Ok(()), |policy| policy.authorize(entity))
    }
}

/// Only the assignee (or anyone, for unassigned entities) may modify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipPolicy {
    actor: String,
}

impl OwnershipPolicy {
    /// Creates a policy acting as `actor`.
    #[must_use]
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
        }
    }

    /// The acting user's name.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }
}

impl<E: Entity> AccessPolicy<E> for OwnershipPolicy {
    fn authorize(&self, entity: &E) -> Result<(), ServiceError> {
        match entity.assignee() {
            None => Ok(()),
            Some(owner) if owner == self.actor => Ok(()),
            Some(owner) => Err(ServiceError::Access {
                kind: E::KIND,
                id: entity.id().to_string(),
                actor: self.actor.clone(),
                owner: owner.to_string(),
            }),
        }
    }
}

/// A repository whose updates and deletes pass an access check first.
#[derive(Debug)]
pub struct Guarded<R, P> {
    inner: R,
    policy: P,
}

impl<R, P> Guarded<R, P>
where
    R: Repository,
    P: AccessPolicy<R::Entity>,
{
    /// Wraps `inner` with `policy`.
    pub const fn new(inner: R, policy: P) -> Self {
        Self { inner, policy }
    }

    /// The wrapped repository.
    pub const fn inner(&self) -> &R {
        &self.inner
    }

    async fn check(&self, id: <R::Entity as Entity>::Id) -> Result<(), ServiceError> {
        let current = self.inner.get_by_id(id).await?;
        self.policy.authorize(&current).inspect_err(|e| {
            tracing::warn!(kind = <R::Entity as Entity>::KIND, %id, error = %e, "access denied");
        })
    }
}

impl<R, P> Repository for Guarded<R, P>
where
    R: Repository,
    P: AccessPolicy<R::Entity>,
{
    type Entity = R::Entity;
    type Draft = R::Draft;
    type Patch = R::Patch;

    async fn get_all(&self) -> Result<Vec<Self::Entity>, ServiceError> {
        self.inner.get_all().await
    }

    async fn get_by_id(
        &self,
        id: <Self::Entity as Entity>::Id,
    ) -> Result<Self::Entity, ServiceError> {
        self.inner.get_by_id(id).await
    }

    async fn create(&self, draft: Self::Draft) -> Result<Self::Entity, ServiceError> {
        self.inner.create(draft).await
    }

    async fn update(
        &self,
        id: <Self::Entity as Entity>::Id,
        patch: Self::Patch,
    ) -> Result<Self::Entity, ServiceError> {
        self.check(id).await?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: <Self::Entity as Entity>::Id) -> Result<Self::Entity, ServiceError> {
        self.check(id).await?;
        self.inner.delete(id).await
    }

    async fn get_stats(&self) -> Result<Stats, ServiceError> {
        self.inner.get_stats().await
    }
}

impl<R, P> TaskRepository for Guarded<R, P>
where
    R: TaskRepository,
    P: AccessPolicy<Task>,
{
    // Reordering touches display position only, so it is not owner-checked.
    async fn update_order(&self, ids: Vec<TaskId>) -> Result<(), ServiceError> {
        self.inner.update_order(ids).await
    }
}
