//! Awaitable versions of the reconciler operations.
//!
//! Each helper runs the begin step, awaits the repository and runs the
//! settle step, so callers that own both the list and the repository in one
//! task (tests, scripted flows) get the whole round-trip in one call. The
//! interactive UI performs the same steps across the dispatcher instead.

use focusflow_proto::{Completable, Entity};

use super::{ListReconciler, Settled};
use crate::notify::Notification;
use crate::service::{CompletionPatch, Repository};

/// Fetches the full list and replaces local state.
///
/// Returns the error notification on failure; the previous list is kept.
pub async fn load<R: Repository>(
    list: &mut ListReconciler<R::Entity>,
    repo: &R,
) -> Option<Notification> {
    list.begin_load();
    let result = repo.get_all().await;
    list.apply_load(result)
}

/// Optimistically flips `id`'s completed state and persists it.
///
/// Unknown ids, and ids with a toggle already in flight, are a silent no-op
/// returning `None`.
pub async fn toggle_complete<R>(
    list: &mut ListReconciler<R::Entity>,
    repo: &R,
    id: <R::Entity as Entity>::Id,
) -> Option<Settled<<R::Entity as Entity>::Id>>
where
    R: Repository,
    R::Entity: Completable,
    R::Patch: CompletionPatch,
{
    let completed = list.begin_toggle(id)?;
    tracing::debug!(kind = <R::Entity as Entity>::KIND, %id, completed, "toggle persisting");
    let result = repo.update(id, R::Patch::completion(completed)).await;
    list.settle_toggle(id, result)
}

/// Deletes `id` in the store, then locally.
///
/// Returns `None` when `id` is not in the list; nothing is sent to the store.
pub async fn delete_entity<R: Repository>(
    list: &mut ListReconciler<R::Entity>,
    repo: &R,
    id: <R::Entity as Entity>::Id,
) -> Option<Notification> {
    list.get(id)?;
    let result = repo.delete(id).await;
    Some(list.settle_delete(id, result))
}
