//! Client-side list state with optimistic mutations.
//!
//! A [`ListReconciler`] owns the canonical copy of one page's list. Mutations
//! are split into a synchronous *begin* step (applied immediately so the UI
//! reflects the change) and a *settle* step that runs when the store answers.
//! The split lets the UI thread apply both halves while the store call itself
//! runs on a tokio task; the async helpers in [`driver`] chain the two for
//! callers that can simply await.
//!
//! Each reconciler carries a [`ViewToken`]. Results are tagged with the token
//! of the reconciler that asked for them, and results whose token no longer
//! matches the live reconciler are dropped.

pub mod driver;
pub mod pending;
pub mod view;

use std::sync::atomic::{AtomicU64, Ordering};

use focusflow_proto::filter::{ListQuery, compute_filtered_view};
use focusflow_proto::{Completable, Entity, Task, TaskId};

use crate::notify::Notification;
use crate::service::ServiceError;

pub use driver::{delete_entity, load, toggle_complete};
pub use pending::{MutationState, PendingMutations};
pub use view::{EmptyAction, EmptyState, ListView};

/// Identifies one live list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewToken(u64);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

impl ViewToken {
    /// Allocates a token never handed out before in this process.
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ViewToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Progress of the most recent load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A load is in flight.
    Loading,
    /// The last load succeeded.
    Ready,
    /// The last load failed with this message.
    Failed(String),
}

/// Outcome of settling an optimistic mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled<I> {
    /// The entity the mutation targeted.
    pub id: I,
    /// `Committed` or `RolledBack`.
    pub state: MutationState,
    /// Message for the user.
    pub notification: Notification,
}

/// Direction for [`ListReconciler::move_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// One position towards the top.
    Up,
    /// One position towards the bottom.
    Down,
}

/// Capitalised entity kind for user-facing messages.
fn noun(kind: &str) -> String {
    let mut chars = kind.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// The canonical list behind one page.
#[derive(Debug)]
pub struct ListReconciler<E: Entity> {
    token: ViewToken,
    items: Vec<E>,
    state: LoadState,
    pending: PendingMutations<E>,
}

impl<E: Entity> Default for ListReconciler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> ListReconciler<E> {
    /// An empty, never-loaded list with a fresh token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: ViewToken::fresh(),
            items: Vec::new(),
            state: LoadState::Idle,
            pending: PendingMutations::default(),
        }
    }

    /// A list that already holds `items`.
    #[must_use]
    pub fn with_items(items: Vec<E>) -> Self {
        Self {
            items,
            state: LoadState::Ready,
            ..Self::new()
        }
    }

    /// This view's token.
    #[must_use]
    pub const fn token(&self) -> ViewToken {
        self.token
    }

    /// Whether a result tagged `token` belongs to this view.
    #[must_use]
    pub fn owns(&self, token: ViewToken) -> bool {
        self.token == token
    }

    /// The full, unfiltered list in display order.
    #[must_use]
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// The entity with `id`, if present.
    #[must_use]
    pub fn get(&self, id: E::Id) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Progress of the latest load.
    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.state
    }

    /// Whether an optimistic mutation on `id` is waiting for the store.
    #[must_use]
    pub fn is_pending(&self, id: E::Id) -> bool {
        self.pending.contains(id)
    }

    fn index_of(&self, id: E::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Marks a load as started.
    pub fn begin_load(&mut self) {
        tracing::debug!(kind = E::KIND, token = %self.token, "load started");
        self.state = LoadState::Loading;
    }

    /// Applies a finished load.
    ///
    /// Success replaces the list. Failure keeps whatever was shown before,
    /// records the error and returns a notification; the caller may retry.
    pub fn apply_load(&mut self, result: Result<Vec<E>, ServiceError>) -> Option<Notification> {
        match result {
            Ok(items) => {
                tracing::debug!(kind = E::KIND, count = items.len(), "load applied");
                self.items = items;
                self.state = LoadState::Ready;
                None
            }
            Err(e) => {
                tracing::warn!(kind = E::KIND, error = %e, "load failed");
                self.state = LoadState::Failed(e.to_string());
                Some(Notification::error(format!(
                    "Failed to load {}s. Please try again.",
                    E::KIND
                )))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Local edits confirmed by the store
    // -----------------------------------------------------------------------

    /// Puts a newly created entity at the top of the list.
    pub fn insert_front(&mut self, entity: E) {
        self.items.insert(0, entity);
    }

    /// Puts a newly created entity at the bottom of the list.
    pub fn append(&mut self, entity: E) {
        self.items.push(entity);
    }

    /// Replaces the entity with the same id in place. Returns `false` if it
    /// is not in the list.
    pub fn replace(&mut self, entity: E) -> bool {
        match self.index_of(entity.id()) {
            Some(index) => {
                self.items[index] = entity;
                true
            }
            None => false,
        }
    }

    /// Removes the entity with `id` after the store confirmed the deletion.
    pub fn remove_confirmed(&mut self, id: E::Id) -> Option<E> {
        let index = self.index_of(id)?;
        Some(self.items.remove(index))
    }

    /// Applies the store's answer to a delete request.
    ///
    /// Only success removes anything; failure leaves the list as it was.
    pub fn settle_delete(&mut self, id: E::Id, result: Result<E, ServiceError>) -> Notification {
        match result {
            Ok(_) => {
                self.remove_confirmed(id);
                tracing::info!(kind = E::KIND, %id, "delete settled");
                Notification::success(format!("{} deleted successfully", noun(E::KIND)))
            }
            Err(e) => {
                tracing::warn!(kind = E::KIND, %id, error = %e, "delete failed");
                Notification::error(format!("Failed to delete {}", E::KIND))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Derived view
    // -----------------------------------------------------------------------

    /// What the page should show for `query`.
    pub fn view<Q: ListQuery<E>>(&self, query: &Q) -> ListView<'_, E> {
        let load_error = match &self.state {
            LoadState::Failed(message) => Some(message.as_str()),
            _ => None,
        };
        if self.items.is_empty() {
            return match (&self.state, load_error) {
                (LoadState::Idle | LoadState::Loading, _) => ListView::Loading,
                (_, Some(message)) => ListView::Failed { message },
                _ => ListView::Empty(EmptyState::NoItems),
            };
        }
        let shown = compute_filtered_view(&self.items, query);
        if shown.is_empty() {
            return ListView::Empty(EmptyState::NoMatches);
        }
        ListView::Items {
            shown,
            total: self.items.len(),
            load_error,
        }
    }
}

impl<E: Completable> ListReconciler<E> {
    /// Flips the completed state of `id` locally.
    ///
    /// Returns the new state to persist, or `None` when `id` is unknown or
    /// already has a change in flight (the list is untouched either way).
    pub fn begin_toggle(&mut self, id: E::Id) -> Option<bool> {
        let index = self.index_of(id)?;
        let snapshot = self.items[index].clone();
        let target = !snapshot.is_completed();
        if !self.pending.begin(snapshot) {
            tracing::debug!(kind = E::KIND, %id, "toggle ignored, already pending");
            return None;
        }
        self.items[index].set_completed(target);
        Some(target)
    }

    /// Applies the store's answer to a toggle started with
    /// [`begin_toggle`](Self::begin_toggle).
    ///
    /// On success the stored entity replaces the local one. On failure only
    /// this entity is restored to its snapshot. Returns `None` if no toggle
    /// was pending for `id`.
    pub fn settle_toggle(
        &mut self,
        id: E::Id,
        result: Result<E, ServiceError>,
    ) -> Option<Settled<E::Id>> {
        let snapshot = self.pending.finish(id)?;
        let settled = match result {
            Ok(stored) => {
                let message = if stored.is_completed() {
                    format!("{} completed!", noun(E::KIND))
                } else {
                    format!("{} reopened", noun(E::KIND))
                };
                self.replace(stored);
                Settled {
                    id,
                    state: MutationState::Committed,
                    notification: Notification::success(message),
                }
            }
            Err(e) => {
                tracing::warn!(kind = E::KIND, %id, error = %e, "toggle rolled back");
                self.replace(snapshot);
                Settled {
                    id,
                    state: MutationState::RolledBack,
                    notification: Notification::error(format!("Failed to update {}", E::KIND)),
                }
            }
        };
        Some(settled)
    }
}

impl ListReconciler<Task> {
    /// Moves a task one slot up or down within what `query` shows and
    /// renumbers `order` 1..N.
    ///
    /// The task is placed just before (up) or just after (down) its visible
    /// neighbour, so tasks hidden by the filter never count as a slot.
    /// Returns the new id sequence to persist, or `None` if the task is not
    /// shown or already at that edge of the view.
    pub fn move_task<Q: ListQuery<Task>>(
        &mut self,
        id: TaskId,
        direction: Move,
        query: &Q,
    ) -> Option<Vec<TaskId>> {
        let visible: Vec<TaskId> = compute_filtered_view(&self.items, query)
            .iter()
            .map(|task| task.id)
            .collect();
        let slot = visible.iter().position(|&shown| shown == id)?;
        let neighbour = match direction {
            Move::Up => visible[slot.checked_sub(1)?],
            Move::Down => *visible.get(slot + 1)?,
        };

        let task = self.items.remove(self.index_of(id)?);
        let anchor = self.index_of(neighbour)?;
        let at = match direction {
            Move::Up => anchor,
            Move::Down => anchor + 1,
        };
        self.items.insert(at, task);
        let mut order = 0;
        for task in &mut self.items {
            order += 1;
            task.order = order;
        }
        Some(self.items.iter().map(|task| task.id).collect())
    }
}
