//! Bookkeeping for optimistic mutations.
//!
//! Every optimistic change records the entity as it was before the change.
//! The mutation then moves `Pending -> Committed` when the store confirms it,
//! or `Pending -> RolledBack` when the store rejects it and the snapshot is
//! restored. At most one mutation per entity is pending at a time.

use std::collections::HashMap;

use focusflow_proto::Entity;

/// Where an optimistic mutation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Applied locally, waiting for the store.
    Pending,
    /// The store accepted the change.
    Committed,
    /// The store rejected the change; the snapshot was restored.
    RolledBack,
}

/// Snapshots of entities with an optimistic change in flight.
#[derive(Debug)]
pub struct PendingMutations<E: Entity> {
    snapshots: HashMap<E::Id, E>,
}

impl<E: Entity> Default for PendingMutations<E> {
    fn default() -> Self {
        Self {
            snapshots: HashMap::new(),
        }
    }
}

impl<E: Entity> PendingMutations<E> {
    /// Records `snapshot` as the pre-change state of its entity.
    ///
    /// Returns `false` (and records nothing) if a mutation for that entity
    /// is already pending.
    pub fn begin(&mut self, snapshot: E) -> bool {
        let id = snapshot.id();
        if self.snapshots.contains_key(&id) {
            return false;
        }
        self.snapshots.insert(id, snapshot);
        true
    }

    /// Ends the pending mutation for `id`, returning its snapshot.
    pub fn finish(&mut self, id: E::Id) -> Option<E> {
        self.snapshots.remove(&id)
    }

    /// The state of the mutation for `id`, if one is in flight.
    #[must_use]
    pub fn state(&self, id: E::Id) -> Option<MutationState> {
        self.snapshots
            .contains_key(&id)
            .then_some(MutationState::Pending)
    }

    /// Whether a mutation for `id` is in flight.
    #[must_use]
    pub fn contains(&self, id: E::Id) -> bool {
        self.snapshots.contains_key(&id)
    }

    /// Number of mutations in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
