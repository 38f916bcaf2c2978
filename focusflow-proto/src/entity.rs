//! Traits shared by every list-backed entity.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A record with a stable identifier, owned by exactly one list view.
pub trait Entity: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Identifier type assigned by the store.
    type Id: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// Human-readable entity kind, used in notifications and logs.
    const KIND: &'static str;

    /// Returns the store-assigned identifier.
    fn id(&self) -> Self::Id;

    /// Returns the name a user would recognise this record by.
    fn label(&self) -> &str;

    /// Returns the assigned user's name, if any.
    fn assignee(&self) -> Option<&str>;
}

/// An entity with a binary done/not-done state that can be toggled in place.
pub trait Completable: Entity {
    /// Whether the entity currently counts as completed.
    fn is_completed(&self) -> bool;

    /// Sets the completed state.
    fn set_completed(&mut self, completed: bool);
}
