//! Read-only user lookup entity used to populate assignee choices.

use serde::{Deserialize, Serialize};

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team member that tasks and projects can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier.
    pub id: UserId,
    /// Display name; assignee fields reference users by this name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Job role, shown next to the name in pickers.
    pub role: String,
}
