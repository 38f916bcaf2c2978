//! What a list page renders, derived from its reconciler and query.

/// Follow-up offered by an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyAction {
    /// Open the create form.
    CreateItem,
    /// Reset search and filters.
    ClearFilters,
}

/// Why a loaded list shows nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The source list itself is empty.
    NoItems,
    /// The source list has entries but none pass the filters.
    NoMatches,
}

impl EmptyState {
    /// The action the empty state offers.
    #[must_use]
    pub const fn action(self) -> EmptyAction {
        match self {
            Self::NoItems => EmptyAction::CreateItem,
            Self::NoMatches => EmptyAction::ClearFilters,
        }
    }

    /// Heading for an entity kind (`"task"`, `"project"`).
    #[must_use]
    pub fn title(self, kind: &str) -> String {
        match self {
            Self::NoItems => format!("No {kind}s yet"),
            Self::NoMatches => format!("No matching {kind}s"),
        }
    }

    /// Explanatory line under the heading.
    #[must_use]
    pub fn description(self, kind: &str) -> String {
        match self {
            Self::NoItems => format!("Create your first {kind} to get started."),
            Self::NoMatches => {
                "Try adjusting your search or filters to find what you're looking for.".to_string()
            }
        }
    }

    /// Label of the action button.
    #[must_use]
    pub fn action_label(self, kind: &str) -> String {
        match self {
            Self::NoItems => format!("Create {kind}"),
            Self::NoMatches => "Clear Filters".to_string(),
        }
    }
}

/// The rendered state of a list page.
#[derive(Debug, PartialEq)]
pub enum ListView<'a, E> {
    /// First load in progress.
    Loading,
    /// Nothing could be loaded.
    Failed {
        /// Why the load failed.
        message: &'a str,
    },
    /// Loaded, but nothing to show.
    Empty(EmptyState),
    /// Entries to render.
    Items {
        /// Entries passing the query, in display order.
        shown: Vec<&'a E>,
        /// Size of the unfiltered list.
        total: usize,
        /// Set when a reload failed and these entries may be stale.
        load_error: Option<&'a str>,
    },
}

impl<E> ListView<'_, E> {
    /// The "Showing N of M" footer, when entries are shown.
    #[must_use]
    pub fn footer(&self, kind: &str) -> Option<String> {
        match self {
            Self::Items { shown, total, .. } => {
                Some(format!("Showing {} of {total} {kind}s", shown.len()))
            }
            _ => None,
        }
    }
}
