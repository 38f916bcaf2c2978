//! Searchable select used for the assignee and project fields.

use focusflow_proto::{Project, ProjectId, User};

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Clears the field.
    Nothing,
    /// A team member, stored by name.
    User {
        /// Display name written into the draft.
        name: String,
        /// Role shown next to the name.
        role: String,
    },
    /// A project, stored by id.
    Project {
        /// Reference written into the draft.
        id: ProjectId,
        /// Name shown in the list.
        name: String,
    },
}

impl Choice {
    /// Text shown in the option list and matched by the search.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Nothing => "None".to_string(),
            Self::User { name, role } if role.is_empty() => name.clone(),
            Self::User { name, role } => format!("{name} ({role})"),
            Self::Project { name, .. } => name.clone(),
        }
    }
}

impl From<&User> for Choice {
    fn from(user: &User) -> Self {
        Self::User {
            name: user.name.clone(),
            role: user.role.clone(),
        }
    }
}

impl From<&Project> for Choice {
    fn from(project: &Project) -> Self {
        Self::Project {
            id: project.id,
            name: project.name.clone(),
        }
    }
}

/// Assignee options: "None" followed by every user.
#[must_use]
pub fn user_choices(users: &[User]) -> Vec<Choice> {
    std::iter::once(Choice::Nothing)
        .chain(users.iter().map(Choice::from))
        .collect()
}

/// Project options: "None" followed by every project.
#[must_use]
pub fn project_choices(projects: &[Project]) -> Vec<Choice> {
    std::iter::once(Choice::Nothing)
        .chain(projects.iter().map(Choice::from))
        .collect()
}

/// A type-to-filter option list with a highlighted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    options: Vec<Choice>,
    search: String,
    highlighted: usize,
}

impl Picker {
    /// Creates a picker over `options` with an empty search.
    #[must_use]
    pub const fn new(options: Vec<Choice>) -> Self {
        Self {
            options,
            search: String::new(),
            highlighted: 0,
        }
    }

    /// Current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Options whose label contains the search text, ignoring case.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Choice> {
        let needle = self.search.to_lowercase();
        self.options
            .iter()
            .filter(|choice| choice.label().to_lowercase().contains(&needle))
            .collect()
    }

    /// Index of the highlighted row within [`filtered`](Self::filtered).
    #[must_use]
    pub const fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Appends to the search text and resets the highlight.
    pub fn push(&mut self, c: char) {
        self.search.push(c);
        self.highlighted = 0;
    }

    /// Removes the last search character.
    pub fn pop(&mut self) {
        self.search.pop();
        self.highlighted = 0;
    }

    /// Moves the highlight down, wrapping to the top.
    pub fn next(&mut self) {
        let count = self.filtered().len();
        if count > 0 {
            self.highlighted = (self.highlighted + 1) % count;
        }
    }

    /// Moves the highlight up, wrapping to the bottom.
    pub fn previous(&mut self) {
        let count = self.filtered().len();
        if count > 0 {
            self.highlighted = self.highlighted.checked_sub(1).unwrap_or(count - 1);
        }
    }

    /// The highlighted option, if the filtered list is not empty.
    #[must_use]
    pub fn selected(&self) -> Option<Choice> {
        self.filtered().get(self.highlighted).map(|c| (*c).clone())
    }
}
