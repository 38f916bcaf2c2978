//! Create/edit form controllers for tasks and projects.
//!
//! A [`Form`] holds the draft being edited, the field errors from the last
//! validation and the submission phase:
//!
//! ```text
//! Idle -> Editing -> Submitting -> Closed   (store accepted)
//!                              \-> Editing  (store rejected)
//! Editing/Submitting -> Closed              (cancel)
//! ```
//!
//! Validation errors stay inside the form. Store errors are handed back to
//! whoever finished the submission.

pub mod picker;
pub mod validate;

use std::collections::BTreeMap;
use std::fmt::Debug;

use focusflow_proto::{Entity, Priority, Project, ProjectDraft, Task, TaskDraft};

use crate::service::ServiceError;

pub use picker::{Choice, Picker, project_choices, user_choices};
pub use validate::{validate_project, validate_task};

/// An editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    /// Task title.
    Title,
    /// Project name.
    Name,
    /// Task or project description.
    Description,
    /// Task priority.
    Priority,
    /// Project status.
    Status,
    /// Project milestone.
    Milestone,
    /// Assigned user.
    Assignee,
    /// Owning project of a task.
    Project,
}

impl FormField {
    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Priority => "Priority",
            Self::Status => "Status",
            Self::Milestone => "Milestone",
            Self::Assignee => "Assignee",
            Self::Project => "Project",
        }
    }

    /// How the field is edited.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Title | Self::Name | Self::Description | Self::Milestone => FieldKind::Text,
            Self::Priority | Self::Status => FieldKind::Cycle,
            Self::Assignee | Self::Project => FieldKind::Lookup,
        }
    }
}

/// Input style of a [`FormField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// A fixed set of values cycled in place.
    Cycle,
    /// Chosen from a searchable list.
    Lookup,
}

/// Validation messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) need attention", .errors.len())]
pub struct FieldErrors {
    errors: BTreeMap<FormField, String>,
}

impl FieldErrors {
    /// Records a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// The message for `field`.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Whether `field` has a message.
    #[must_use]
    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    /// Drops the message for `field`.
    pub fn clear(&mut self, field: FormField) {
        self.errors.remove(&field);
    }

    /// Number of fields with a message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Why [`Form::begin_submit`] did not produce a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The form is not in the `Editing` phase.
    #[error("form is not open for editing")]
    NotEditing,

    /// Client-side validation failed; the errors are now on the form.
    #[error(transparent)]
    Invalid(#[from] FieldErrors),
}

/// A draft type a [`Form`] can edit.
pub trait Draft: Clone + Default + Debug + Send + 'static {
    /// Entity the draft creates or edits.
    type Target: Entity;

    /// Fields in tab order.
    const FIELDS: &'static [FormField];

    /// Checks the draft.
    fn validate(&self) -> FieldErrors;

    /// The draft as it should be sent: text fields trimmed.
    #[must_use]
    fn normalized(&self) -> Self;

    /// Draft pre-filled from an existing entity.
    fn from_entity(entity: &Self::Target) -> Self;

    /// Mutable access to a text field.
    fn text_mut(&mut self, field: FormField) -> Option<&mut String>;

    /// Current display value of `field`.
    fn display(&self, field: FormField) -> String;

    /// Advances a cycle field to its next value. Returns `false` for other
    /// fields.
    fn cycle(&mut self, field: FormField) -> bool;

    /// Writes a picker choice into a lookup field. Returns `false` if the
    /// choice does not fit the field.
    fn apply_choice(&mut self, field: FormField, choice: &Choice) -> bool;
}

impl Draft for TaskDraft {
    type Target = Task;

    const FIELDS: &'static [FormField] = &[
        FormField::Title,
        FormField::Description,
        FormField::Priority,
        FormField::Assignee,
        FormField::Project,
    ];

    fn validate(&self) -> FieldErrors {
        validate_task(self)
    }

    fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            assignee: self.assignee.trim().to_string(),
            ..self.clone()
        }
    }

    fn from_entity(task: &Task) -> Self {
        Self::from(task)
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            _ => None,
        }
    }

    fn display(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.title.clone(),
            FormField::Description => self.description.clone(),
            FormField::Priority => self.priority.label().to_string(),
            FormField::Assignee => self.assignee.clone(),
            FormField::Project => self
                .project_id
                .map(|id| format!("#{id}"))
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn cycle(&mut self, field: FormField) -> bool {
        if field != FormField::Priority {
            return false;
        }
        let index = Priority::ALL
            .iter()
            .position(|p| *p == self.priority)
            .unwrap_or(0);
        self.priority = Priority::ALL[(index + 1) % Priority::ALL.len()];
        true
    }

    fn apply_choice(&mut self, field: FormField, choice: &Choice) -> bool {
        match (field, choice) {
            (FormField::Assignee, Choice::Nothing) => self.assignee.clear(),
            (FormField::Assignee, Choice::User { name, .. }) => self.assignee.clone_from(name),
            (FormField::Project, Choice::Nothing) => self.project_id = None,
            (FormField::Project, Choice::Project { id, .. }) => self.project_id = Some(*id),
            _ => return false,
        }
        true
    }
}

impl Draft for ProjectDraft {
    type Target = Project;

    const FIELDS: &'static [FormField] = &[
        FormField::Name,
        FormField::Description,
        FormField::Status,
        FormField::Milestone,
        FormField::Assignee,
    ];

    fn validate(&self) -> FieldErrors {
        validate_project(self)
    }

    fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            milestone: self.milestone.trim().to_string(),
            assignee: self.assignee.trim().to_string(),
            status: self.status,
        }
    }

    fn from_entity(project: &Project) -> Self {
        Self::from(project)
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Description => Some(&mut self.description),
            FormField::Milestone => Some(&mut self.milestone),
            _ => None,
        }
    }

    fn display(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.name.clone(),
            FormField::Description => self.description.clone(),
            FormField::Status => self.status.label().to_string(),
            FormField::Milestone => self.milestone.clone(),
            FormField::Assignee => self.assignee.clone(),
            _ => String::new(),
        }
    }

    fn cycle(&mut self, field: FormField) -> bool {
        if field != FormField::Status {
            return false;
        }
        self.status = self.status.next();
        true
    }

    fn apply_choice(&mut self, field: FormField, choice: &Choice) -> bool {
        match (field, choice) {
            (FormField::Assignee, Choice::Nothing) => self.assignee.clear(),
            (FormField::Assignee, Choice::User { name, .. }) => self.assignee.clone_from(name),
            _ => return false,
        }
        true
    }
}

/// Submission lifecycle of a [`Form`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Never opened.
    Idle,
    /// Open and accepting input.
    Editing,
    /// Waiting for the store.
    Submitting,
    /// Dismissed, either saved or cancelled.
    Closed,
}

/// Whether the form creates a new entity or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<I> {
    /// Create a new entity.
    Create,
    /// Edit the entity with this id.
    Edit(I),
}

/// A validated draft ready to send to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission<D: Draft> {
    /// Create or edit.
    pub mode: FormMode<<D::Target as Entity>::Id>,
    /// Trimmed draft.
    pub draft: D,
}

/// Controller for one create/edit form.
#[derive(Debug)]
pub struct Form<D: Draft> {
    phase: FormPhase,
    mode: FormMode<<D::Target as Entity>::Id>,
    draft: D,
    errors: FieldErrors,
    focus: usize,
    picker: Option<Picker>,
}

impl<D: Draft> Default for Form<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Draft> Form<D> {
    /// A form that has not been opened.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: FormPhase::Idle,
            mode: FormMode::Create,
            draft: D::default(),
            errors: FieldErrors::default(),
            focus: 0,
            picker: None,
        }
    }

    /// Opens the form with an empty draft.
    pub fn open_create(&mut self) {
        self.open(FormMode::Create, D::default());
    }

    /// Opens the form pre-filled from `entity`.
    pub fn open_edit(&mut self, entity: &D::Target) {
        self.open(FormMode::Edit(entity.id()), D::from_entity(entity));
    }

    fn open(&mut self, mode: FormMode<<D::Target as Entity>::Id>, draft: D) {
        self.phase = FormPhase::Editing;
        self.mode = mode;
        self.draft = draft;
        self.errors = FieldErrors::default();
        self.focus = 0;
        self.picker = None;
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Whether the form is on screen.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.phase, FormPhase::Editing | FormPhase::Submitting)
    }

    /// Create or edit.
    #[must_use]
    pub const fn mode(&self) -> FormMode<<D::Target as Entity>::Id> {
        self.mode
    }

    /// The draft as typed.
    #[must_use]
    pub const fn draft(&self) -> &D {
        &self.draft
    }

    /// Errors from the last submit attempt.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The field with input focus.
    #[must_use]
    pub fn focused(&self) -> FormField {
        D::FIELDS[self.focus % D::FIELDS.len()]
    }

    /// The open picker, if any.
    #[must_use]
    pub const fn picker(&self) -> Option<&Picker> {
        self.picker.as_ref()
    }

    /// Mutable access to the open picker.
    pub const fn picker_mut(&mut self) -> Option<&mut Picker> {
        self.picker.as_mut()
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    const fn editable(&self) -> bool {
        matches!(self.phase, FormPhase::Editing)
    }

    /// Moves focus to the next field, wrapping.
    pub fn focus_next(&mut self) {
        if self.editable() {
            self.focus = (self.focus + 1) % D::FIELDS.len();
        }
    }

    /// Moves focus to the previous field, wrapping.
    pub fn focus_previous(&mut self) {
        if self.editable() {
            self.focus = self.focus.checked_sub(1).unwrap_or(D::FIELDS.len() - 1);
        }
    }

    /// Types into the focused text field and clears its error.
    pub fn input(&mut self, c: char) {
        if !self.editable() {
            return;
        }
        let field = self.focused();
        if let Some(text) = self.draft.text_mut(field) {
            text.push(c);
            self.errors.clear(field);
        }
    }

    /// Deletes the last character of the focused text field.
    pub fn backspace(&mut self) {
        if !self.editable() {
            return;
        }
        let field = self.focused();
        if let Some(text) = self.draft.text_mut(field) {
            text.pop();
            self.errors.clear(field);
        }
    }

    /// Cycles the focused field's value, if it is a cycle field.
    pub fn cycle_focused(&mut self) {
        if self.editable() {
            self.draft.cycle(self.focused());
        }
    }

    /// Opens a picker for the focused lookup field.
    pub fn open_picker(&mut self, options: Vec<Choice>) {
        if self.editable() && self.focused().kind() == FieldKind::Lookup {
            self.picker = Some(Picker::new(options));
        }
    }

    /// Writes the highlighted choice into the focused field and closes the
    /// picker.
    pub fn commit_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let field = self.focused();
        if let Some(choice) = picker.selected() {
            if self.draft.apply_choice(field, &choice) {
                self.errors.clear(field);
            }
        }
    }

    /// Closes the picker without changing the draft.
    pub fn dismiss_picker(&mut self) {
        self.picker = None;
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Validates the draft and, if it passes, moves to `Submitting`.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Invalid`] if validation fails (the form stays in
    /// `Editing` and shows the errors), [`SubmitError::NotEditing`] if the
    /// form is not open for editing.
    pub fn begin_submit(&mut self) -> Result<Submission<D>, SubmitError> {
        if !self.editable() {
            return Err(SubmitError::NotEditing);
        }
        let errors = self.draft.validate();
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(SubmitError::Invalid(errors));
        }
        self.errors = FieldErrors::default();
        self.picker = None;
        self.phase = FormPhase::Submitting;
        Ok(Submission {
            mode: self.mode,
            draft: self.draft.normalized(),
        })
    }

    /// Applies the store's answer to a submission.
    ///
    /// Success closes the form. Failure reopens it for editing with the draft
    /// intact. The result is passed through unchanged either way. An answer
    /// arriving after the form was cancelled changes nothing.
    ///
    /// # Errors
    ///
    /// Returns the store's error as given.
    pub fn finish_submit<T>(&mut self, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
        if self.phase != FormPhase::Submitting {
            return result;
        }
        self.phase = if result.is_ok() {
            FormPhase::Closed
        } else {
            FormPhase::Editing
        };
        result
    }

    /// Closes the form without saving.
    pub fn cancel(&mut self) {
        if self.is_open() {
            self.phase = FormPhase::Closed;
            self.picker = None;
        }
    }
}

/// Form for creating and editing tasks.
pub type TaskForm = Form<TaskDraft>;

/// Form for creating and editing projects.
pub type ProjectForm = Form<ProjectDraft>;
