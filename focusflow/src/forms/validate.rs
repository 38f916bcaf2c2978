//! Client-side validation rules for task and project drafts.
//!
//! Lengths are counted in characters after trimming surrounding whitespace.

use focusflow_proto::project::{
    MAX_ASSIGNEE_LENGTH, MAX_MILESTONE_LENGTH, MAX_PROJECT_DESCRIPTION_LENGTH,
    MAX_PROJECT_NAME_LENGTH, MIN_ASSIGNEE_LENGTH, MIN_PROJECT_NAME_LENGTH,
};
use focusflow_proto::task::MIN_TASK_TITLE_LENGTH;
use focusflow_proto::{ProjectDraft, TaskDraft};

use super::{FieldErrors, FormField};

fn trimmed_len(s: &str) -> usize {
    s.trim().chars().count()
}

/// Checks a task draft.
#[must_use]
pub fn validate_task(draft: &TaskDraft) -> FieldErrors {
    let mut errors = FieldErrors::default();
    let title = trimmed_len(&draft.title);
    if title == 0 {
        errors.insert(FormField::Title, "Task title is required");
    } else if title < MIN_TASK_TITLE_LENGTH {
        errors.insert(
            FormField::Title,
            format!("Title must be at least {MIN_TASK_TITLE_LENGTH} characters long"),
        );
    }
    errors
}

/// Checks a project draft.
#[must_use]
pub fn validate_project(draft: &ProjectDraft) -> FieldErrors {
    let mut errors = FieldErrors::default();

    let name = trimmed_len(&draft.name);
    if name == 0 {
        errors.insert(FormField::Name, "Project name is required");
    } else if name < MIN_PROJECT_NAME_LENGTH {
        errors.insert(
            FormField::Name,
            format!("Project name must be at least {MIN_PROJECT_NAME_LENGTH} characters"),
        );
    } else if name > MAX_PROJECT_NAME_LENGTH {
        errors.insert(
            FormField::Name,
            format!("Project name must be less than {MAX_PROJECT_NAME_LENGTH} characters"),
        );
    }

    if trimmed_len(&draft.description) > MAX_PROJECT_DESCRIPTION_LENGTH {
        errors.insert(
            FormField::Description,
            format!("Description must be less than {MAX_PROJECT_DESCRIPTION_LENGTH} characters"),
        );
    }

    if trimmed_len(&draft.milestone) > MAX_MILESTONE_LENGTH {
        errors.insert(
            FormField::Milestone,
            format!("Milestone must be less than {MAX_MILESTONE_LENGTH} characters"),
        );
    }

    let assignee = trimmed_len(&draft.assignee);
    if assignee > 0 && !(MIN_ASSIGNEE_LENGTH..=MAX_ASSIGNEE_LENGTH).contains(&assignee) {
        errors.insert(
            FormField::Assignee,
            format!(
                "Assignee must be between {MIN_ASSIGNEE_LENGTH} and {MAX_ASSIGNEE_LENGTH} characters"
            ),
        );
    }

    errors
}
