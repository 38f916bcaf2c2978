//! Integration tests for the create/edit form controllers.
//!
//! Forms are filled in key by key, submitted, and the submission is run
//! against the in-memory stores the way the dispatcher would.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use focusflow::forms::{
    Choice, FormField, FormMode, FormPhase, ProjectForm, SubmitError, TaskForm, project_choices,
    user_choices,
};
use focusflow::service::{
    MemoryProjectStore, MemoryTaskStore, MemoryUserDirectory, Operation, Repository,
    ServiceError, UserDirectory,
};
use focusflow_proto::{ProjectDraft, ProjectId, ProjectPatch, TaskId, TaskPatch};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Types `text` into the focused field of a task form.
fn type_task(form: &mut TaskForm, text: &str) {
    for c in text.chars() {
        form.input(c);
    }
}

/// Types `text` into the focused field of a project form.
fn type_project(form: &mut ProjectForm, text: &str) {
    for c in text.chars() {
        form.input(c);
    }
}

/// Moves focus forward until `field` is focused.
fn focus_project(form: &mut ProjectForm, field: FormField) {
    while form.focused() != field {
        form.focus_next();
    }
}

// ---------------------------------------------------------------------------
// Task form
// ---------------------------------------------------------------------------

#[test]
fn short_title_rejected_then_accepted() {
    let mut form = TaskForm::new();
    form.open_create();
    type_task(&mut form, "ab");
    let Err(SubmitError::Invalid(errors)) = form.begin_submit() else {
        panic!("two characters should not pass");
    };
    assert_eq!(
        errors.get(FormField::Title),
        Some("Title must be at least 3 characters long")
    );

    form.input('c');
    let submission = form.begin_submit().unwrap();
    assert_eq!(submission.draft.title, "abc");
    assert_eq!(submission.mode, FormMode::Create);
}

#[test]
fn blank_title_is_required() {
    let mut form = TaskForm::new();
    form.open_create();
    type_task(&mut form, "   ");
    let Err(SubmitError::Invalid(errors)) = form.begin_submit() else {
        panic!("blank title should not pass");
    };
    assert_eq!(errors.get(FormField::Title), Some("Task title is required"));
}

#[tokio::test]
async fn create_task_round_trip_with_pickers() {
    let store = MemoryTaskStore::seeded(Duration::ZERO);
    let users = MemoryUserDirectory::seeded(Duration::ZERO);
    let projects = MemoryProjectStore::seeded(Duration::ZERO);

    let mut form = TaskForm::new();
    form.open_create();
    type_task(&mut form, "  Prepare demo  ");

    // Assignee: type to filter, pick the only match.
    while form.focused() != FormField::Assignee {
        form.focus_next();
    }
    form.open_picker(user_choices(&users.get_all().await.unwrap()));
    for c in "emily".chars() {
        form.picker_mut().unwrap().push(c);
    }
    form.commit_picker();

    // Project: pick "Mobile App".
    form.focus_next();
    form.open_picker(project_choices(&projects.get_all().await.unwrap()));
    for c in "mobile".chars() {
        form.picker_mut().unwrap().push(c);
    }
    form.commit_picker();

    let submission = form.begin_submit().unwrap();
    assert_eq!(form.phase(), FormPhase::Submitting);
    let saved = form
        .finish_submit(store.create(submission.draft).await)
        .unwrap();
    assert_eq!(form.phase(), FormPhase::Closed);
    assert_eq!(saved.title, "Prepare demo");
    assert_eq!(saved.assignee, "Emily Rodriguez");
    assert_eq!(saved.project_id, Some(ProjectId(2)));
}

#[tokio::test]
async fn edit_failure_keeps_draft_for_retry() {
    let store = MemoryTaskStore::seeded(Duration::ZERO);
    let task = store.get_by_id(TaskId(3)).await.unwrap();

    let mut form = TaskForm::new();
    form.open_edit(&task);
    type_task(&mut form, " (v2)");
    let submission = form.begin_submit().unwrap();
    let FormMode::Edit(id) = submission.mode else {
        panic!("edit form should submit an edit");
    };

    store.fail_next(Operation::Update);
    let err = form
        .finish_submit(store.update(id, TaskPatch::from(submission.draft)).await)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Backend(_)));
    assert_eq!(form.phase(), FormPhase::Editing);
    assert!(form.draft().title.ends_with("(v2)"));

    // Retry succeeds with the same draft.
    let submission = form.begin_submit().unwrap();
    let saved = form
        .finish_submit(store.update(id, TaskPatch::from(submission.draft)).await)
        .unwrap();
    assert_eq!(saved.title, format!("{} (v2)", task.title));
}

// ---------------------------------------------------------------------------
// Project form
// ---------------------------------------------------------------------------

#[test]
fn project_rules_report_every_field() {
    let mut form = ProjectForm::new();
    form.open_create();
    type_project(&mut form, "ab");
    focus_project(&mut form, FormField::Description);
    type_project(&mut form, &"d".repeat(501));
    focus_project(&mut form, FormField::Milestone);
    type_project(&mut form, &"m".repeat(201));

    let Err(SubmitError::Invalid(errors)) = form.begin_submit() else {
        panic!("draft should be rejected");
    };
    assert_eq!(
        errors.get(FormField::Name),
        Some("Project name must be at least 3 characters")
    );
    assert_eq!(
        errors.get(FormField::Description),
        Some("Description must be less than 500 characters")
    );
    assert_eq!(
        errors.get(FormField::Milestone),
        Some("Milestone must be less than 200 characters")
    );
    assert!(!errors.contains(FormField::Assignee));
}

#[test]
fn project_assignee_length_applies_to_picked_names() {
    let draft = ProjectDraft {
        name: "Infra".to_string(),
        assignee: "Al".to_string(),
        ..ProjectDraft::default()
    };
    let errors = focusflow::forms::validate_project(&draft);
    assert_eq!(
        errors.get(FormField::Assignee),
        Some("Assignee must be between 3 and 50 characters")
    );
}

#[tokio::test]
async fn create_and_edit_project() {
    let store = MemoryProjectStore::seeded(Duration::ZERO);

    let mut form = ProjectForm::new();
    form.open_create();
    type_project(&mut form, "Data Platform");
    focus_project(&mut form, FormField::Assignee);
    form.open_picker(vec![
        Choice::Nothing,
        Choice::User {
            name: "James Wilson".to_string(),
            role: "Tech Lead".to_string(),
        },
    ]);
    form.picker_mut().unwrap().next();
    form.commit_picker();

    let submission = form.begin_submit().unwrap();
    let created = form
        .finish_submit(store.create(submission.draft).await)
        .unwrap();
    assert_eq!(created.id, ProjectId(4));
    assert_eq!(created.assignee, "James Wilson");

    form.open_edit(&created);
    focus_project(&mut form, FormField::Status);
    form.cycle_focused();
    let submission = form.begin_submit().unwrap();
    let updated = form
        .finish_submit(
            store
                .update(created.id, ProjectPatch::from(submission.draft))
                .await,
        )
        .unwrap();
    assert_eq!(updated.status, created.status.next());
}

#[test]
fn cancel_discards_and_late_result_is_ignored() {
    let mut form = ProjectForm::new();
    form.open_create();
    type_project(&mut form, "Temporary");
    form.begin_submit().unwrap();
    form.cancel();
    assert_eq!(form.phase(), FormPhase::Closed);
    let late = form.finish_submit::<()>(Err(ServiceError::Backend("late".into())));
    assert!(late.is_err());
    assert_eq!(form.phase(), FormPhase::Closed);
}
