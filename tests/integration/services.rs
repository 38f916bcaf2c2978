//! Integration tests for the data-access services.
//!
//! Covers the in-memory stores' create/update/delete/order semantics, the
//! ownership guard in front of them, the user directory and the dispatcher
//! that runs service calls on tokio tasks.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use focusflow::dispatch::{Command, Event, Services, execute, spawn_dispatcher};
use focusflow::forms::FormMode;
use focusflow::reconcile::ViewToken;
use focusflow::service::{
    Guarded, MemoryProjectStore, MemoryTaskStore, MemoryUserDirectory, Operation,
    OwnershipPolicy, Repository, ServiceError, TaskRepository, UserDirectory,
};
use focusflow_proto::{
    Priority, ProjectDraft, ProjectId, ProjectPatch, ProjectStatus, TaskDraft, TaskId, TaskPatch,
    UserId,
};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Seeded services with no latency and no ownership checks.
fn open_services() -> Services<MemoryTaskStore, MemoryProjectStore, MemoryUserDirectory> {
    Services {
        tasks: MemoryTaskStore::seeded(Duration::ZERO),
        projects: MemoryProjectStore::seeded(Duration::ZERO),
        users: MemoryUserDirectory::seeded(Duration::ZERO),
    }
}

/// Seeded task store guarded for `actor`.
fn guarded_tasks(actor: &str) -> Guarded<MemoryTaskStore, Option<OwnershipPolicy>> {
    Guarded::new(
        MemoryTaskStore::seeded(Duration::ZERO),
        Some(OwnershipPolicy::new(actor)),
    )
}

/// A task draft with only a title.
fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        ..TaskDraft::default()
    }
}

// ---------------------------------------------------------------------------
// Task store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeded_tasks_are_sorted_by_order() {
    let store = MemoryTaskStore::seeded(Duration::ZERO);
    let tasks = store.get_all().await.unwrap();
    assert!(!tasks.is_empty());
    assert!(tasks.windows(2).all(|w| w[0].order <= w[1].order));
}

#[tokio::test]
async fn create_appends_with_next_id_and_order() {
    let store = MemoryTaskStore::seeded(Duration::ZERO);
    let before = store.get_all().await.unwrap();
    let max_id = before.iter().map(|t| t.id.0).max().unwrap();
    let max_order = before.iter().map(|t| t.order).max().unwrap();

    let task = store
        .create(TaskDraft {
            priority: Priority::High,
            ..draft("Plan sprint")
        })
        .await
        .unwrap();
    assert_eq!(task.id, TaskId(max_id + 1));
    assert_eq!(task.order, max_order + 1);
    assert!(!task.completed);
    assert!(task.created_at.is_some());
    assert_eq!(store.get_all().await.unwrap().last(), Some(&task));
}

#[tokio::test]
async fn update_merges_patch_and_bumps_timestamp() {
    let store = MemoryTaskStore::seeded(Duration::ZERO);
    let original = store.get_by_id(TaskId(1)).await.unwrap();
    let updated = store
        .update(
            TaskId(1),
            TaskPatch {
                title: Some("Renamed".to_string()),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.priority, original.priority);
    assert_eq!(updated.assignee, original.assignee);
    assert_ne!(updated.updated_at, original.updated_at);
}

#[tokio::test]
async fn update_clears_fields_on_plain_shaped_row() {
    // Task 2 is stored with plain names (`assignee`, `projectId`, ...).
    let store = MemoryTaskStore::seeded(Duration::ZERO);
    let before = store.get_by_id(TaskId(2)).await.unwrap();
    assert!(!before.assignee.is_empty());
    assert!(before.project_id.is_some());

    let cleared = store
        .update(
            TaskId(2),
            TaskPatch::from(TaskDraft {
                title: before.title.clone(),
                priority: before.priority,
                ..TaskDraft::default()
            }),
        )
        .await
        .unwrap();
    assert_eq!(cleared.assignee, "");
    assert_eq!(cleared.description, "");
    assert_eq!(cleared.project_id, None);
    assert_eq!(store.get_by_id(TaskId(2)).await.unwrap(), cleared);
}

#[tokio::test]
async fn project_update_clears_plain_shaped_fields() {
    // Project 2 is stored with plain names.
    let store = MemoryProjectStore::seeded(Duration::ZERO);
    let updated = store
        .update(
            ProjectId(2),
            ProjectPatch {
                milestone: Some(String::new()),
                assignee: Some(String::new()),
                ..ProjectPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Mobile App");
    assert_eq!(updated.milestone, "");
    assert_eq!(updated.assignee, "");
}

#[tokio::test]
async fn missing_ids_report_not_found() {
    let store = MemoryTaskStore::seeded(Duration::ZERO);
    assert!(matches!(
        store.get_by_id(TaskId(999)).await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        store.update(TaskId(999), TaskPatch::completed(true)).await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        store.delete(TaskId(999)).await,
        Err(ServiceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn update_order_renumbers_from_one() {
    let store = MemoryTaskStore::seeded(Duration::ZERO);
    let mut ids: Vec<TaskId> = store
        .get_all()
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    ids.reverse();
    store.update_order(ids.clone()).await.unwrap();

    let tasks = store.get_all().await.unwrap();
    assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), ids);
    let orders: Vec<i64> = tasks.iter().map(|t| t.order).collect();
    let expected: Vec<i64> = (1..=i64::try_from(tasks.len()).unwrap()).collect();
    assert_eq!(orders, expected);
}

#[tokio::test]
async fn stats_follow_completion() {
    let store = MemoryTaskStore::new(Duration::ZERO);
    assert_eq!(store.get_stats().await.unwrap().completion_rate, 0);
    for title in ["one", "two", "three"] {
        store.create(draft(title)).await.unwrap();
    }
    store
        .update(TaskId(2), TaskPatch::completed(true))
        .await
        .unwrap();
    let stats = store.get_stats().await.unwrap();
    assert_eq!((stats.total, stats.completed, stats.active), (3, 1, 2));
    assert_eq!(stats.completion_rate, 33);
}

#[tokio::test]
async fn injected_failure_trips_once() {
    let store = MemoryTaskStore::seeded(Duration::ZERO);
    store.fail_next(Operation::GetStats);
    assert!(matches!(
        store.get_stats().await,
        Err(ServiceError::Backend(_))
    ));
    assert!(store.get_stats().await.is_ok());
}

// ---------------------------------------------------------------------------
// Project store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_create_defaults_and_stats() {
    let store = MemoryProjectStore::new(Duration::ZERO);
    let project = store
        .create(ProjectDraft {
            name: "Launch".to_string(),
            ..ProjectDraft::default()
        })
        .await
        .unwrap();
    assert_eq!(project.id, ProjectId(1));
    assert_eq!(project.status, ProjectStatus::Planning);

    store
        .update(project.id, ProjectPatch::status(ProjectStatus::Active))
        .await
        .unwrap();
    let stats = store.get_stats().await.unwrap();
    assert_eq!((stats.total, stats.active, stats.completed), (1, 1, 0));
}

// ---------------------------------------------------------------------------
// Ownership guard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn guard_rejects_foreign_task_and_leaves_store_unchanged() {
    // Task 2 is assigned to Mike Chen in the demo data.
    let repo = guarded_tasks("Lisa Wang");
    let before = repo.get_by_id(TaskId(2)).await.unwrap();

    let err = repo
        .update(TaskId(2), TaskPatch::completed(!before.completed))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Access { .. }));
    assert!(repo.delete(TaskId(2)).await.is_err());
    assert_eq!(repo.get_by_id(TaskId(2)).await.unwrap(), before);
}

#[tokio::test]
async fn guard_allows_owner_and_creation() {
    let repo = guarded_tasks("Mike Chen");
    assert!(
        repo.update(TaskId(2), TaskPatch::completed(false))
            .await
            .is_ok()
    );
    assert!(repo.create(draft("Anyone may create")).await.is_ok());
}

// ---------------------------------------------------------------------------
// User directory
// ---------------------------------------------------------------------------

#[tokio::test]
async fn directory_lookups() {
    let users = MemoryUserDirectory::seeded(Duration::ZERO);
    assert_eq!(users.get_all().await.unwrap().len(), 8);
    assert_eq!(
        users.get_by_id(UserId(8)).await.unwrap().name,
        "James Wilson"
    );
    let lisa = users.get_by_name("Lisa Wang").await.unwrap().unwrap();
    assert_eq!(lisa.role, "Business Analyst");
    assert!(users.get_by_name("Nobody").await.unwrap().is_none());

    users.fail_next(Operation::GetAll);
    assert!(users.get_all().await.is_err());
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dispatcher_answers_every_command() {
    let (tx, mut rx) = spawn_dispatcher(Arc::new(open_services()), 16);
    let token = ViewToken::fresh();
    tx.send(Command::LoadUsers).await.unwrap();
    tx.send(Command::LoadStats { token }).await.unwrap();
    tx.send(Command::LoadProjects { token }).await.unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        seen.push(match event {
            Event::UsersLoaded(result) => {
                assert_eq!(result.unwrap().len(), 8);
                "users"
            }
            Event::StatsLoaded { token: t, result } => {
                assert_eq!(t, token);
                assert!(result.unwrap().total > 0);
                "stats"
            }
            Event::ProjectsLoaded { token: t, result } => {
                assert_eq!(t, token);
                assert_eq!(result.unwrap().len(), 3);
                "projects"
            }
            other => panic!("unexpected event {other:?}"),
        });
    }
    seen.sort_unstable();
    assert_eq!(seen, vec!["projects", "stats", "users"]);

    tx.send(Command::Shutdown).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn back_to_back_reorders_store_the_last_sequence() {
    let services = Arc::new(Services {
        tasks: MemoryTaskStore::seeded(Duration::from_millis(5)),
        projects: MemoryProjectStore::seeded(Duration::ZERO),
        users: MemoryUserDirectory::seeded(Duration::ZERO),
    });
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 16);
    let token = ViewToken::fresh();
    let first: Vec<TaskId> = services
        .tasks
        .get_all()
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    let mut second = first.clone();
    second.reverse();
    let mut third = first.clone();
    third.rotate_left(1);

    for ids in [second, first, third.clone()] {
        tx.send(Command::ReorderTasks { token, ids }).await.unwrap();
    }
    for _ in 0..3 {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, Event::TasksReordered { result: Ok(()), .. }));
    }

    let stored: Vec<TaskId> = services
        .tasks
        .get_all()
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(stored, third);
    tx.send(Command::Shutdown).await.unwrap();
}

#[tokio::test]
async fn save_project_edit_goes_through_update() {
    let services = open_services();
    let event = execute(
        &services,
        Command::SaveProject {
            token: ViewToken::fresh(),
            mode: FormMode::Edit(ProjectId(2)),
            draft: ProjectDraft {
                name: "Mobile App v2".to_string(),
                status: ProjectStatus::Active,
                ..ProjectDraft::default()
            },
        },
    )
    .await
    .unwrap();
    let Event::ProjectSaved { result, .. } = event else {
        panic!("unexpected event");
    };
    let project = result.unwrap();
    assert_eq!(project.id, ProjectId(2));
    assert_eq!(project.name, "Mobile App v2");
    assert_eq!(project.status, ProjectStatus::Active);
}
