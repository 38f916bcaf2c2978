//! Integration tests for the list reconciler against the in-memory store.
//!
//! Each test owns a `ListReconciler` and a `MemoryTaskStore` (or project
//! store) and drives them through the awaitable helpers in
//! `reconcile::driver`, injecting store failures where needed.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use serde_json::json;

use focusflow::notify::{Level, Notification};
use focusflow::reconcile::{
    EmptyState, ListReconciler, ListView, LoadState, MutationState, delete_entity, load,
    toggle_complete,
};
use focusflow::service::{MemoryProjectStore, MemoryTaskStore, Operation, Repository};
use focusflow_proto::filter::{ProjectQuery, StatusFilter, TaskQuery};
use focusflow_proto::{Project, ProjectId, ProjectStatus, Task, TaskId};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// A store holding the two-task scenario: one active high, one completed low.
fn two_task_store() -> MemoryTaskStore {
    MemoryTaskStore::with_records(
        vec![
            json!({"Id": 1, "title": "a", "completed": false, "priority": "high", "order": 1}),
            json!({"Id": 2, "title_c": "b", "completed_c": true, "priority_c": "low", "order_c": 2}),
        ],
        Duration::ZERO,
    )
}

/// Loads `store` into a fresh reconciler.
async fn loaded(store: &MemoryTaskStore) -> ListReconciler<Task> {
    let mut list = ListReconciler::new();
    assert!(load(&mut list, store).await.is_none());
    list
}

/// Ids of a slice of tasks, in order.
fn ids(tasks: &[Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.id.0).collect()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_maps_both_record_shapes_in_order() {
    let list = loaded(&two_task_store()).await;
    assert_eq!(ids(list.items()), vec![1, 2]);
    assert_eq!(list.load_state(), &LoadState::Ready);
    assert!(list.get(TaskId(2)).unwrap().completed);
}

#[tokio::test]
async fn active_filter_scenario() {
    let list = loaded(&two_task_store()).await;
    let query = TaskQuery {
        status: StatusFilter::Active,
        ..TaskQuery::default()
    };
    match list.view(&query) {
        ListView::Items { shown, total, .. } => {
            assert_eq!(shown.iter().map(|t| t.id.0).collect::<Vec<_>>(), vec![1]);
            assert_eq!(total, 2);
        }
        other => panic!("unexpected view {other:?}"),
    }
}

#[tokio::test]
async fn reload_failure_keeps_list_and_retry_recovers() {
    let store = two_task_store();
    let mut list = loaded(&store).await;

    store.fail_next(Operation::GetAll);
    let note = load(&mut list, &store).await.unwrap();
    assert_eq!(note.level, Level::Error);
    assert_eq!(ids(list.items()), vec![1, 2]);
    assert!(matches!(list.load_state(), LoadState::Failed(_)));

    assert!(load(&mut list, &store).await.is_none());
    assert_eq!(list.load_state(), &LoadState::Ready);
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn toggle_success_persists_and_notifies() {
    let store = two_task_store();
    let mut list = loaded(&store).await;

    let settled = toggle_complete(&mut list, &store, TaskId(1)).await.unwrap();
    assert_eq!(settled.state, MutationState::Committed);
    assert_eq!(settled.notification, Notification::success("Task completed!"));
    assert!(list.get(TaskId(1)).unwrap().completed);
    assert!(store.get_by_id(TaskId(1)).await.unwrap().completed);
    // Stored entity carries the new timestamp.
    assert!(list.get(TaskId(1)).unwrap().updated_at.is_some());
}

#[tokio::test]
async fn toggle_failure_rolls_back_only_that_task() {
    let store = two_task_store();
    let mut list = loaded(&store).await;
    let before = list.items().to_vec();

    store.fail_next(Operation::Update);
    let settled = toggle_complete(&mut list, &store, TaskId(1)).await.unwrap();
    assert_eq!(settled.state, MutationState::RolledBack);
    assert_eq!(settled.notification, Notification::error("Failed to update task"));
    assert_eq!(list.items(), before.as_slice());
    assert!(!store.get_by_id(TaskId(1)).await.unwrap().completed);
}

#[tokio::test]
async fn toggle_unknown_id_touches_nothing() {
    let store = two_task_store();
    let mut list = loaded(&store).await;
    let before = list.items().to_vec();
    assert!(toggle_complete(&mut list, &store, TaskId(99)).await.is_none());
    assert_eq!(list.items(), before.as_slice());
}

#[tokio::test]
async fn project_toggle_uses_status() {
    let store = MemoryProjectStore::with_records(
        vec![json!({"Id": 1, "name": "Website", "status": "active"})],
        Duration::ZERO,
    );
    let mut list: ListReconciler<Project> = ListReconciler::new();
    load(&mut list, &store).await;

    let settled = toggle_complete(&mut list, &store, ProjectId(1)).await.unwrap();
    assert_eq!(settled.notification, Notification::success("Project completed!"));
    assert_eq!(
        store.get_by_id(ProjectId(1)).await.unwrap().status,
        ProjectStatus::Completed
    );
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_success_removes_exactly_one() {
    let store = MemoryTaskStore::seeded(Duration::ZERO);
    let mut list = loaded(&store).await;
    let mut expected = ids(list.items());
    expected.retain(|id| *id != 3);

    let note = delete_entity(&mut list, &store, TaskId(3)).await.unwrap();
    assert_eq!(note, Notification::success("Task deleted successfully"));
    assert_eq!(ids(list.items()), expected);
    assert_eq!(ids(&store.get_all().await.unwrap()), expected);
}

#[tokio::test]
async fn delete_failure_leaves_list_identical() {
    let store = two_task_store();
    let mut list = loaded(&store).await;
    let before = list.items().to_vec();

    store.fail_next(Operation::Delete);
    let note = delete_entity(&mut list, &store, TaskId(2)).await.unwrap();
    assert_eq!(note, Notification::error("Failed to delete task"));
    assert_eq!(list.items(), before.as_slice());
}

#[tokio::test]
async fn delete_unknown_id_never_reaches_store() {
    let store = two_task_store();
    let mut list = loaded(&store).await;
    store.fail_always(Operation::Delete);
    assert!(delete_entity(&mut list, &store, TaskId(42)).await.is_none());
    store.clear_faults();
    assert_eq!(store.get_all().await.unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Empty states
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_store_offers_create_and_no_match_offers_clear() {
    let empty = MemoryTaskStore::new(Duration::ZERO);
    let list = loaded(&empty).await;
    assert_eq!(
        list.view(&TaskQuery::default()),
        ListView::Empty(EmptyState::NoItems)
    );

    let projects = MemoryProjectStore::seeded(Duration::ZERO);
    let mut list: ListReconciler<Project> = ListReconciler::new();
    load(&mut list, &projects).await;
    let query = ProjectQuery {
        search: "no such project".to_string(),
        ..ProjectQuery::default()
    };
    assert_eq!(list.view(&query), ListView::Empty(EmptyState::NoMatches));
}
