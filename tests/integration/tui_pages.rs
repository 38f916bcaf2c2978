//! End-to-end tests of the app state machine against a live dispatcher.
//!
//! Key presses go into `App::handle_key_event`, the resulting commands go
//! through `spawn_dispatcher` to the in-memory stores, and the answers are
//! applied with `App::apply_event` until nothing is in flight. Screens are
//! checked by drawing into a `TestBackend`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use tokio::sync::mpsc;

use focusflow::app::{App, Page};
use focusflow::config::AppConfig;
use focusflow::dispatch::{Command, Event, Services, execute, spawn_dispatcher};
use focusflow::reconcile::{ListView, LoadState};
use focusflow::service::{
    MemoryProjectStore, MemoryTaskStore, MemoryUserDirectory, Operation, Repository, TaskRepository,
};
use focusflow::ui;
use focusflow_proto::{ProjectId, TaskId};

type MemoryServices = Services<MemoryTaskStore, MemoryProjectStore, MemoryUserDirectory>;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Services with no simulated latency, seeded or empty.
fn services(seeded: bool) -> Arc<MemoryServices> {
    let (tasks, projects) = if seeded {
        (
            MemoryTaskStore::seeded(Duration::ZERO),
            MemoryProjectStore::seeded(Duration::ZERO),
        )
    } else {
        (
            MemoryTaskStore::new(Duration::ZERO),
            MemoryProjectStore::new(Duration::ZERO),
        )
    };
    Arc::new(Services {
        tasks,
        projects,
        users: MemoryUserDirectory::seeded(Duration::ZERO),
    })
}

/// An app opened on `page`.
fn app_on(page: Page) -> App {
    App::new(&AppConfig {
        start_page: page,
        latency: Duration::ZERO,
        ..AppConfig::default()
    })
}

/// A plain key press.
fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Sends `commands` and applies every answer, including answers to the
/// follow-up commands they produce, until nothing is in flight.
async fn settle(
    app: &mut App,
    tx: &mpsc::Sender<Command>,
    rx: &mut mpsc::Receiver<Event>,
    commands: Vec<Command>,
) {
    let mut in_flight = 0usize;
    for cmd in commands {
        tx.send(cmd).await.unwrap();
        in_flight += 1;
    }
    while in_flight > 0 {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("dispatcher answered in time")
            .expect("dispatcher still running");
        in_flight -= 1;
        for cmd in app.apply_event(event) {
            tx.send(cmd).await.unwrap();
            in_flight += 1;
        }
    }
}

/// Presses `code` and settles whatever it started.
async fn press(
    app: &mut App,
    tx: &mpsc::Sender<Command>,
    rx: &mut mpsc::Receiver<Event>,
    code: KeyCode,
) {
    let commands = app.handle_key_event(key(code));
    settle(app, tx, rx, commands).await;
}

/// Types `text` one key at a time. None of these keys start service calls.
fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        assert!(app.handle_key_event(key(KeyCode::Char(c))).is_empty());
    }
}

/// Draws `app` into an in-memory terminal and returns the text.
fn render(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
    terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    let buffer = terminal.backend().buffer().clone();
    buffer
        .content
        .chunks(usize::from(buffer.area.width))
        .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Latest notification text, if any.
fn latest(app: &App) -> Option<&str> {
    app.notifications.latest().map(|n| n.message.as_str())
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_start_loads_stats_and_users() {
    let services = services(true);
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 32);
    let mut app = app_on(Page::Dashboard);
    assert!(render(&app).contains("Loading progress..."));

    let startup = app.start();
    settle(&mut app, &tx, &mut rx, startup).await;

    let stats = app.dashboard.stats.as_ref().unwrap();
    assert_eq!(stats, &services.tasks.get_stats().await.unwrap());
    assert_eq!(app.users.len(), 8);

    let screen = render(&app);
    assert!(screen.contains("Welcome to Focus Flow"));
    assert!(screen.contains("Total Tasks"));
    assert!(screen.contains(&format!("{}% complete", stats.completion_rate)));
}

#[tokio::test]
async fn dashboard_failure_then_retry() {
    let services = services(true);
    services
        .tasks
        .fail_next(Operation::GetStats);
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 32);
    let mut app = app_on(Page::Dashboard);
    let startup = app.start();
    settle(&mut app, &tx, &mut rx, startup).await;

    assert!(app.dashboard.stats.is_none());
    assert!(render(&app).contains("Failed to load progress"));

    press(&mut app, &tx, &mut rx, KeyCode::Char('r')).await;
    assert!(app.dashboard.stats.is_some());
    assert!(app.dashboard.load_error.is_none());
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn task_page_loads_tasks_and_project_names() {
    let services = services(true);
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 32);
    let mut app = app_on(Page::Dashboard);
    press(&mut app, &tx, &mut rx, KeyCode::Char('2')).await;

    assert_eq!(app.page, Page::Tasks);
    assert_eq!(app.tasks.list.load_state(), &LoadState::Ready);
    assert_eq!(app.tasks.list.items().len(), 6);
    assert_eq!(app.project_lookup.len(), 3);
    assert_eq!(app.project_name(ProjectId(2)), Some("Mobile App"));

    let screen = render(&app);
    assert!(screen.contains("Draft homepage wireframes"));
    assert!(screen.contains("#Website Redesign"));
    assert!(screen.contains("Showing 6 of 6 tasks"));
}

#[tokio::test]
async fn toggle_from_keyboard_reaches_store() {
    let services = services(true);
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 32);
    let mut app = app_on(Page::Tasks);
    let startup = app.start();
    settle(&mut app, &tx, &mut rx, startup).await;

    let first = app.tasks.selected_item().unwrap().clone();
    assert_eq!(first.id, TaskId(1));
    assert!(!first.completed);

    // The flip is visible before the store answers.
    let commands = app.handle_key_event(key(KeyCode::Char(' ')));
    assert_eq!(commands.len(), 1);
    assert!(app.tasks.list.get(TaskId(1)).unwrap().completed);
    assert!(app.tasks.list.is_pending(TaskId(1)));

    settle(&mut app, &tx, &mut rx, commands).await;
    assert!(!app.tasks.list.is_pending(TaskId(1)));
    assert_eq!(latest(&app), Some("Task completed!"));
    assert!(services.tasks.get_by_id(TaskId(1)).await.unwrap().completed);
}

#[tokio::test]
async fn search_and_filters_narrow_the_list() {
    let services = services(true);
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 32);
    let mut app = app_on(Page::Tasks);
    let startup = app.start();
    settle(&mut app, &tx, &mut rx, startup).await;

    assert!(app.handle_key_event(key(KeyCode::Char('/'))).is_empty());
    type_text(&mut app, "ci pipe");
    app.handle_key_event(key(KeyCode::Enter));
    assert!(!app.tasks.searching);

    let ListView::Items { shown, total, .. } = app.tasks.view() else {
        panic!("expected items");
    };
    assert_eq!(total, 6);
    assert_eq!(
        shown.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
        vec!["Set up CI pipeline"]
    );

    // Active filter hides the completed match; Enter then clears filters.
    app.handle_key_event(key(KeyCode::Char('s')));
    assert!(render(&app).contains("No matching tasks"));
    app.handle_key_event(key(KeyCode::Enter));
    assert!(app.tasks.query.search.is_empty());
    assert!(render(&app).contains("Showing 6 of 6 tasks"));
}

#[tokio::test]
async fn create_task_from_form_reloads_list() {
    let services = services(true);
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 32);
    let mut app = app_on(Page::Tasks);
    let startup = app.start();
    settle(&mut app, &tx, &mut rx, startup).await;

    app.handle_key_event(key(KeyCode::Char('n')));
    assert!(app.tasks.form.is_open());
    type_text(&mut app, "ab");
    let submit = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
    assert!(app.handle_key_event(submit).is_empty());
    assert!(render(&app).contains("Title must be at least 3 characters long"));

    type_text(&mut app, "c");
    let commands = app.handle_key_event(submit);
    assert!(matches!(commands.as_slice(), [Command::SaveTask { .. }]));
    settle(&mut app, &tx, &mut rx, commands).await;

    assert!(!app.tasks.form.is_open());
    assert_eq!(latest(&app), Some("Task created successfully!"));
    assert_eq!(app.tasks.list.items().len(), 7);
    assert_eq!(app.tasks.list.items().last().unwrap().title, "abc");
}

#[tokio::test]
async fn reorder_moves_task_down_in_store() {
    let services = services(true);
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 32);
    let mut app = app_on(Page::Tasks);
    let startup = app.start();
    settle(&mut app, &tx, &mut rx, startup).await;

    press(&mut app, &tx, &mut rx, KeyCode::Char('J')).await;
    assert_eq!(app.tasks.selected_item().unwrap().id, TaskId(1));
    let stored: Vec<TaskId> = services
        .tasks
        .get_all()
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(&stored[..2], &[TaskId(2), TaskId(1)]);
}

#[tokio::test]
async fn stale_load_after_reentry_is_dropped() {
    let services = services(true);
    let mut app = app_on(Page::Dashboard);

    // Answers for the first visit are computed but not yet applied.
    let mut old = Vec::new();
    for cmd in app.enter_page(Page::Tasks) {
        old.extend(execute(&*services, cmd).await);
    }
    let _fresh = app.enter_page(Page::Tasks);
    for event in old {
        assert!(app.apply_event(event).is_empty());
    }
    assert_eq!(app.tasks.list.load_state(), &LoadState::Loading);
    assert!(app.tasks.list.items().is_empty());
    assert!(app.project_lookup.is_empty());
}

#[tokio::test]
async fn empty_store_offers_create() {
    let services = services(false);
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 32);
    let mut app = app_on(Page::Tasks);
    let startup = app.start();
    settle(&mut app, &tx, &mut rx, startup).await;

    let screen = render(&app);
    assert!(screen.contains("No tasks yet"));
    assert!(screen.contains("Enter: Create task"));
    app.handle_key_event(key(KeyCode::Enter));
    assert!(app.tasks.form.is_open());
    assert!(render(&app).contains("New Task"));
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_delete_requires_confirmation() {
    let services = services(true);
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 32);
    let mut app = app_on(Page::Projects);
    let startup = app.start();
    settle(&mut app, &tx, &mut rx, startup).await;
    assert_eq!(app.projects.list.items().len(), 3);

    let target = app.projects.selected_item().unwrap().id;
    app.handle_key_event(key(KeyCode::Char('d')));
    assert_eq!(app.confirm_delete, Some(target));
    assert!(render(&app).contains("Are you sure you want to delete this project?"));

    // Anything but `y` backs out.
    assert!(app.handle_key_event(key(KeyCode::Char('n'))).is_empty());
    assert_eq!(app.confirm_delete, None);
    assert_eq!(services.projects.get_all().await.unwrap().len(), 3);

    app.handle_key_event(key(KeyCode::Char('d')));
    press(&mut app, &tx, &mut rx, KeyCode::Char('y')).await;
    assert_eq!(latest(&app), Some("Project deleted successfully"));
    assert!(app.projects.list.get(target).is_none());
    assert_eq!(services.projects.get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn created_project_appears_first() {
    let services = services(true);
    let (tx, mut rx) = spawn_dispatcher(Arc::clone(&services), 32);
    let mut app = app_on(Page::Projects);
    let startup = app.start();
    settle(&mut app, &tx, &mut rx, startup).await;

    app.handle_key_event(key(KeyCode::Char('n')));
    type_text(&mut app, "Data Platform");
    press(&mut app, &tx, &mut rx, KeyCode::Enter).await;

    assert_eq!(latest(&app), Some("Project created successfully!"));
    let first = &app.projects.list.items()[0];
    assert_eq!(first.name, "Data Platform");
    assert_eq!(first.id, ProjectId(4));
    assert_eq!(app.projects.selected, 0);
}
