//! Application state and event handling.
//!
//! [`App`] is driven from two sides: key presses from the terminal
//! ([`App::handle_key_event`]) and service results from the dispatcher
//! ([`App::apply_event`]). Both return the [`Command`]s to send next; the
//! app itself never awaits anything.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use focusflow_proto::filter::{
    ListQuery, PriorityFilter, ProjectQuery, ProjectStatusFilter, StatusFilter, TaskQuery,
};
use focusflow_proto::{Entity, Project, ProjectDraft, ProjectId, Stats, Task, TaskDraft, User};

use crate::config::AppConfig;
use crate::dispatch::{Command, Event};
use crate::forms::{
    Draft, FieldKind, Form, FormField, FormMode, SubmitError, project_choices, user_choices,
};
use crate::notify::{Notification, NotificationCenter};
use crate::reconcile::{EmptyAction, ListReconciler, ListView, Move, ViewToken};
use crate::service::ServiceError;

/// Top-level pages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Progress summary and quick actions.
    #[default]
    Dashboard,
    /// Task list with filters.
    Tasks,
    /// Project list.
    Projects,
}

impl Page {
    /// Pages in tab order.
    pub const ALL: [Self; 3] = [Self::Dashboard, Self::Tasks, Self::Projects];

    /// Tab title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Tasks => "Tasks",
            Self::Projects => "Projects",
        }
    }

    /// The page after this one, wrapping.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Dashboard => Self::Tasks,
            Self::Tasks => Self::Projects,
            Self::Projects => Self::Dashboard,
        }
    }
}

/// State of the dashboard page.
#[derive(Debug)]
pub struct DashboardPage {
    token: ViewToken,
    /// Latest task summary, once loaded.
    pub stats: Option<Stats>,
    /// Message from the last failed stats load.
    pub load_error: Option<String>,
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self {
            token: ViewToken::fresh(),
            stats: None,
            load_error: None,
        }
    }
}

impl DashboardPage {
    /// This view's token.
    #[must_use]
    pub const fn token(&self) -> ViewToken {
        self.token
    }
}

/// State shared by the task and project pages: the list, its query, the
/// selected row and the create/edit form.
#[derive(Debug)]
pub struct ListPage<E: Entity, Q, D: Draft<Target = E>> {
    /// Canonical list for this page.
    pub list: ListReconciler<E>,
    /// Search text and filters.
    pub query: Q,
    /// Index of the selected row within the filtered view.
    pub selected: usize,
    /// Whether keys currently go to the search box.
    pub searching: bool,
    /// Create/edit form.
    pub form: Form<D>,
}

impl<E, Q, D> Default for ListPage<E, Q, D>
where
    E: Entity,
    Q: ListQuery<E> + Default,
    D: Draft<Target = E>,
{
    fn default() -> Self {
        Self {
            list: ListReconciler::new(),
            query: Q::default(),
            selected: 0,
            searching: false,
            form: Form::new(),
        }
    }
}

impl<E, Q, D> ListPage<E, Q, D>
where
    E: Entity,
    Q: ListQuery<E> + Default,
    D: Draft<Target = E>,
{
    /// What the list currently renders.
    pub fn view(&self) -> ListView<'_, E> {
        self.list.view(&self.query)
    }

    fn shown_len(&self) -> usize {
        match self.view() {
            ListView::Items { shown, .. } => shown.len(),
            _ => 0,
        }
    }

    /// The entity under the cursor.
    #[must_use]
    pub fn selected_item(&self) -> Option<&E> {
        match self.list.view(&self.query) {
            ListView::Items { shown, .. } => shown.get(self.selected).copied(),
            _ => None,
        }
    }

    /// The follow-up an empty list offers, if the list is empty.
    #[must_use]
    pub fn empty_action(&self) -> Option<EmptyAction> {
        match self.view() {
            ListView::Empty(state) => Some(state.action()),
            _ => None,
        }
    }

    fn select_next(&mut self) {
        let len = self.shown_len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_id(&mut self, id: E::Id) {
        let index = match self.view() {
            ListView::Items { shown, .. } => shown.iter().position(|item| item.id() == id),
            _ => None,
        };
        if let Some(index) = index {
            self.selected = index;
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.shown_len().saturating_sub(1));
    }

    /// Resets search and filters.
    pub fn clear_filters(&mut self) {
        self.query = Q::default();
        self.searching = false;
        self.selected = 0;
    }
}

/// Task page state.
pub type TasksPage = ListPage<Task, TaskQuery, TaskDraft>;

/// Project page state.
pub type ProjectsPage = ListPage<Project, ProjectQuery, ProjectDraft>;

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Page on screen.
    pub page: Page,
    /// Dashboard state.
    pub dashboard: DashboardPage,
    /// Task page state.
    pub tasks: TasksPage,
    /// Project page state.
    pub projects: ProjectsPage,
    /// Projects loaded by the task page, for names and the project picker.
    pub project_lookup: Vec<Project>,
    /// User directory, for the assignee picker.
    pub users: Vec<User>,
    /// Project awaiting delete confirmation.
    pub confirm_delete: Option<ProjectId>,
    /// Live notifications.
    pub notifications: NotificationCenter,
    /// chrono format for dates older than yesterday.
    pub timestamp_format: String,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the app on the configured start page. Nothing is loaded until
    /// [`start`](Self::start) is called.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            page: config.start_page,
            dashboard: DashboardPage::default(),
            tasks: TasksPage::default(),
            projects: ProjectsPage::default(),
            project_lookup: Vec::new(),
            users: Vec::new(),
            confirm_delete: None,
            notifications: NotificationCenter::new(config.notification_ttl),
            timestamp_format: config.timestamp_format.clone(),
            should_quit: false,
        }
    }

    /// Commands that populate the start page and the user directory.
    pub fn start(&mut self) -> Vec<Command> {
        let mut commands = vec![Command::LoadUsers];
        commands.extend(self.enter_page(self.page));
        commands
    }

    /// Switches to `page` with a fresh view and returns its load commands.
    ///
    /// Results still in flight for the previous view of that page are
    /// dropped when they arrive.
    pub fn enter_page(&mut self, page: Page) -> Vec<Command> {
        tracing::debug!(?page, "enter page");
        self.page = page;
        self.confirm_delete = None;
        match page {
            Page::Dashboard => {
                self.dashboard = DashboardPage::default();
                vec![Command::LoadStats {
                    token: self.dashboard.token(),
                }]
            }
            Page::Tasks => {
                self.tasks = TasksPage::default();
                self.tasks.list.begin_load();
                let token = self.tasks.list.token();
                vec![Command::LoadTasks { token }, Command::LoadProjects { token }]
            }
            Page::Projects => {
                self.projects = ProjectsPage::default();
                self.projects.list.begin_load();
                vec![Command::LoadProjects {
                    token: self.projects.list.token(),
                }]
            }
        }
    }

    /// Reloads the current page, keeping what is on screen until the answer
    /// arrives.
    pub fn reload(&mut self) -> Vec<Command> {
        match self.page {
            Page::Dashboard => vec![Command::LoadStats {
                token: self.dashboard.token(),
            }],
            Page::Tasks => self.reload_tasks(),
            Page::Projects => {
                self.projects.list.begin_load();
                vec![Command::LoadProjects {
                    token: self.projects.list.token(),
                }]
            }
        }
    }

    fn reload_tasks(&mut self) -> Vec<Command> {
        self.tasks.list.begin_load();
        vec![Command::LoadTasks {
            token: self.tasks.list.token(),
        }]
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Name of the project with `id`, from the task page's lookup.
    #[must_use]
    pub fn project_name(&self, id: ProjectId) -> Option<&str> {
        self.project_lookup
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    // -----------------------------------------------------------------------
    // Service results
    // -----------------------------------------------------------------------

    /// Settles a command that could not be queued for the dispatcher.
    ///
    /// The command is applied as a failed result, so an optimistic toggle is
    /// rolled back and nothing is left pending. Returns follow-up commands
    /// like [`apply_event`](Self::apply_event).
    pub fn command_dropped(&mut self, cmd: Command, reason: &str) -> Vec<Command> {
        tracing::warn!(?cmd, reason, "command dropped");
        cmd.into_failure(ServiceError::Backend(reason.to_string()))
            .map(|event| self.apply_event(event))
            .unwrap_or_default()
    }

    /// Applies one result from the dispatcher.
    ///
    /// Results tagged with a token that no live view owns are dropped.
    pub fn apply_event(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::TasksLoaded { token, result } => {
                if self.tasks.list.owns(token) {
                    if let Some(note) = self.tasks.list.apply_load(result) {
                        self.notify(note);
                    }
                    self.tasks.clamp_selection();
                } else {
                    stale(token);
                }
            }
            Event::StatsLoaded { token, result } => {
                if self.dashboard.token() == token {
                    match result {
                        Ok(stats) => {
                            self.dashboard.stats = Some(stats);
                            self.dashboard.load_error = None;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "stats load failed");
                            self.dashboard.load_error = Some(e.to_string());
                            self.notify(Notification::error(
                                "Failed to load statistics. Please try again.",
                            ));
                        }
                    }
                } else {
                    stale(token);
                }
            }
            Event::ProjectsLoaded { token, result } => {
                if self.projects.list.owns(token) {
                    if let Some(note) = self.projects.list.apply_load(result) {
                        self.notify(note);
                    }
                    self.projects.clamp_selection();
                } else if self.tasks.list.owns(token) {
                    match result {
                        Ok(projects) => self.project_lookup = projects,
                        Err(e) => tracing::warn!(error = %e, "project lookup failed"),
                    }
                } else {
                    stale(token);
                }
            }
            Event::UsersLoaded(result) => match result {
                Ok(users) => self.users = users,
                Err(e) => {
                    tracing::warn!(error = %e, "user directory load failed");
                    self.notify(Notification::error("Failed to load team members"));
                }
            },
            Event::TaskUpdated { token, id, result } => {
                if self.tasks.list.owns(token) {
                    if let Some(settled) = self.tasks.list.settle_toggle(id, result) {
                        self.notify(settled.notification);
                    }
                } else {
                    stale(token);
                }
            }
            Event::TaskDeleted { token, id, result } => {
                if self.tasks.list.owns(token) {
                    let note = self.tasks.list.settle_delete(id, result);
                    self.notify(note);
                    self.tasks.clamp_selection();
                } else {
                    stale(token);
                }
            }
            Event::TaskSaved {
                token,
                mode,
                result,
            } => {
                if !self.tasks.list.owns(token) {
                    stale(token);
                    return Vec::new();
                }
                let created = mode == FormMode::Create;
                match self.tasks.form.finish_submit(result) {
                    Ok(task) => {
                        tracing::info!(id = %task.id, created, "task saved");
                        self.notify(Notification::success(if created {
                            "Task created successfully!"
                        } else {
                            "Task updated successfully!"
                        }));
                        return self.reload_tasks();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, created, "task save failed");
                        self.notify(Notification::error(if created {
                            "Failed to create task"
                        } else {
                            "Failed to update task"
                        }));
                    }
                }
            }
            Event::TasksReordered { token, result } => {
                if !self.tasks.list.owns(token) {
                    stale(token);
                } else if let Err(e) = result {
                    tracing::warn!(error = %e, "reorder failed, reloading");
                    self.notify(Notification::error("Failed to reorder tasks"));
                    return self.reload_tasks();
                }
            }
            Event::ProjectSaved {
                token,
                mode,
                result,
            } => {
                if !self.projects.list.owns(token) {
                    stale(token);
                    return Vec::new();
                }
                let verb = match mode {
                    FormMode::Create => "create",
                    FormMode::Edit(_) => "update",
                };
                match self.projects.form.finish_submit(result) {
                    Ok(project) => {
                        tracing::info!(id = %project.id, verb, "project saved");
                        if mode == FormMode::Create {
                            self.projects.list.insert_front(project);
                            self.projects.selected = 0;
                        } else {
                            self.projects.list.replace(project);
                        }
                        self.notify(Notification::success(format!(
                            "Project {verb}d successfully!"
                        )));
                    }
                    Err(e) => {
                        self.notify(Notification::error(format!(
                            "Failed to {verb} project: {e}"
                        )));
                    }
                }
            }
            Event::ProjectDeleted { token, id, result } => {
                if self.projects.list.owns(token) {
                    let note = self.projects.list.settle_delete(id, result);
                    self.notify(note);
                    self.projects.clamp_selection();
                } else {
                    stale(token);
                }
            }
        }
        Vec::new()
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    /// Handles a key event and returns the commands it produced.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }

        // Overlays take every key.
        if self.page == Page::Tasks && self.tasks.form.is_open() {
            return self.handle_task_form_key(key);
        }
        if self.page == Page::Projects && self.projects.form.is_open() {
            return self.handle_project_form_key(key);
        }
        if let Some(id) = self.confirm_delete.take() {
            return self.handle_confirm_key(id, key);
        }
        match self.page {
            Page::Tasks if self.tasks.searching => {
                edit_search(&mut self.tasks.query.search, &mut self.tasks.searching, key);
                self.tasks.selected = 0;
                return Vec::new();
            }
            Page::Projects if self.projects.searching => {
                edit_search(
                    &mut self.projects.query.search,
                    &mut self.projects.searching,
                    key,
                );
                self.projects.selected = 0;
                return Vec::new();
            }
            _ => {}
        }

        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Vec::new();
            }
            KeyCode::Tab => return self.enter_page(self.page.next()),
            KeyCode::Char('1') => return self.enter_page(Page::Dashboard),
            KeyCode::Char('2') => return self.enter_page(Page::Tasks),
            KeyCode::Char('3') => return self.enter_page(Page::Projects),
            KeyCode::Char('r') => return self.reload(),
            _ => {}
        }

        match self.page {
            Page::Dashboard => self.handle_dashboard_key(key),
            Page::Tasks => self.handle_tasks_key(key),
            Page::Projects => self.handle_projects_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('n') => {
                let commands = self.enter_page(Page::Tasks);
                self.tasks.form.open_create();
                commands
            }
            KeyCode::Char('t') | KeyCode::Enter => self.enter_page(Page::Tasks),
            KeyCode::Char('p') => self.enter_page(Page::Projects),
            _ => Vec::new(),
        }
    }

    fn handle_tasks_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let page = &mut self.tasks;
        let token = page.list.token();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => page.select_next(),
            KeyCode::Char('k') | KeyCode::Up => page.select_previous(),
            KeyCode::Char('J') => return self.move_selected_task(Move::Down),
            KeyCode::Char('K') => return self.move_selected_task(Move::Up),
            KeyCode::Char(' ' | 'x') => {
                let Some(id) = page.selected_item().map(|t| t.id) else {
                    return Vec::new();
                };
                return page
                    .list
                    .begin_toggle(id)
                    .map(|completed| Command::SetTaskCompleted {
                        token,
                        id,
                        completed,
                    })
                    .into_iter()
                    .collect();
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = page.selected_item().map(|t| t.id) {
                    return vec![Command::DeleteTask { token, id }];
                }
            }
            KeyCode::Char('n') => page.form.open_create(),
            KeyCode::Char('e') => open_edit(page),
            KeyCode::Enter => match page.empty_action() {
                Some(EmptyAction::CreateItem) => page.form.open_create(),
                Some(EmptyAction::ClearFilters) => page.clear_filters(),
                None => open_edit(page),
            },
            KeyCode::Char('/') => page.searching = true,
            KeyCode::Char('s') => {
                page.query.status = cycle(&StatusFilter::ALL, page.query.status);
                page.selected = 0;
            }
            KeyCode::Char('p') => {
                page.query.priority = cycle(&PriorityFilter::ALL, page.query.priority);
                page.selected = 0;
            }
            KeyCode::Char('c') => page.clear_filters(),
            _ => {}
        }
        Vec::new()
    }

    fn move_selected_task(&mut self, direction: Move) -> Vec<Command> {
        let Some(id) = self.tasks.selected_item().map(|t| t.id) else {
            return Vec::new();
        };
        let Some(ids) = self.tasks.list.move_task(id, direction, &self.tasks.query) else {
            return Vec::new();
        };
        self.tasks.select_id(id);
        vec![Command::ReorderTasks {
            token: self.tasks.list.token(),
            ids,
        }]
    }

    fn handle_projects_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let page = &mut self.projects;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => page.select_next(),
            KeyCode::Char('k') | KeyCode::Up => page.select_previous(),
            KeyCode::Char('d') | KeyCode::Delete => {
                self.confirm_delete = page.selected_item().map(|p| p.id);
            }
            KeyCode::Char('n') => page.form.open_create(),
            KeyCode::Char('e') => open_edit(page),
            KeyCode::Enter => match page.empty_action() {
                Some(EmptyAction::CreateItem) => page.form.open_create(),
                Some(EmptyAction::ClearFilters) => page.clear_filters(),
                None => open_edit(page),
            },
            KeyCode::Char('/') => page.searching = true,
            KeyCode::Char('s') => {
                page.query.status = cycle(&ProjectStatusFilter::ALL, page.query.status);
                page.selected = 0;
            }
            KeyCode::Char('c') => page.clear_filters(),
            _ => {}
        }
        Vec::new()
    }

    /// Any key other than `y` cancels the pending delete.
    fn handle_confirm_key(&self, id: ProjectId, key: KeyEvent) -> Vec<Command> {
        if matches!(key.code, KeyCode::Char('y' | 'Y')) {
            vec![Command::DeleteProject {
                token: self.projects.list.token(),
                id,
            }]
        } else {
            tracing::debug!(%id, "project delete cancelled");
            Vec::new()
        }
    }

    fn handle_task_form_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if !handle_form_key(&mut self.tasks.form, key, &self.users, &self.project_lookup) {
            return Vec::new();
        }
        match self.tasks.form.begin_submit() {
            Ok(submission) => vec![Command::SaveTask {
                token: self.tasks.list.token(),
                mode: submission.mode,
                draft: submission.draft,
            }],
            Err(e) => {
                log_rejected_submit("task", &e);
                Vec::new()
            }
        }
    }

    fn handle_project_form_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if !handle_form_key(&mut self.projects.form, key, &self.users, &[]) {
            return Vec::new();
        }
        match self.projects.form.begin_submit() {
            Ok(submission) => vec![Command::SaveProject {
                token: self.projects.list.token(),
                mode: submission.mode,
                draft: submission.draft,
            }],
            Err(e) => {
                log_rejected_submit("project", &e);
                Vec::new()
            }
        }
    }
}

fn stale(token: ViewToken) {
    tracing::debug!(%token, "dropping result for a view that is gone");
}

fn log_rejected_submit(kind: &str, error: &SubmitError) {
    tracing::debug!(kind, %error, "submit rejected");
}

fn open_edit<E, Q, D>(page: &mut ListPage<E, Q, D>)
where
    E: Entity,
    Q: ListQuery<E> + Default,
    D: Draft<Target = E>,
{
    if let Some(entity) = page.selected_item().cloned() {
        page.form.open_edit(&entity);
    }
}

/// The value after `current` in `all`, wrapping.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let index = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(index + 1) % all.len()]
}

fn edit_search(search: &mut String, searching: &mut bool, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => *searching = false,
        KeyCode::Backspace => {
            search.pop();
        }
        KeyCode::Char(c) => search.push(c),
        _ => {}
    }
}

/// Routes a key to an open form. Returns `true` when the user asked to
/// submit.
fn handle_form_key<D: Draft>(
    form: &mut Form<D>,
    key: KeyEvent,
    users: &[User],
    projects: &[Project],
) -> bool {
    if form.picker().is_some() {
        match key.code {
            KeyCode::Esc => form.dismiss_picker(),
            KeyCode::Enter => form.commit_picker(),
            KeyCode::Up => {
                if let Some(picker) = form.picker_mut() {
                    picker.previous();
                }
            }
            KeyCode::Down | KeyCode::Tab => {
                if let Some(picker) = form.picker_mut() {
                    picker.next();
                }
            }
            KeyCode::Backspace => {
                if let Some(picker) = form.picker_mut() {
                    picker.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(picker) = form.picker_mut() {
                    picker.push(c);
                }
            }
            _ => {}
        }
        return false;
    }

    let kind = form.focused().kind();
    match key.code {
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Esc => form.cancel(),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
        KeyCode::Enter if kind == FieldKind::Lookup => {
            let options = if form.focused() == FormField::Project {
                project_choices(projects)
            } else {
                user_choices(users)
            };
            form.open_picker(options);
        }
        KeyCode::Enter => return true,
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if kind == FieldKind::Cycle => {
            form.cycle_focused();
        }
        KeyCode::Char(c) => form.input(c),
        KeyCode::Backspace => form.backspace(),
        _ => {}
    }
    false
}
