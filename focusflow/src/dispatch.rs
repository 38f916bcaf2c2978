//! Bridge between the synchronous TUI loop and the async services.
//!
//! The UI thread sends [`Command`]s and drains [`Event`]s once per tick:
//!
//! ```text
//! TUI (main thread)  <-- Event ---   tokio tasks (one per command)
//!                    --- Command ->   reorder worker (one at a time)
//! ```
//!
//! Every command runs on its own tokio task, so service calls settle
//! independently and in any order. [`Command::ReorderTasks`] is the
//! exception: each one writes the whole sequence, so they go through a single
//! worker and are stored in the order they were sent.
//!
//! Results that touch a list carry the [`ViewToken`] of the list that asked
//! for them; the UI drops results whose token no longer matches.

use std::sync::Arc;

use tokio::sync::mpsc;

use focusflow_proto::{
    Project, ProjectDraft, ProjectId, ProjectPatch, Stats, Task, TaskDraft, TaskId, TaskPatch,
    User,
};

use crate::forms::FormMode;
use crate::reconcile::ViewToken;
use crate::service::{ProjectRepository, Repository, ServiceError, TaskRepository, UserDirectory};

/// Requests from the UI to the services.
#[derive(Debug, Clone)]
pub enum Command {
    /// Fetch every task.
    LoadTasks {
        /// Requesting view.
        token: ViewToken,
    },
    /// Fetch task summary counts.
    LoadStats {
        /// Requesting view.
        token: ViewToken,
    },
    /// Fetch every project.
    LoadProjects {
        /// Requesting view.
        token: ViewToken,
    },
    /// Fetch the user directory for pickers.
    LoadUsers,
    /// Persist a task's completed flag.
    SetTaskCompleted {
        /// Requesting view.
        token: ViewToken,
        /// Task to update.
        id: TaskId,
        /// New state.
        completed: bool,
    },
    /// Delete a task.
    DeleteTask {
        /// Requesting view.
        token: ViewToken,
        /// Task to delete.
        id: TaskId,
    },
    /// Create or update a task from a submitted form.
    SaveTask {
        /// Requesting view.
        token: ViewToken,
        /// Create or edit.
        mode: FormMode<TaskId>,
        /// Validated draft.
        draft: TaskDraft,
    },
    /// Persist a new task sequence.
    ReorderTasks {
        /// Requesting view.
        token: ViewToken,
        /// Task ids in their new order.
        ids: Vec<TaskId>,
    },
    /// Create or update a project from a submitted form.
    SaveProject {
        /// Requesting view.
        token: ViewToken,
        /// Create or edit.
        mode: FormMode<ProjectId>,
        /// Validated draft.
        draft: ProjectDraft,
    },
    /// Delete a project.
    DeleteProject {
        /// Requesting view.
        token: ViewToken,
        /// Project to delete.
        id: ProjectId,
    },
    /// Stop accepting commands.
    Shutdown,
}

impl Command {
    /// The event this command answers with when it fails with `error`.
    ///
    /// Used when a command never reaches the services, so the UI can settle
    /// whatever it started for it. `None` for [`Command::Shutdown`].
    #[must_use]
    pub fn into_failure(self, error: ServiceError) -> Option<Event> {
        let event = match self {
            Self::LoadTasks { token } => Event::TasksLoaded {
                token,
                result: Err(error),
            },
            Self::LoadStats { token } => Event::StatsLoaded {
                token,
                result: Err(error),
            },
            Self::LoadProjects { token } => Event::ProjectsLoaded {
                token,
                result: Err(error),
            },
            Self::LoadUsers => Event::UsersLoaded(Err(error)),
            Self::SetTaskCompleted { token, id, .. } => Event::TaskUpdated {
                token,
                id,
                result: Err(error),
            },
            Self::DeleteTask { token, id } => Event::TaskDeleted {
                token,
                id,
                result: Err(error),
            },
            Self::SaveTask { token, mode, .. } => Event::TaskSaved {
                token,
                mode,
                result: Err(error),
            },
            Self::ReorderTasks { token, .. } => Event::TasksReordered {
                token,
                result: Err(error),
            },
            Self::SaveProject { token, mode, .. } => Event::ProjectSaved {
                token,
                mode,
                result: Err(error),
            },
            Self::DeleteProject { token, id } => Event::ProjectDeleted {
                token,
                id,
                result: Err(error),
            },
            Self::Shutdown => return None,
        };
        Some(event)
    }
}

/// Results from the services back to the UI.
#[derive(Debug)]
pub enum Event {
    /// Answer to [`Command::LoadTasks`].
    TasksLoaded {
        /// Requesting view.
        token: ViewToken,
        /// Tasks in display order.
        result: Result<Vec<Task>, ServiceError>,
    },
    /// Answer to [`Command::LoadStats`].
    StatsLoaded {
        /// Requesting view.
        token: ViewToken,
        /// Summary counts.
        result: Result<Stats, ServiceError>,
    },
    /// Answer to [`Command::LoadProjects`].
    ProjectsLoaded {
        /// Requesting view.
        token: ViewToken,
        /// All projects.
        result: Result<Vec<Project>, ServiceError>,
    },
    /// Answer to [`Command::LoadUsers`].
    UsersLoaded(Result<Vec<User>, ServiceError>),
    /// Answer to [`Command::SetTaskCompleted`].
    TaskUpdated {
        /// Requesting view.
        token: ViewToken,
        /// Task that was updated.
        id: TaskId,
        /// The stored task.
        result: Result<Task, ServiceError>,
    },
    /// Answer to [`Command::DeleteTask`].
    TaskDeleted {
        /// Requesting view.
        token: ViewToken,
        /// Task that was deleted.
        id: TaskId,
        /// The removed task.
        result: Result<Task, ServiceError>,
    },
    /// Answer to [`Command::SaveTask`].
    TaskSaved {
        /// Requesting view.
        token: ViewToken,
        /// Create or edit.
        mode: FormMode<TaskId>,
        /// The stored task.
        result: Result<Task, ServiceError>,
    },
    /// Answer to [`Command::ReorderTasks`].
    TasksReordered {
        /// Requesting view.
        token: ViewToken,
        /// Whether the new order was stored.
        result: Result<(), ServiceError>,
    },
    /// Answer to [`Command::SaveProject`].
    ProjectSaved {
        /// Requesting view.
        token: ViewToken,
        /// Create or edit.
        mode: FormMode<ProjectId>,
        /// The stored project.
        result: Result<Project, ServiceError>,
    },
    /// Answer to [`Command::DeleteProject`].
    ProjectDeleted {
        /// Requesting view.
        token: ViewToken,
        /// Project that was deleted.
        id: ProjectId,
        /// The removed project.
        result: Result<Project, ServiceError>,
    },
}

/// Default capacity of the command and event channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// The services a dispatcher calls.
#[derive(Debug)]
pub struct Services<T, P, U> {
    /// Task repository.
    pub tasks: T,
    /// Project repository.
    pub projects: P,
    /// User lookup.
    pub users: U,
}

/// Spawns the command loop and returns its channel handles.
///
/// Must be called from within a tokio runtime.
pub fn spawn_dispatcher<T, P, U>(
    services: Arc<Services<T, P, U>>,
    channel_capacity: usize,
) -> (mpsc::Sender<Command>, mpsc::Receiver<Event>)
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserDirectory,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(channel_capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<Event>(channel_capacity);
    tokio::spawn(command_loop(services, cmd_rx, evt_tx, channel_capacity));
    (cmd_tx, evt_rx)
}

async fn command_loop<T, P, U>(
    services: Arc<Services<T, P, U>>,
    mut cmd_rx: mpsc::Receiver<Command>,
    evt_tx: mpsc::Sender<Event>,
    channel_capacity: usize,
) where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserDirectory,
{
    let (reorder_tx, reorder_rx) = mpsc::channel::<Command>(channel_capacity.max(1));
    tokio::spawn(ordered_worker(
        Arc::clone(&services),
        reorder_rx,
        evt_tx.clone(),
    ));

    while let Some(cmd) = cmd_rx.recv().await {
        if matches!(cmd, Command::Shutdown) {
            tracing::info!("dispatcher shutting down");
            break;
        }
        if matches!(cmd, Command::ReorderTasks { .. }) {
            if reorder_tx.send(cmd).await.is_err() {
                tracing::warn!("reorder worker stopped");
            }
            continue;
        }
        let services = Arc::clone(&services);
        let evt_tx = evt_tx.clone();
        tokio::spawn(async move {
            if let Some(event) = execute(&*services, cmd).await
                && evt_tx.send(event).await.is_err()
            {
                tracing::debug!("event receiver dropped");
            }
        });
    }
}

/// Runs queued commands one at a time, in arrival order.
///
/// Exits once the queue is closed and drained.
async fn ordered_worker<T, P, U>(
    services: Arc<Services<T, P, U>>,
    mut queue: mpsc::Receiver<Command>,
    evt_tx: mpsc::Sender<Event>,
) where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserDirectory,
{
    while let Some(cmd) = queue.recv().await {
        if let Some(event) = execute(&*services, cmd).await
            && evt_tx.send(event).await.is_err()
        {
            tracing::debug!("event receiver dropped");
        }
    }
}

/// Runs one command against the services.
///
/// Returns `None` for [`Command::Shutdown`], which produces no event.
pub async fn execute<T, P, U>(services: &Services<T, P, U>, cmd: Command) -> Option<Event>
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserDirectory,
{
    tracing::debug!(?cmd, "dispatch");
    let event = match cmd {
        Command::LoadTasks { token } => Event::TasksLoaded {
            token,
            result: services.tasks.get_all().await,
        },
        Command::LoadStats { token } => Event::StatsLoaded {
            token,
            result: services.tasks.get_stats().await,
        },
        Command::LoadProjects { token } => Event::ProjectsLoaded {
            token,
            result: services.projects.get_all().await,
        },
        Command::LoadUsers => Event::UsersLoaded(services.users.get_all().await),
        Command::SetTaskCompleted {
            token,
            id,
            completed,
        } => Event::TaskUpdated {
            token,
            id,
            result: services
                .tasks
                .update(id, TaskPatch::completed(completed))
                .await,
        },
        Command::DeleteTask { token, id } => Event::TaskDeleted {
            token,
            id,
            result: services.tasks.delete(id).await,
        },
        Command::SaveTask { token, mode, draft } => {
            let result = match mode {
                FormMode::Create => services.tasks.create(draft).await,
                FormMode::Edit(id) => services.tasks.update(id, TaskPatch::from(draft)).await,
            };
            Event::TaskSaved {
                token,
                mode,
                result,
            }
        }
        Command::ReorderTasks { token, ids } => Event::TasksReordered {
            token,
            result: services.tasks.update_order(ids).await,
        },
        Command::SaveProject { token, mode, draft } => {
            let result = match mode {
                FormMode::Create => services.projects.create(draft).await,
                FormMode::Edit(id) => {
                    services
                        .projects
                        .update(id, ProjectPatch::from(draft))
                        .await
                }
            };
            Event::ProjectSaved {
                token,
                mode,
                result,
            }
        }
        Command::DeleteProject { token, id } => Event::ProjectDeleted {
            token,
            id,
            result: services.projects.delete(id).await,
        },
        Command::Shutdown => return None,
    };
    Some(event)
}
