//! In-memory backend for the data-access traits.
//!
//! Rows are kept in storage shape (suffixed field names, `Id` system
//! column), exactly as a hosted table would return them, and go through the
//! field mapper on every read and write. Each call sleeps for the configured
//! latency and can be made to fail on demand, which is how the reconciler's
//! rollback paths are exercised.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::RwLock;

use focusflow_proto::fields::{self, MapError};
use focusflow_proto::filter::sort_by_order;
use focusflow_proto::{
    Entity, Project, ProjectDraft, ProjectId, ProjectPatch, Stats, Task, TaskDraft, TaskId,
    TaskPatch, User, UserId,
};

use super::{Repository, ServiceError, TaskRepository, UserDirectory, seed};

/// A service operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `get_all`.
    GetAll,
    /// `get_by_id` / `get_by_name`.
    GetOne,
    /// `create`.
    Create,
    /// `update`.
    Update,
    /// `delete`.
    Delete,
    /// `update_order`.
    UpdateOrder,
    /// `get_stats`.
    GetStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaultMode {
    Once,
    Always,
}

/// Simulated network conditions shared by every table.
#[derive(Debug, Default)]
struct Conditions {
    latency: Duration,
    faults: Mutex<HashMap<Operation, FaultMode>>,
}

impl Conditions {
    fn new(latency: Duration) -> Self {
        Self {
            latency,
            faults: Mutex::new(HashMap::new()),
        }
    }

    /// Waits out the latency, then fails if a fault is armed for `op`.
    async fn call(&self, op: Operation, kind: &'static str) -> Result<(), ServiceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let tripped = {
            let mut faults = self.faults.lock();
            match faults.get(&op).copied() {
                Some(FaultMode::Once) => {
                    faults.remove(&op);
                    true
                }
                Some(FaultMode::Always) => true,
                None => false,
            }
        };
        if tripped {
            tracing::debug!(?op, kind, "injected backend failure");
            return Err(ServiceError::Backend(format!(
                "simulated {kind} {op:?} failure"
            )));
        }
        Ok(())
    }

    fn arm(&self, op: Operation, mode: FaultMode) {
        self.faults.lock().insert(op, mode);
    }

    fn clear(&self) {
        self.faults.lock().clear();
    }
}

fn load_error(kind: &'static str, err: &MapError) -> ServiceError {
    ServiceError::Load {
        kind,
        reason: err.to_string(),
    }
}

fn backend_error(err: &MapError) -> ServiceError {
    ServiceError::Backend(err.to_string())
}

/// Decodes every row; any malformed row fails the whole read.
fn decode_all<E>(
    rows: &[Value],
    decode: fn(&Value) -> Result<E, MapError>,
    kind: &'static str,
) -> Result<Vec<E>, ServiceError> {
    rows.iter()
        .map(|row| decode(row).map_err(|e| load_error(kind, &e)))
        .collect()
}

/// Index of the row whose decoded id equals `id`.
fn position<E: Entity>(
    rows: &[Value],
    decode: fn(&Value) -> Result<E, MapError>,
    id: E::Id,
) -> Option<usize> {
    rows.iter()
        .position(|row| decode(row).is_ok_and(|entity| entity.id() == id))
}

/// Shallow-merges `patch` into a stored row.
fn merge(row: &mut Value, patch: fields::Record) {
    if let Value::Object(record) = row {
        fields::merge_storage(record, patch);
    }
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().unwrap_or(0) + 1
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// In-memory task table.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    rows: RwLock<Vec<Value>>,
    conditions: Conditions,
}

impl MemoryTaskStore {
    /// Creates an empty table with the given per-call latency.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self::with_records(Vec::new(), latency)
    }

    /// Creates a table holding the bundled demo tasks.
    #[must_use]
    pub fn seeded(latency: Duration) -> Self {
        Self::with_records(seed::task_records(), latency)
    }

    /// Creates a table from raw storage records (either field shape).
    #[must_use]
    pub fn with_records(records: Vec<Value>, latency: Duration) -> Self {
        Self {
            rows: RwLock::new(records),
            conditions: Conditions::new(latency),
        }
    }

    /// Makes the next call of `op` fail with a backend error.
    pub fn fail_next(&self, op: Operation) {
        self.conditions.arm(op, FaultMode::Once);
    }

    /// Makes every call of `op` fail until [`clear_faults`](Self::clear_faults).
    pub fn fail_always(&self, op: Operation) {
        self.conditions.arm(op, FaultMode::Always);
    }

    /// Removes all injected failures.
    pub fn clear_faults(&self) {
        self.conditions.clear();
    }

    async fn snapshot(&self) -> Result<Vec<Task>, ServiceError> {
        let rows = self.rows.read().await;
        decode_all(&rows, fields::task_from_record, Task::KIND)
    }
}

impl Repository for MemoryTaskStore {
    type Entity = Task;
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    async fn get_all(&self) -> Result<Vec<Task>, ServiceError> {
        self.conditions.call(Operation::GetAll, Task::KIND).await?;
        let mut tasks = self.snapshot().await?;
        sort_by_order(&mut tasks);
        Ok(tasks)
    }

    async fn get_by_id(&self, id: TaskId) -> Result<Task, ServiceError> {
        self.conditions.call(Operation::GetOne, Task::KIND).await?;
        self.snapshot()
            .await?
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| ServiceError::not_found::<Task>(id))
    }

    async fn create(&self, draft: TaskDraft) -> Result<Task, ServiceError> {
        self.conditions.call(Operation::Create, Task::KIND).await?;
        if draft.title.trim().is_empty() {
            return Err(ServiceError::Validation {
                kind: Task::KIND,
                reason: "title is required".to_string(),
            });
        }

        let mut rows = self.rows.write().await;
        let existing = decode_all(&rows, fields::task_from_record, Task::KIND)?;
        let now = Utc::now();
        let task = Task {
            id: TaskId(next_id(existing.iter().map(|t| t.id.0))),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            completed: false,
            assignee: draft.assignee,
            project_id: draft.project_id,
            order: existing.iter().map(|t| t.order).max().unwrap_or(0) + 1,
            created_at: Some(now),
            updated_at: Some(now),
        };
        rows.push(Value::Object(fields::task_to_storage(&task)));
        drop(rows);

        tracing::info!(id = %task.id, order = task.order, "task created");
        Ok(task)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, ServiceError> {
        self.conditions.call(Operation::Update, Task::KIND).await?;
        let mut rows = self.rows.write().await;
        let index = position(&rows, fields::task_from_record, id)
            .ok_or_else(|| ServiceError::not_found::<Task>(id))?;

        let mut record = fields::task_patch_to_storage(&patch);
        fields::set_storage_updated_at(&mut record, Utc::now());
        merge(&mut rows[index], record);
        let task = fields::task_from_record(&rows[index]).map_err(|e| backend_error(&e))?;
        drop(rows);

        tracing::debug!(%id, "task updated");
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> Result<Task, ServiceError> {
        self.conditions.call(Operation::Delete, Task::KIND).await?;
        let mut rows = self.rows.write().await;
        let index = position(&rows, fields::task_from_record, id)
            .ok_or_else(|| ServiceError::not_found::<Task>(id))?;
        let removed = rows.remove(index);
        drop(rows);

        tracing::info!(%id, "task deleted");
        fields::task_from_record(&removed).map_err(|e| backend_error(&e))
    }

    async fn get_stats(&self) -> Result<Stats, ServiceError> {
        self.conditions.call(Operation::GetStats, Task::KIND).await?;
        Ok(Stats::from_completable(&self.snapshot().await?))
    }
}

impl TaskRepository for MemoryTaskStore {
    async fn update_order(&self, ids: Vec<TaskId>) -> Result<(), ServiceError> {
        self.conditions
            .call(Operation::UpdateOrder, Task::KIND)
            .await?;
        let mut rows = self.rows.write().await;
        let now = Utc::now();
        for (position_in_list, id) in ids.iter().enumerate() {
            let Some(index) = position(&rows, fields::task_from_record, *id) else {
                continue;
            };
            let order = i64::try_from(position_in_list + 1).unwrap_or(i64::MAX);
            if let Value::Object(record) = &mut rows[index] {
                fields::set_storage_order(record, order);
                fields::set_storage_updated_at(record, now);
            }
        }
        drop(rows);

        tracing::debug!(count = ids.len(), "task order updated");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// In-memory project table.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    rows: RwLock<Vec<Value>>,
    conditions: Conditions,
}

impl MemoryProjectStore {
    /// Creates an empty table with the given per-call latency.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self::with_records(Vec::new(), latency)
    }

    /// Creates a table holding the bundled demo projects.
    #[must_use]
    pub fn seeded(latency: Duration) -> Self {
        Self::with_records(seed::project_records(), latency)
    }

    /// Creates a table from raw storage records (either field shape).
    #[must_use]
    pub fn with_records(records: Vec<Value>, latency: Duration) -> Self {
        Self {
            rows: RwLock::new(records),
            conditions: Conditions::new(latency),
        }
    }

    /// Makes the next call of `op` fail with a backend error.
    pub fn fail_next(&self, op: Operation) {
        self.conditions.arm(op, FaultMode::Once);
    }

    /// Makes every call of `op` fail until [`clear_faults`](Self::clear_faults).
    pub fn fail_always(&self, op: Operation) {
        self.conditions.arm(op, FaultMode::Always);
    }

    /// Removes all injected failures.
    pub fn clear_faults(&self) {
        self.conditions.clear();
    }

    async fn snapshot(&self) -> Result<Vec<Project>, ServiceError> {
        let rows = self.rows.read().await;
        decode_all(&rows, fields::project_from_record, Project::KIND)
    }
}

impl Repository for MemoryProjectStore {
    type Entity = Project;
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    async fn get_all(&self) -> Result<Vec<Project>, ServiceError> {
        self.conditions.call(Operation::GetAll, Project::KIND).await?;
        self.snapshot().await
    }

    async fn get_by_id(&self, id: ProjectId) -> Result<Project, ServiceError> {
        self.conditions.call(Operation::GetOne, Project::KIND).await?;
        self.snapshot()
            .await?
            .into_iter()
            .find(|project| project.id == id)
            .ok_or_else(|| ServiceError::not_found::<Project>(id))
    }

    async fn create(&self, draft: ProjectDraft) -> Result<Project, ServiceError> {
        self.conditions.call(Operation::Create, Project::KIND).await?;
        if draft.name.trim().is_empty() {
            return Err(ServiceError::Validation {
                kind: Project::KIND,
                reason: "name is required".to_string(),
            });
        }

        let mut rows = self.rows.write().await;
        let existing = decode_all(&rows, fields::project_from_record, Project::KIND)?;
        let project = Project {
            id: ProjectId(next_id(existing.iter().map(|p| p.id.0))),
            name: draft.name,
            description: draft.description,
            status: draft.status,
            milestone: draft.milestone,
            assignee: draft.assignee,
        };
        rows.push(Value::Object(fields::project_to_storage(&project)));
        drop(rows);

        tracing::info!(id = %project.id, "project created");
        Ok(project)
    }

    async fn update(&self, id: ProjectId, patch: ProjectPatch) -> Result<Project, ServiceError> {
        self.conditions.call(Operation::Update, Project::KIND).await?;
        let mut rows = self.rows.write().await;
        let index = position(&rows, fields::project_from_record, id)
            .ok_or_else(|| ServiceError::not_found::<Project>(id))?;
        merge(&mut rows[index], fields::project_patch_to_storage(&patch));
        let project = fields::project_from_record(&rows[index]).map_err(|e| backend_error(&e))?;
        drop(rows);

        tracing::debug!(%id, "project updated");
        Ok(project)
    }

    async fn delete(&self, id: ProjectId) -> Result<Project, ServiceError> {
        self.conditions.call(Operation::Delete, Project::KIND).await?;
        let mut rows = self.rows.write().await;
        let index = position(&rows, fields::project_from_record, id)
            .ok_or_else(|| ServiceError::not_found::<Project>(id))?;
        let removed = rows.remove(index);
        drop(rows);

        tracing::info!(%id, "project deleted");
        fields::project_from_record(&removed).map_err(|e| backend_error(&e))
    }

    async fn get_stats(&self) -> Result<Stats, ServiceError> {
        self.conditions
            .call(Operation::GetStats, Project::KIND)
            .await?;
        Ok(Stats::for_projects(&self.snapshot().await?))
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// In-memory, read-only user directory.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: Vec<User>,
    conditions: Conditions,
}

impl MemoryUserDirectory {
    /// Creates a directory from already-mapped users.
    #[must_use]
    pub fn new(users: Vec<User>, latency: Duration) -> Self {
        Self {
            users,
            conditions: Conditions::new(latency),
        }
    }

    /// Creates a directory holding the bundled team members.
    ///
    /// Malformed seed rows are skipped with a warning.
    #[must_use]
    pub fn seeded(latency: Duration) -> Self {
        let users = seed::user_records()
            .iter()
            .filter_map(|record| match fields::user_from_record(record) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed user seed row");
                    None
                }
            })
            .collect();
        Self::new(users, latency)
    }

    /// Makes the next call of `op` fail with a backend error.
    pub fn fail_next(&self, op: Operation) {
        self.conditions.arm(op, FaultMode::Once);
    }
}

impl UserDirectory for MemoryUserDirectory {
    async fn get_all(&self) -> Result<Vec<User>, ServiceError> {
        self.conditions.call(Operation::GetAll, "user").await?;
        Ok(self.users.clone())
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, ServiceError> {
        self.conditions.call(Operation::GetOne, "user").await?;
        self.users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                kind: "user",
                id: id.to_string(),
            })
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<User>, ServiceError> {
        self.conditions.call(Operation::GetOne, "user").await?;
        Ok(self.users.iter().find(|user| user.name == name).cloned())
    }
}
