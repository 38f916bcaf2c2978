//! Field mapping between storage records and UI-facing entities.
//!
//! Backends disagree on field names: the hosted store suffixes custom
//! columns (`title_c`, `priority_c`) and names its system columns `Id`,
//! `Name`, `CreatedOn`, while the mock backend and the UI use plain names
//! (`title`, `priority`, `createdAt`). Lookup columns arrive either as a bare
//! scalar or as an object such as `{"Id": 3, "Name": "Emily Rodriguez"}`.
//!
//! Reading resolves every field once, in this order: storage name, plain
//! name, documented default. Writing projects drafts and patches onto the
//! storage names. Nothing outside this module looks at raw records.
//!
//! `normalize_*` is idempotent: normalising an already-normalised record
//! returns it unchanged.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::project::{Project, ProjectDraft, ProjectId, ProjectPatch, ProjectStatus};
use crate::task::{Priority, Task, TaskDraft, TaskId, TaskPatch};
use crate::user::{User, UserId};

/// A raw record as stored by a backend.
pub type Record = Map<String, Value>;

/// Errors produced while mapping a record into an entity.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    /// The record was not a JSON object.
    #[error("{kind} record is not an object")]
    NotAnObject {
        /// Entity kind being mapped.
        kind: &'static str,
    },
    /// The record carries no identifier under any known name.
    #[error("{kind} record has no identifier")]
    MissingId {
        /// Entity kind being mapped.
        kind: &'static str,
    },
    /// The identifier is present but not a non-negative integer.
    #[error("{kind} record has invalid identifier {value}")]
    InvalidId {
        /// Entity kind being mapped.
        kind: &'static str,
        /// The offending value, rendered as JSON.
        value: String,
    },
    /// The entity could not be rendered back to JSON.
    #[error("failed to encode {kind}: {reason}")]
    Encode {
        /// Entity kind being encoded.
        kind: &'static str,
        /// Serializer message.
        reason: String,
    },
}

/// Storage name first, then plain names, for one logical field.
struct Field {
    stored: &'static str,
    plain: &'static [&'static str],
}

impl Field {
    const fn new(stored: &'static str, plain: &'static [&'static str]) -> Self {
        Self { stored, plain }
    }

    /// Returns the first value that is present, non-null and not an empty
    /// string.
    fn lookup<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        std::iter::once(self.stored)
            .chain(self.plain.iter().copied())
            .filter_map(|name| record.get(name))
            .find(|value| !is_blank(value))
    }
}

const ID: Field = Field::new("Id", &["id"]);
const TITLE: Field = Field::new("title_c", &["title"]);
const DESCRIPTION: Field = Field::new("description_c", &["description"]);
const PRIORITY: Field = Field::new("priority_c", &["priority"]);
const COMPLETED: Field = Field::new("completed_c", &["completed"]);
const ASSIGNEE: Field = Field::new("assignee_c", &["assignee"]);
const PROJECT: Field = Field::new("project_id_c", &["projectId", "project_id"]);
const ORDER: Field = Field::new("order_c", &["order"]);
const CREATED_AT: Field = Field::new("CreatedOn", &["createdAt", "created_at"]);
const UPDATED_AT: Field = Field::new("ModifiedOn", &["updatedAt", "updated_at"]);
const PROJECT_NAME: Field = Field::new("name_c", &["Name", "name"]);
const STATUS: Field = Field::new("status_c", &["status"]);
const MILESTONE: Field = Field::new("milestone_c", &["milestone"]);
const USER_NAME: Field = Field::new("Name", &["name"]);
const EMAIL: Field = Field::new("email_c", &["email"]);
const ROLE: Field = Field::new("role_c", &["role"]);

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn as_record<'a>(value: &'a Value, kind: &'static str) -> Result<&'a Record, MapError> {
    value.as_object().ok_or(MapError::NotAnObject { kind })
}

/// Extracts text from a scalar, or the `Name` of an object-shaped reference.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Object(obj)) => text(obj.get("Name").or_else(|| obj.get("name"))),
        _ => String::new(),
    }
}

/// Extracts an integer identifier from a scalar or an object's `Id`.
fn reference_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(obj) => obj.get("Id").or_else(|| obj.get("id")).and_then(reference_id),
        _ => None,
    }
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

fn integer(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let Some(Value::String(s)) = value else {
        return None;
    };
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn required_id(record: &Record, kind: &'static str) -> Result<u64, MapError> {
    let value = ID.lookup(record).ok_or(MapError::MissingId { kind })?;
    reference_id(value).ok_or_else(|| MapError::InvalidId {
        kind,
        value: value.to_string(),
    })
}

fn encode<T: serde::Serialize>(entity: &T, kind: &'static str) -> Result<Value, MapError> {
    serde_json::to_value(entity).map_err(|e| MapError::Encode {
        kind,
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Read direction
// ---------------------------------------------------------------------------

/// Maps a task record of either shape into a [`Task`].
///
/// # Errors
///
/// Returns [`MapError`] if the record is not an object or has no usable id.
pub fn task_from_record(value: &Value) -> Result<Task, MapError> {
    let record = as_record(value, "task")?;
    Ok(Task {
        id: TaskId(required_id(record, "task")?),
        title: text(TITLE.lookup(record)),
        description: text(DESCRIPTION.lookup(record)),
        priority: PRIORITY
            .lookup(record)
            .and_then(Value::as_str)
            .and_then(Priority::parse)
            .unwrap_or_default(),
        completed: flag(COMPLETED.lookup(record)),
        assignee: text(ASSIGNEE.lookup(record)),
        project_id: PROJECT.lookup(record).and_then(reference_id).map(ProjectId),
        order: integer(ORDER.lookup(record)),
        created_at: timestamp(CREATED_AT.lookup(record)),
        updated_at: timestamp(UPDATED_AT.lookup(record)),
    })
}

/// Maps a project record of either shape into a [`Project`].
///
/// # Errors
///
/// Returns [`MapError`] if the record is not an object or has no usable id.
pub fn project_from_record(value: &Value) -> Result<Project, MapError> {
    let record = as_record(value, "project")?;
    Ok(Project {
        id: ProjectId(required_id(record, "project")?),
        name: text(PROJECT_NAME.lookup(record)),
        description: text(DESCRIPTION.lookup(record)),
        status: STATUS
            .lookup(record)
            .and_then(Value::as_str)
            .and_then(ProjectStatus::parse)
            .unwrap_or_default(),
        milestone: text(MILESTONE.lookup(record)),
        assignee: text(ASSIGNEE.lookup(record)),
    })
}

/// Maps a user record of either shape into a [`User`].
///
/// # Errors
///
/// Returns [`MapError`] if the record is not an object or has no usable id.
pub fn user_from_record(value: &Value) -> Result<User, MapError> {
    let record = as_record(value, "user")?;
    Ok(User {
        id: UserId(required_id(record, "user")?),
        name: text(USER_NAME.lookup(record)),
        email: text(EMAIL.lookup(record)),
        role: text(ROLE.lookup(record)),
    })
}

/// Renders a task in UI-facing (plain-named) shape.
///
/// # Errors
///
/// Returns [`MapError::Encode`] if serialization fails.
pub fn task_to_value(task: &Task) -> Result<Value, MapError> {
    encode(task, "task")
}

/// Renders a project in UI-facing (plain-named) shape.
///
/// # Errors
///
/// Returns [`MapError::Encode`] if serialization fails.
pub fn project_to_value(project: &Project) -> Result<Value, MapError> {
    encode(project, "project")
}

/// Normalises a task record of either shape into UI-facing shape.
///
/// # Errors
///
/// Returns [`MapError`] if the record cannot be mapped.
pub fn normalize_task(value: &Value) -> Result<Value, MapError> {
    task_to_value(&task_from_record(value)?)
}

/// Normalises a project record of either shape into UI-facing shape.
///
/// # Errors
///
/// Returns [`MapError`] if the record cannot be mapped.
pub fn normalize_project(value: &Value) -> Result<Value, MapError> {
    project_to_value(&project_from_record(value)?)
}

// ---------------------------------------------------------------------------
// Write direction
// ---------------------------------------------------------------------------

fn project_ref(id: Option<ProjectId>) -> Value {
    id.map_or(Value::Null, |id| Value::from(id.0))
}

fn timestamp_value(ts: Option<DateTime<Utc>>) -> Value {
    ts.map_or(Value::Null, |ts| Value::String(ts.to_rfc3339()))
}

/// Projects a task draft onto storage field names.
#[must_use]
pub fn task_draft_to_storage(draft: &TaskDraft) -> Record {
    task_patch_to_storage(&TaskPatch::from(draft.clone()))
}

/// Projects the fields set in a task patch onto storage field names.
#[must_use]
pub fn task_patch_to_storage(patch: &TaskPatch) -> Record {
    let mut record = Record::new();
    if let Some(title) = &patch.title {
        record.insert(TITLE.stored.into(), Value::from(title.as_str()));
    }
    if let Some(description) = &patch.description {
        record.insert(DESCRIPTION.stored.into(), Value::from(description.as_str()));
    }
    if let Some(priority) = patch.priority {
        record.insert(PRIORITY.stored.into(), Value::from(priority.as_str()));
    }
    if let Some(completed) = patch.completed {
        record.insert(COMPLETED.stored.into(), Value::Bool(completed));
    }
    if let Some(assignee) = &patch.assignee {
        record.insert(ASSIGNEE.stored.into(), Value::from(assignee.as_str()));
    }
    if let Some(project_id) = patch.project_id {
        record.insert(PROJECT.stored.into(), project_ref(project_id));
    }
    record
}

/// Projects a whole task onto storage field names, system columns included.
#[must_use]
pub fn task_to_storage(task: &Task) -> Record {
    let mut record = task_draft_to_storage(&TaskDraft::from(task));
    record.insert(ID.stored.into(), Value::from(task.id.0));
    record.insert(COMPLETED.stored.into(), Value::Bool(task.completed));
    record.insert(ORDER.stored.into(), Value::from(task.order));
    record.insert(CREATED_AT.stored.into(), timestamp_value(task.created_at));
    record.insert(UPDATED_AT.stored.into(), timestamp_value(task.updated_at));
    record
}

/// Projects a project draft onto storage field names.
#[must_use]
pub fn project_draft_to_storage(draft: &ProjectDraft) -> Record {
    project_patch_to_storage(&ProjectPatch::from(draft.clone()))
}

/// Projects the fields set in a project patch onto storage field names.
#[must_use]
pub fn project_patch_to_storage(patch: &ProjectPatch) -> Record {
    let mut record = Record::new();
    if let Some(name) = &patch.name {
        record.insert(PROJECT_NAME.stored.into(), Value::from(name.as_str()));
    }
    if let Some(description) = &patch.description {
        record.insert(DESCRIPTION.stored.into(), Value::from(description.as_str()));
    }
    if let Some(status) = patch.status {
        record.insert(STATUS.stored.into(), Value::from(status.as_str()));
    }
    if let Some(milestone) = &patch.milestone {
        record.insert(MILESTONE.stored.into(), Value::from(milestone.as_str()));
    }
    if let Some(assignee) = &patch.assignee {
        record.insert(ASSIGNEE.stored.into(), Value::from(assignee.as_str()));
    }
    record
}

/// Projects a whole project onto storage field names.
#[must_use]
pub fn project_to_storage(project: &Project) -> Record {
    let mut record = project_draft_to_storage(&ProjectDraft::from(project));
    record.insert(ID.stored.into(), Value::from(project.id.0));
    record
}

/// Fields written through storage names. `ID` and the user columns are never
/// patched.
const WRITABLE: [Field; 12] = [
    TITLE,
    DESCRIPTION,
    PRIORITY,
    COMPLETED,
    ASSIGNEE,
    PROJECT,
    ORDER,
    UPDATED_AT,
    CREATED_AT,
    PROJECT_NAME,
    STATUS,
    MILESTONE,
];

/// Plain-name aliases of the field stored under `stored`.
fn plain_aliases(stored: &str) -> &'static [&'static str] {
    WRITABLE
        .iter()
        .find(|field| field.stored == stored)
        .map(|field| field.plain)
        .unwrap_or_default()
}

/// Shallow-merges storage-named `patch` into a stored `record`.
///
/// Each written field's plain aliases are removed from the record, so a
/// cleared value (`""` or `null`) is not shadowed by a stale plain-named
/// copy on read.
pub fn merge_storage(record: &mut Record, patch: Record) {
    for (name, value) in patch {
        for alias in plain_aliases(&name) {
            record.remove(*alias);
        }
        record.insert(name, value);
    }
}

/// Sets the display order of a stored task record.
pub fn set_storage_order(record: &mut Record, order: i64) {
    let mut patch = Record::new();
    patch.insert(ORDER.stored.into(), Value::from(order));
    merge_storage(record, patch);
}

/// Sets the modification timestamp of a stored record.
pub fn set_storage_updated_at(record: &mut Record, at: DateTime<Utc>) {
    let mut patch = Record::new();
    patch.insert(UPDATED_AT.stored.into(), timestamp_value(Some(at)));
    merge_storage(record, patch);
}
