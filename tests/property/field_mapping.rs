//! Property-based tests for the field mapper.
//!
//! Uses proptest to verify:
//! 1. Normalising a record of any accepted shape twice equals normalising once.
//! 2. A task projected onto storage names maps back to the same task.
//! 3. Arbitrary JSON never panics the mapper (returns `Err` gracefully).

use proptest::prelude::*;
use serde_json::{Map, Value, json};
use focusflow_proto::fields::{
    normalize_project, normalize_task, task_from_record, task_to_storage,
};
use focusflow_proto::project::ProjectId;
use focusflow_proto::task::{Priority, Task, TaskId};

/// Strategy for scalar JSON values a loosely-typed backend might send.
fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        Just(json!("HIGH")),
        Just(json!("low")),
        Just(json!("true")),
    ]
}

/// Strategy for a reference column: scalar or `{Id, Name}` object.
fn arb_reference() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_scalar(),
        (0u32..50, "[A-Z][a-z]{2,8}").prop_map(|(id, name)| json!({"Id": id, "Name": name})),
    ]
}

/// Strategy for a task record mixing storage and plain names at random.
fn arb_task_record() -> impl Strategy<Value = Value> {
    (
        0u32..1000,
        any::<bool>(),
        prop::collection::vec(
            (
                prop_oneof![
                    Just("title_c"),
                    Just("title"),
                    Just("description_c"),
                    Just("description"),
                    Just("priority_c"),
                    Just("priority"),
                    Just("completed_c"),
                    Just("completed"),
                    Just("order_c"),
                    Just("order"),
                ],
                arb_scalar(),
            ),
            0..8,
        ),
        prop::collection::vec(
            (
                prop_oneof![
                    Just("assignee_c"),
                    Just("assignee"),
                    Just("project_id_c"),
                    Just("projectId"),
                ],
                arb_reference(),
            ),
            0..3,
        ),
    )
        .prop_map(|(id, suffixed_id, scalars, references)| {
            let mut record = Map::new();
            let id_key = if suffixed_id { "Id" } else { "id" };
            record.insert(id_key.to_string(), json!(id));
            for (key, value) in scalars.into_iter().chain(references) {
                record.insert(key.to_string(), value);
            }
            Value::Object(record)
        })
}

/// Strategy for well-formed tasks.
fn arb_task() -> impl Strategy<Value = Task> {
    (
        any::<u32>(),
        "[a-zA-Z ]{0,20}",
        "[a-zA-Z ]{0,20}",
        prop_oneof![
            Just(Priority::High),
            Just(Priority::Medium),
            Just(Priority::Low)
        ],
        any::<bool>(),
        "[a-zA-Z ]{0,12}",
        proptest::option::of(any::<u32>()),
        any::<i32>(),
    )
        .prop_map(
            |(id, title, description, priority, completed, assignee, project, order)| Task {
                id: TaskId(u64::from(id)),
                title,
                description,
                priority,
                completed,
                assignee,
                project_id: project.map(|p| ProjectId(u64::from(p))),
                order: i64::from(order),
                created_at: None,
                updated_at: None,
            },
        )
}

proptest! {
    #[test]
    fn normalize_task_is_idempotent(record in arb_task_record()) {
        let once = normalize_task(&record).expect("record has an id");
        let twice = normalize_task(&once).expect("normalised record has an id");
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_project_is_idempotent(
        id in 0u32..1000,
        name in "[a-zA-Z ]{0,12}",
        status in prop_oneof![Just("planning"), Just("ACTIVE"), Just("done")],
    ) {
        let record = json!({"Id": id, "Name": name, "status_c": status});
        let once = normalize_project(&record).expect("record has an id");
        let twice = normalize_project(&once).expect("normalised record has an id");
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn storage_projection_maps_back(task in arb_task()) {
        let stored = Value::Object(task_to_storage(&task));
        prop_assert_eq!(task_from_record(&stored).expect("stored record maps"), task);
    }

    #[test]
    fn arbitrary_scalars_never_panic(value in arb_scalar()) {
        let _ = task_from_record(&value);
        let _ = normalize_task(&value);
    }
}
