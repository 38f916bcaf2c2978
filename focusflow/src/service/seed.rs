//! Demo data loaded into the in-memory backend.
//!
//! Rows deliberately mix the hosted (suffixed) and mock (plain) field shapes,
//! and some references arrive as `{Id, Name}` objects, so the field mapper
//! sees every shape it has to handle.

use serde_json::{Value, json};

/// Team members offered by the assignee pickers.
#[must_use]
pub fn user_records() -> Vec<Value> {
    vec![
        json!({"Id": 1, "name": "Sarah Johnson", "email": "sarah.johnson@company.com", "role": "Project Manager"}),
        json!({"Id": 2, "name": "Mike Chen", "email": "mike.chen@company.com", "role": "Developer"}),
        json!({"Id": 3, "name": "Emily Rodriguez", "email": "emily.rodriguez@company.com", "role": "Designer"}),
        json!({"Id": 4, "name": "David Kim", "email": "david.kim@company.com", "role": "QA Engineer"}),
        json!({"Id": 5, "Name": "Lisa Wang", "email_c": "lisa.wang@company.com", "role_c": "Business Analyst"}),
        json!({"Id": 6, "Name": "Alex Thompson", "email_c": "alex.thompson@company.com", "role_c": "Developer"}),
        json!({"Id": 7, "Name": "Maria Garcia", "email_c": "maria.garcia@company.com", "role_c": "Product Manager"}),
        json!({"Id": 8, "Name": "James Wilson", "email_c": "james.wilson@company.com", "role_c": "Tech Lead"}),
    ]
}

/// Demo projects.
#[must_use]
pub fn project_records() -> Vec<Value> {
    vec![
        json!({
            "Id": 1,
            "Name": "Website Redesign",
            "description_c": "Refresh the marketing site with the new brand guidelines",
            "status_c": "active",
            "milestone_c": "Design sign-off",
            "assignee_c": {"Id": 3, "Name": "Emily Rodriguez"},
        }),
        json!({
            "Id": 2,
            "name": "Mobile App",
            "description": "Native companion app for iOS and Android",
            "status": "planning",
            "milestone": "Beta release",
            "assignee": "Alex Thompson",
        }),
        json!({
            "Id": 3,
            "name_c": "Q3 Reporting",
            "description_c": "Quarterly metrics dashboard for leadership",
            "status_c": "completed",
            "milestone_c": "Board review",
            "assignee_c": "Lisa Wang",
        }),
    ]
}

/// Demo tasks.
#[must_use]
pub fn task_records() -> Vec<Value> {
    vec![
        json!({
            "Id": 1,
            "title_c": "Draft homepage wireframes",
            "description_c": "Cover desktop and mobile breakpoints",
            "priority_c": "high",
            "completed_c": false,
            "assignee_c": {"Id": 3, "Name": "Emily Rodriguez"},
            "project_id_c": {"Id": 1, "Name": "Website Redesign"},
            "order_c": 1,
            "CreatedOn": "2024-01-15T10:30:00Z",
            "ModifiedOn": "2024-01-15T10:30:00Z",
        }),
        json!({
            "Id": 2,
            "title": "Set up CI pipeline",
            "description": "Build, lint and test on every push",
            "priority": "medium",
            "completed": true,
            "assignee": "Mike Chen",
            "projectId": 2,
            "order": 2,
            "createdAt": "2024-01-14T09:00:00Z",
            "updatedAt": "2024-01-16T17:45:00Z",
        }),
        json!({
            "Id": 3,
            "title_c": "Write onboarding checklist",
            "priority_c": "low",
            "completed_c": false,
            "assignee_c": "Sarah Johnson",
            "order_c": 3,
            "CreatedOn": "2024-01-16T08:15:00Z",
        }),
        json!({
            "Id": 4,
            "title": "Regression test login flow",
            "description": "Include password reset and SSO",
            "priority": "high",
            "completed": false,
            "assignee": "David Kim",
            "projectId": "2",
            "order": 4,
            "createdAt": "2024-01-17T11:20:00Z",
        }),
        json!({
            "Id": 5,
            "title_c": "Export quarterly metrics",
            "priority_c": "medium",
            "completed_c": "true",
            "assignee_c": {"Id": 5, "Name": "Lisa Wang"},
            "project_id_c": 3,
            "order_c": 5,
            "CreatedOn": "2024-01-10T14:00:00Z",
            "ModifiedOn": "2024-01-12T09:30:00Z",
        }),
        json!({
            "Id": 6,
            "title": "Review API error handling",
            "description": "Agree on retry and timeout behaviour",
            "priority": "medium",
            "completed": false,
            "assignee": "James Wilson",
            "projectId": null,
            "order": 6,
            "createdAt": "2024-01-18T16:05:00Z",
        }),
    ]
}
