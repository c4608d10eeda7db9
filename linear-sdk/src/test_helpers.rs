// ABOUTME: Test helper utilities for mocking Linear API responses and server
// ABOUTME: Provides mockito-based helpers for unit testing API interactions

use mockito::{Server, ServerGuard};
use secrecy::SecretString;
use serde_json::json;

use crate::LinearClient;

pub const TEAM_ID: &str = "9cfb482a-81e3-4154-b5b9-2c805e70a02d";
pub const USER_ID: &str = "f2b8d4a1-3c6e-4e9a-8b7d-1a2b3c4d5e6f";
pub const ISSUE_ID: &str = "5a1c9e2b-7d4f-4b8a-9c3e-6f1d2a3b4c5d";
pub const OTHER_ISSUE_ID: &str = "7e3d1b9a-2c4f-4a6e-8d0b-9f8e7d6c5b4a";
pub const CYCLE_ID: &str = "c0ffee00-1234-4abc-9def-0123456789ab";

pub async fn mock_linear_server() -> ServerGuard {
    Server::new_async().await
}

pub fn secret(value: &str) -> SecretString {
    SecretString::new(value.to_string().into_boxed_str())
}

/// Client pointed at the mock server, with no schema cache file.
pub fn client_for(server: &ServerGuard, token: &str) -> LinearClient {
    LinearClient::builder()
        .auth_token(secret(token))
        .base_url(Some(format!("{}/graphql", server.url())))
        .build()
        .unwrap()
}

pub fn mock_viewer_response() -> serde_json::Value {
    json!({
        "data": {
            "viewer": {
                "id": "test-user-id",
                "name": "Test User",
                "email": "test@example.com"
            }
        }
    })
}

pub fn mock_graphql_errors(messages: &[&str]) -> serde_json::Value {
    let errors: Vec<_> = messages
        .iter()
        .map(|message| json!({"message": message}))
        .collect();
    json!({"data": null, "errors": errors})
}

fn scalar(name: &str) -> serde_json::Value {
    json!({"kind": "SCALAR", "name": name, "ofType": null})
}

fn non_null(name: &str) -> serde_json::Value {
    json!({"kind": "NON_NULL", "name": null, "ofType": scalar(name)})
}

fn fields(names: &[&str]) -> serde_json::Value {
    let fields: Vec<_> = names
        .iter()
        .map(|name| json!({"name": name, "type": non_null("String")}))
        .collect();
    json!({"fields": fields})
}

/// A schema where `team(id:)` takes `String!`, `cycle(id:)` takes `ID!`,
/// comments have `bodyData` and issues have neither `descriptionData` nor `attachments`.
pub fn mock_schema_response() -> serde_json::Value {
    json!({
        "data": {
            "__type": {
                "fields": [
                    {"name": "team", "args": [{"name": "id", "type": non_null("String")}], "type": scalar("Team")},
                    {"name": "cycle", "args": [{"name": "id", "type": non_null("ID")}], "type": scalar("Cycle")},
                    {"name": "viewer", "args": [], "type": scalar("User")},
                    {"name": "issues", "args": [{"name": "filter", "type": scalar("IssueFilter")}], "type": scalar("IssueConnection")}
                ]
            },
            "issue": fields(&["id", "title", "description"]),
            "comment": fields(&["id", "body", "bodyData"]),
            "user": fields(&["id", "name", "email"])
        }
    })
}

pub fn mock_type_response(field_names: &[&str]) -> serde_json::Value {
    json!({"data": {"__type": fields(field_names)}})
}

pub fn mock_team_response() -> serde_json::Value {
    json!({
        "data": {
            "team": {"id": TEAM_ID, "key": "ENG", "name": "Engineering"}
        }
    })
}

pub fn mock_teams_response() -> serde_json::Value {
    json!({
        "data": {
            "teams": {
                "nodes": [
                    {"id": TEAM_ID, "key": "ENG", "name": "Engineering"}
                ]
            }
        }
    })
}

pub fn mock_issue_detail_response() -> serde_json::Value {
    json!({
        "data": {
            "issue": {
                "id": ISSUE_ID,
                "identifier": "ENG-123",
                "title": "Fix login redirect",
                "url": "https://linear.app/acme/issue/ENG-123",
                "description": "See [trace.log](https://uploads.linear.app/a/b/c)",
                "priority": 2,
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-02T00:00:00.000Z",
                "team": {"id": TEAM_ID, "key": "ENG"},
                "state": {"name": "In Progress"},
                "assignee": {"name": "Alice"},
                "cycle": null,
                "project": {"name": "Auth"},
                "labels": {"nodes": [{"name": "bug"}, {"name": "p1"}]}
            }
        }
    })
}

pub fn mock_issues_response() -> serde_json::Value {
    json!({
        "data": {
            "issues": {
                "nodes": [
                    {
                        "id": "issue-1",
                        "identifier": "TEST-1",
                        "title": "Test Issue 1",
                        "url": "https://linear.app/acme/issue/TEST-1",
                        "priority": 1,
                        "state": {"name": "Todo"},
                        "assignee": {"name": "Alice"},
                        "team": {"key": "ENG"},
                        "cycle": {"name": "Cycle 3"}
                    },
                    {
                        "id": "issue-2",
                        "identifier": "TEST-2",
                        "title": "Test Issue 2",
                        "url": "https://linear.app/acme/issue/TEST-2",
                        "priority": 0,
                        "state": {"name": "Done"},
                        "assignee": null,
                        "team": {"key": "QA"},
                        "cycle": null
                    }
                ],
                "pageInfo": {"hasNextPage": true, "endCursor": "cursor-2"}
            }
        }
    })
}

fn cycle_node(id: &str, number: i64, active: bool) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Cycle {number}"),
        "number": number,
        "startsAt": "2024-01-01T00:00:00.000Z",
        "endsAt": "2024-01-14T00:00:00.000Z",
        "isActive": active
    })
}

pub fn mock_cycles_response() -> serde_json::Value {
    json!({
        "data": {
            "cycles": {
                "nodes": [cycle_node(CYCLE_ID, 3, true)],
                "pageInfo": {"hasNextPage": false, "endCursor": "cy-cursor"}
            }
        }
    })
}

pub fn mock_team_cycles_response(has_next_page: bool) -> serde_json::Value {
    json!({
        "data": {
            "team": {
                "cycles": {
                    "nodes": [cycle_node("cycle-old", 2, false), cycle_node(CYCLE_ID, 3, true)],
                    "pageInfo": {"hasNextPage": has_next_page, "endCursor": "cy-cursor"}
                }
            }
        }
    })
}

pub fn mock_relations_response() -> serde_json::Value {
    json!({
        "data": {
            "issue": {
                "relations": {
                    "nodes": [
                        {"id": "rel-out", "type": "blocks", "issue": {"id": ISSUE_ID}, "relatedIssue": {"id": OTHER_ISSUE_ID}},
                        {"id": "rel-dup", "type": "duplicate", "issue": {"id": ISSUE_ID}, "relatedIssue": {"id": "x"}}
                    ]
                },
                "inverseRelations": {
                    "nodes": [
                        {"id": "rel-in", "type": "Blocks", "issue": {"id": "blocker-id"}, "relatedIssue": {"id": ISSUE_ID}}
                    ]
                }
            }
        }
    })
}
