//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the backend collection schema but are defined
//! independently from the mock-server crate. Integration tests catch any
//! schema drift between the two crates.
//!
//! The backend wraps list results in a `{ docs }` page and single-document
//! mutations in a `{ doc, message }` envelope. Both wrappers are private to
//! the client; callers only ever see `Todo`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned todo identifier.
pub type TodoId = u64;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    /// The backend omits unchecked checkbox fields on some records.
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request payload for a partial update. Only the fields present in the JSON
/// are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

/// List response page. Pagination keys other than `docs` are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct TodoPage {
    pub docs: Vec<Todo>,
}

/// Single-document response. The backend answers mutations with
/// `{ doc, message }`; a bare document is accepted as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DocResponse {
    Wrapped { doc: Todo },
    Bare(Todo),
}

impl DocResponse {
    pub fn into_todo(self) -> Todo {
        match self {
            DocResponse::Wrapped { doc } => doc,
            DocResponse::Bare(todo) => todo,
        }
    }
}

/// Backend error body: `{ errors: [{ message }] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEntry {
    pub message: String,
}
