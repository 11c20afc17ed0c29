use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// List response page.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub docs: Vec<Todo>,
    pub total_docs: usize,
}

/// Response for single-document mutations.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocEnvelope {
    pub doc: Todo,
    pub message: String,
}

/// Per-operation access rules for the collection. Everything is open by
/// default; a denied operation answers `403`.
#[derive(Clone, Copy, Debug)]
pub struct Access {
    pub read: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Default for Access {
    fn default() -> Self {
        Self {
            read: true,
            create: true,
            update: true,
            delete: true,
        }
    }
}

impl Access {
    pub fn read_only() -> Self {
        Self {
            read: true,
            create: false,
            update: false,
            delete: false,
        }
    }
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    todos: Vec<Todo>,
}

impl Store {
    fn insert(&mut self, title: String, completed: bool) -> Todo {
        self.next_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: self.next_id,
            title,
            completed,
            created_at: now,
            updated_at: now,
        };
        self.todos.push(todo.clone());
        todo
    }

    /// Newest first.
    fn list(&self) -> Vec<Todo> {
        self.todos.iter().rev().cloned().collect()
    }

    fn get(&self, id: u64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == id)
    }

    fn remove(&mut self, id: u64) -> Option<Todo> {
        let index = self.todos.iter().position(|todo| todo.id == id)?;
        Some(self.todos.remove(index))
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    access: Access,
}

/// Error body in the backend's `{ errors: [{ message }] }` shape.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Not Found",
        }
    }

    fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "You are not allowed to perform this action.",
        }
    }

    fn invalid_title() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "The following field is invalid: title",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "errors": [{ "message": self.message }] });
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    app_with_access(Access::default())
}

pub fn app_with_access(access: Access) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        access,
    };
    let todos = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .with_state(state);
    Router::new().nest("/api", todos)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_access(listener, Access::default()).await
}

pub async fn run_with_access(listener: TcpListener, access: Access) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, ?access, "mock backend listening");
    }
    axum::serve(listener, app_with_access(access)).await
}

fn allow(granted: bool) -> Result<(), ApiError> {
    if granted {
        Ok(())
    } else {
        Err(ApiError::forbidden())
    }
}

fn valid_title(title: Option<String>) -> Result<String, ApiError> {
    match title {
        Some(title) if !title.trim().is_empty() => Ok(title),
        _ => Err(ApiError::invalid_title()),
    }
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Page>, ApiError> {
    allow(state.access.read)?;
    let docs = state.db.read().await.list();
    debug!(count = docs.len(), "list todos");
    Ok(Json(Page {
        total_docs: docs.len(),
        docs,
    }))
}

async fn create_todo(
    State(state): State<AppState>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<DocEnvelope>), ApiError> {
    allow(state.access.create)?;
    let title = valid_title(input.title)?;
    let doc = state.db.write().await.insert(title, input.completed);
    debug!(id = doc.id, "created todo");
    Ok((
        StatusCode::CREATED,
        Json(DocEnvelope {
            doc,
            message: "Todo successfully created.".to_string(),
        }),
    ))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, ApiError> {
    allow(state.access.read)?;
    let db = state.db.read().await;
    db.get(id).cloned().map(Json).ok_or_else(ApiError::not_found)
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<DocEnvelope>, ApiError> {
    allow(state.access.update)?;
    let title = input.title.map(|title| valid_title(Some(title))).transpose()?;
    let mut db = state.db.write().await;
    let todo = db.get_mut(id).ok_or_else(ApiError::not_found)?;
    if let Some(title) = title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    todo.updated_at = Utc::now().max(todo.updated_at);
    debug!(id, completed = todo.completed, "updated todo");
    Ok(Json(DocEnvelope {
        doc: todo.clone(),
        message: "Updated successfully.".to_string(),
    }))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DocEnvelope>, ApiError> {
    allow(state.access.delete)?;
    let doc = state.db.write().await.remove(id).ok_or_else(ApiError::not_found)?;
    debug!(id, "deleted todo");
    Ok(Json(DocEnvelope {
        doc,
        message: "Deleted successfully.".to_string(),
    }))
}
