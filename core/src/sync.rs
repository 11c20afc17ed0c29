//! Async orchestration of the list state against the backend.
//!
//! # Design
//! `Synchronizer` pairs the stateless `TodoClient` with a `Transport` and a
//! `ListState`. Each operation builds a request, races the transport
//! against the cancellation token, parses the response, and commits the
//! result through one of the pure `ListState` transitions.
//!
//! Mutations are confirmed-only: toggles patch the acknowledged item,
//! creates and deletes are followed by a full refresh. A result that
//! arrives after cancellation is dropped without touching the state.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::state::ListState;
use crate::types::{CreateTodo, Todo, TodoId};

/// Executes one HTTP round trip.
///
/// Implementations return `ApiError::Network` when no response was received.
/// Any response, whatever its status, is returned as `Ok` so the client can
/// classify it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

pub struct Synchronizer<T> {
    client: TodoClient,
    transport: T,
    state: ListState,
    cancel: CancellationToken,
}

impl<T: Transport> Synchronizer<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            state: ListState::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Use a caller-owned token, e.g. a child of the application's token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel every in-flight and future request of this synchronizer.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Initial fetch. Leaves `Loading` for `Ready` or `Errored`.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        info!(base_url = self.client.base_url(), "loading todos");
        self.refresh().await
    }

    /// Re-fetch the whole collection. Also the manual retry after an error.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let request = self.client.build_list_todos();
        let result = self
            .send(request)
            .await
            .and_then(|response| self.client.parse_list_todos(response));
        if let Ok(todos) = &result {
            debug!(count = todos.len(), "collection refreshed");
        }
        self.commit(result, ListState::apply_refresh).map(|_| ())
    }

    /// Fetch a single todo without touching the list state.
    pub async fn fetch(&self, id: TodoId) -> Result<Todo, ApiError> {
        let request = self.client.build_get_todo(id);
        self.send(request)
            .await
            .and_then(|response| self.client.parse_get_todo(response))
    }

    /// Create a todo. A blank title is rejected before any request is made.
    pub async fn create(&mut self, input: CreateTodo) -> Result<Todo, ApiError> {
        let request = match self.client.build_create_todo(&input) {
            Ok(request) => request,
            Err(err) => return self.commit(Err(err), ListState::apply_created),
        };
        let result = self
            .send(request)
            .await
            .and_then(|response| self.client.parse_create_todo(response));
        let created = self.commit(result, ListState::apply_created)?;
        info!(id = created.id, "todo created");
        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// Flip the completed flag of an item currently in the collection.
    pub async fn toggle(&mut self, id: TodoId) -> Result<Todo, ApiError> {
        let Some(current) = self.state.get(id).map(|todo| todo.completed) else {
            let err = ApiError::Validation(format!("no todo with id {id}"));
            return self.commit(Err(err), ListState::apply_updated);
        };
        self.set_completed(id, !current).await
    }

    /// Set the completed flag and patch the acknowledged item in place.
    pub async fn set_completed(&mut self, id: TodoId, completed: bool) -> Result<Todo, ApiError> {
        let request = match self.client.build_set_completed(id, completed) {
            Ok(request) => request,
            Err(err) => return self.commit(Err(err), ListState::apply_updated),
        };
        let result = self
            .send(request)
            .await
            .and_then(|response| self.client.parse_update_todo(response));
        let updated = self.commit(result, ListState::apply_updated)?;
        info!(id, completed = updated.completed, "todo updated");
        Ok(updated)
    }

    /// Delete a todo. The item stays in the collection until the backend
    /// acknowledges the delete.
    pub async fn delete(&mut self, id: TodoId) -> Result<(), ApiError> {
        let request = self.client.build_delete_todo(id);
        let result = self
            .send(request)
            .await
            .and_then(|response| self.client.parse_delete_todo(response));
        self.commit(result, |state, result| state.apply_deleted(id, result))?;
        info!(id, "todo deleted");
        self.refresh_after_mutation().await;
        Ok(())
    }

    async fn refresh_after_mutation(&mut self) {
        if let Err(err) = self.refresh().await {
            debug!(error = %err, "refresh after mutation failed");
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        if self.cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        debug!(method = %request.method, url = %request.url, "sending request");
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            response = self.transport.execute(request) => response,
        }
    }

    /// Apply `result` through `transition` unless the synchronizer has been
    /// cancelled in the meantime.
    fn commit<R, F>(&mut self, result: Result<R, ApiError>, transition: F) -> Result<R, ApiError>
    where
        R: Clone,
        F: FnOnce(ListState, Result<R, ApiError>) -> ListState,
    {
        if self.cancel.is_cancelled() || matches!(result, Err(ApiError::Cancelled)) {
            debug!("dropping result of cancelled operation");
            return Err(ApiError::Cancelled);
        }
        if let Err(err) = &result {
            warn!(kind = ?err.kind(), error = %err, "todo operation failed");
        }
        let outcome = result.clone();
        let state = std::mem::take(&mut self.state);
        self.state = transition(state, result);
        outcome
    }
}
