//! List state as a plain value with pure transitions.
//!
//! # Design
//! `ListState` owns the collection, the initial-load flag, and the error
//! slot. Every transition consumes the old value and returns the new one, so
//! each step can be tested without a transport or a terminal. Nothing here
//! changes the collection before the backend has acknowledged a mutation.

use crate::error::ApiError;
use crate::types::{Todo, TodoId};

/// Coarse view of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    todos: Vec<Todo>,
    loading: bool,
    loaded: bool,
    error: Option<ApiError>,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}

impl ListState {
    /// Initial state: loading, nothing fetched yet.
    pub fn new() -> Self {
        Self {
            todos: Vec::new(),
            loading: true,
            loaded: false,
            error: None,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// True only until the first list response (or failure) arrives.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once any list response has been applied successfully.
    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Errored
        } else {
            Phase::Ready
        }
    }

    /// Apply a full list response. Success replaces the collection
    /// wholesale; failure keeps the last-known collection.
    #[must_use]
    pub fn apply_refresh(self, result: Result<Vec<Todo>, ApiError>) -> Self {
        match result {
            Ok(todos) => Self {
                todos,
                loading: false,
                loaded: true,
                error: None,
            },
            Err(err) => self.fail(err),
        }
    }

    /// Apply a create acknowledgement. The collection is left alone: the
    /// caller follows up with a refresh so ordering stays server-determined.
    #[must_use]
    pub fn apply_created(self, result: Result<Todo, ApiError>) -> Self {
        match result {
            Ok(_) => self.clear_error(),
            Err(err) => self.fail(err),
        }
    }

    /// Patch the acknowledged item in place. An id no longer in the
    /// collection is ignored.
    #[must_use]
    pub fn apply_updated(mut self, result: Result<Todo, ApiError>) -> Self {
        match result {
            Ok(updated) => {
                if let Some(slot) = self.todos.iter_mut().find(|todo| todo.id == updated.id) {
                    *slot = updated;
                }
                self.clear_error()
            }
            Err(err) => self.fail(err),
        }
    }

    /// Remove `id` only once the backend confirmed the delete.
    #[must_use]
    pub fn apply_deleted(mut self, id: TodoId, result: Result<(), ApiError>) -> Self {
        match result {
            Ok(()) => {
                self.todos.retain(|todo| todo.id != id);
                self.clear_error()
            }
            Err(err) => self.fail(err),
        }
    }

    /// Record a failure that happened before any request was made, such as
    /// a rejected draft.
    #[must_use]
    pub fn apply_error(self, err: ApiError) -> Self {
        self.fail(err)
    }

    fn clear_error(mut self) -> Self {
        self.error = None;
        self
    }

    fn fail(mut self, err: ApiError) -> Self {
        self.loading = false;
        self.error = Some(err);
        self
    }
}
