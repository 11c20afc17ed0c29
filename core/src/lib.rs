//! Client core for the todo collection of a content-management backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), keeps the list state as a
//! value with pure transitions, and renders it as text.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only `base_url`.
//! - Each CRUD operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `Synchronizer` drives the client through a `Transport` and commits each
//!   acknowledged result into `ListState`.
//! - `view::render` is a pure function of state and form draft.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod state;
pub mod sync;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{ListState, Phase};
pub use sync::{Synchronizer, Transport};
pub use types::{CreateTodo, Todo, TodoId, UpdateTodo};
pub use view::{Draft, Intent};
