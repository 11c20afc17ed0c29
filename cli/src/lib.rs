//! Terminal front end for the todo collection.
//!
//! `config` resolves the command line, `transport` executes requests with
//! ureq, `commands` runs one-shot subcommands, and `shell` is the
//! interactive list view.

pub mod commands;
pub mod config;
pub mod shell;
pub mod transport;

pub use config::{Cli, Command, Config};
pub use shell::Shell;
pub use transport::UreqTransport;
