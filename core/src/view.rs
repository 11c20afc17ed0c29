//! Text rendering of the list state and parsing of user intents.
//!
//! `render` is a pure function of `ListState` and the form `Draft`. The
//! front end owns the draft; everything else comes from the synchronizer.

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;

use crate::state::ListState;
use crate::types::{CreateTodo, Todo, TodoId};

/// Unsaved form input for a new todo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub completed: bool,
}

impl Draft {
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn to_input(&self) -> CreateTodo {
        CreateTodo {
            title: self.title.clone(),
            completed: self.completed,
        }
    }

    /// Back to an empty, unchecked form after a successful create.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A user action translated from one line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Toggle(TodoId),
    Delete(TodoId),
    Show(TodoId),
    /// Set the draft title.
    Title(String),
    /// Set the draft completed flag.
    Status(bool),
    Submit,
    /// Set the draft title and submit in one step.
    Add(String),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct IntentError(pub String);

impl FromStr for Intent {
    type Err = IntentError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        match command {
            "toggle" | "t" => parse_id(rest).map(Intent::Toggle),
            "delete" | "rm" => parse_id(rest).map(Intent::Delete),
            "show" => parse_id(rest).map(Intent::Show),
            "title" => Ok(Intent::Title(rest.to_string())),
            "status" => match rest {
                "on" | "done" | "true" | "x" => Ok(Intent::Status(true)),
                "off" | "open" | "false" | "" => Ok(Intent::Status(false)),
                other => Err(IntentError(format!("unknown status `{other}`, use on|off"))),
            },
            "submit" => Ok(Intent::Submit),
            "add" => Ok(Intent::Add(rest.to_string())),
            "refresh" | "r" => Ok(Intent::Refresh),
            "help" | "?" => Ok(Intent::Help),
            "quit" | "exit" | "q" => Ok(Intent::Quit),
            "" => Err(IntentError("empty command".to_string())),
            other => Err(IntentError(format!("unknown command `{other}`, try `help`"))),
        }
    }
}

fn parse_id(raw: &str) -> Result<TodoId, IntentError> {
    raw.parse()
        .map_err(|_| IntentError(format!("expected a numeric todo id, got `{raw}`")))
}

pub const HELP: &str = "\
commands:
  toggle <id>        flip the completed flag
  delete <id>        delete a todo
  show <id>          print one todo
  title <text>       set the draft title
  status on|off      set the draft status
  submit             create a todo from the draft
  add <text>         set the draft title and submit
  refresh            reload the list
  quit               leave";

/// Render the list and the creation form.
///
/// While the first fetch is pending only `Loading...` is shown. If that
/// fetch failed and nothing was ever loaded, only the error is shown. Any
/// later error is printed above a list that stays visible.
pub fn render(state: &ListState, draft: &Draft) -> String {
    if state.is_loading() {
        return "Loading...\n".to_string();
    }
    if !state.has_loaded() {
        if let Some(message) = state.error_message() {
            return format!("Error: {message}\n(type `refresh` to retry)\n");
        }
    }

    let mut out = render_list(state);
    let _ = writeln!(out);
    let _ = writeln!(out, "Add New Todo");
    let _ = writeln!(out, "  Title:  {}", draft.title);
    let _ = writeln!(out, "  Status: {}", checkbox(draft.completed));
    out
}

/// Heading, error line (if any), and one row per item.
pub fn render_list(state: &ListState) -> String {
    let mut out = String::from("Todos\n");
    if let Some(message) = state.error_message() {
        let _ = writeln!(out, "Error: {message}");
    }
    if state.todos().is_empty() {
        let _ = writeln!(out, "  (no todos)");
    }
    for todo in state.todos() {
        let _ = writeln!(out, "{}", render_row(todo));
    }
    out
}

pub fn render_row(todo: &Todo) -> String {
    format!("{:>4} {} {}", todo.id, checkbox(todo.completed), todo.title)
}

/// Multi-line detail view of one todo, including timestamps.
pub fn render_detail(todo: &Todo) -> String {
    format!(
        "{}\n     created {}\n     updated {}\n",
        render_row(todo),
        todo.created_at.to_rfc3339(),
        todo.updated_at.to_rfc3339()
    )
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}
