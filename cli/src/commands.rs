//! One-shot subcommands. Each prints its result and propagates failures so
//! the process exits non-zero.

use std::io::Write;

use anyhow::Context;
use todo_core::view;
use todo_core::{CreateTodo, Synchronizer, TodoId, Transport};

use crate::config::Command;

pub async fn execute<T, W>(command: Command, sync: &mut Synchronizer<T>, out: &mut W) -> anyhow::Result<()>
where
    T: Transport,
    W: Write,
{
    match command {
        Command::List => {
            sync.load().await.context("could not load todos")?;
            write!(out, "{}", view::render_list(sync.state()))?;
        }
        Command::Show { id } => {
            let todo = sync.fetch(id).await.with_context(|| format!("could not fetch todo {id}"))?;
            write!(out, "{}", view::render_detail(&todo))?;
        }
        Command::Add { title, done } => {
            let created = sync
                .create(CreateTodo {
                    title,
                    completed: done,
                })
                .await
                .context("could not create todo")?;
            writeln!(out, "{}", view::render_row(&created))?;
        }
        Command::Toggle { id } => {
            sync.load().await.context("could not load todos")?;
            let updated = sync.toggle(id).await.with_context(|| format!("could not toggle todo {id}"))?;
            writeln!(out, "{}", view::render_row(&updated))?;
        }
        Command::Done { id } => set_completed(sync, out, id, true).await?,
        Command::Undone { id } => set_completed(sync, out, id, false).await?,
        Command::Delete { id } => {
            sync.delete(id).await.with_context(|| format!("could not delete todo {id}"))?;
            writeln!(out, "deleted {id}")?;
        }
        Command::Shell => anyhow::bail!("the shell is not a one-shot command"),
    }
    Ok(())
}

async fn set_completed<T, W>(
    sync: &mut Synchronizer<T>,
    out: &mut W,
    id: TodoId,
    completed: bool,
) -> anyhow::Result<()>
where
    T: Transport,
    W: Write,
{
    let updated = sync
        .set_completed(id, completed)
        .await
        .with_context(|| format!("could not update todo {id}"))?;
    writeln!(out, "{}", view::render_row(&updated))?;
    Ok(())
}
