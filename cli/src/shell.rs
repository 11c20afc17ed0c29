//! Interactive list view.
//!
//! `Shell` owns the synchronizer and the form draft and turns each `Intent`
//! into at most one synchronizer call. `run` feeds it lines from any async
//! reader and writes rendered views to any writer, so the whole loop can be
//! driven from tests.

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use todo_core::view::{self, Draft, Intent, HELP};
use todo_core::{ListState, Synchronizer, Transport};
use tracing::debug;

/// What the front end should do after an intent was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Render,
    Print(String),
    Quit,
}

pub struct Shell<T> {
    sync: Synchronizer<T>,
    draft: Draft,
}

impl<T: Transport> Shell<T> {
    pub fn new(sync: Synchronizer<T>) -> Self {
        Self {
            sync,
            draft: Draft::default(),
        }
    }

    pub fn state(&self) -> &ListState {
        self.sync.state()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn render(&self) -> String {
        view::render(self.sync.state(), &self.draft)
    }

    /// Initial fetch; failures land in the state's error slot.
    pub async fn load(&mut self) {
        let _ = self.sync.load().await;
    }

    pub fn shutdown(&self) {
        self.sync.shutdown();
    }

    pub async fn handle(&mut self, intent: Intent) -> Step {
        match intent {
            Intent::Toggle(id) => {
                let _ = self.sync.toggle(id).await;
            }
            Intent::Delete(id) => {
                let _ = self.sync.delete(id).await;
            }
            Intent::Show(id) => {
                return match self.sync.fetch(id).await {
                    Ok(todo) => Step::Print(view::render_detail(&todo)),
                    Err(err) => Step::Print(format!("Error: {err}\n")),
                };
            }
            Intent::Title(title) => self.draft.title = title,
            Intent::Status(completed) => self.draft.completed = completed,
            Intent::Submit => self.submit().await,
            Intent::Add(title) => {
                self.draft.title = title;
                self.submit().await;
            }
            Intent::Refresh => {
                let _ = self.sync.refresh().await;
            }
            Intent::Help => return Step::Print(format!("{HELP}\n")),
            Intent::Quit => return Step::Quit,
        }
        Step::Render
    }

    /// The draft survives a failed create so it can be corrected.
    async fn submit(&mut self) {
        match self.sync.create(self.draft.to_input()).await {
            Ok(_) => self.draft.reset(),
            Err(err) => debug!(error = %err, "draft kept after failed create"),
        }
    }
}

/// Run the read-eval-render loop until `quit`, end of input, or
/// cancellation. In-flight requests are cancelled on exit.
pub async fn run<T, R, W>(
    mut shell: Shell<T>,
    input: R,
    out: &mut W,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}", shell.render())?;
    shell.load().await;
    write!(out, "{}", shell.render())?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line.context("failed to read input")?,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        let step = match line.parse::<Intent>() {
            Ok(intent) => shell.handle(intent).await,
            Err(err) => Step::Print(format!("{err}\n")),
        };
        match step {
            Step::Render => write!(out, "{}", shell.render())?,
            Step::Print(text) => write!(out, "{text}")?,
            Step::Quit => break,
        }
        if cancel.is_cancelled() {
            break;
        }
    }
    writeln!(out)?;
    shell.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use todo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, TodoClient};

    use super::*;

    const DOC: &str = r#"{"id":1,"title":"Buy milk","completed":false,"createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z"}"#;

    /// Answers lists with one item and creates with that item; counts calls.
    #[derive(Default)]
    struct OneItem {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for OneItem {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match request.method {
                HttpMethod::Get => Ok(HttpResponse::new(200, format!(r#"{{"docs":[{DOC}]}}"#))),
                HttpMethod::Post => Ok(HttpResponse::new(201, format!(r#"{{"doc":{DOC},"message":"ok"}}"#))),
                _ => Ok(HttpResponse::new(500, "")),
            }
        }
    }

    fn shell() -> Shell<OneItem> {
        Shell::new(Synchronizer::new(TodoClient::new("http://test/api"), OneItem::default()))
    }

    fn calls(shell: &Shell<OneItem>) -> usize {
        shell.sync.transport().calls.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn blank_submit_keeps_draft_and_sends_nothing() {
        let mut shell = shell();
        shell.load().await;
        assert_eq!(shell.handle(Intent::Status(true)).await, Step::Render);
        assert_eq!(shell.handle(Intent::Submit).await, Step::Render);

        assert_eq!(calls(&shell), 1);
        assert!(shell.draft().completed);
        assert!(shell.state().error().is_some());
    }

    #[tokio::test]
    async fn successful_add_resets_draft() {
        let mut shell = shell();
        shell.load().await;
        shell.handle(Intent::Status(true)).await;
        shell.handle(Intent::Add("Buy milk".to_string())).await;

        assert_eq!(shell.draft(), &Draft::default());
        assert_eq!(calls(&shell), 3);
    }

    #[tokio::test]
    async fn failed_toggle_keeps_row_and_shows_error() {
        let mut shell = shell();
        shell.load().await;
        shell.handle(Intent::Toggle(1)).await;

        let rendered = shell.render();
        assert!(rendered.contains("Error: 500 - Internal Server Error\n"));
        assert!(rendered.contains("   1 [ ] Buy milk\n"));
    }

    #[tokio::test]
    async fn help_and_quit_do_not_touch_the_backend() {
        let mut shell = shell();
        assert!(matches!(shell.handle(Intent::Help).await, Step::Print(text) if text.contains("toggle <id>")));
        assert_eq!(shell.handle(Intent::Quit).await, Step::Quit);
        assert_eq!(calls(&shell), 0);
    }
}
