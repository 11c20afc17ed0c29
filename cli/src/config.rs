//! Command-line surface and resolved runtime configuration.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use todo_core::TodoId;
use tracing_subscriber::EnvFilter;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Parser, Debug)]
#[command(
    name = "todo",
    version,
    about = "List, create, toggle and delete todos on a REST backend"
)]
pub struct Cli {
    #[arg(
        long,
        env = "TODO_API_URL",
        default_value = DEFAULT_API_URL,
        help = "Base URL of the API; requests go to <url>/todos"
    )]
    pub api_url: String,

    #[arg(
        long,
        env = "TODO_LOG",
        default_value = "warn",
        help = "Log filter used when RUST_LOG is unset (e.g. info, todo_core=debug)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the current list
    List,
    /// Print one todo with its timestamps
    Show { id: TodoId },
    /// Create a todo
    Add {
        title: String,
        #[arg(long, help = "Create it already completed")]
        done: bool,
    },
    /// Flip the completed flag
    Toggle { id: TodoId },
    /// Mark completed
    Done { id: TodoId },
    /// Mark not completed
    Undone { id: TodoId },
    /// Delete a todo
    Delete { id: TodoId },
    /// Interactive list view (default)
    Shell,
}

/// Settings resolved from the command line and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub command: Command,
}

impl Config {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        Ok(Self {
            api_url: normalize_api_url(&cli.api_url)?,
            command: cli.command.unwrap_or(Command::Shell),
        })
    }
}

/// Accept only absolute http(s) URLs; query and fragment are dropped.
pub fn normalize_api_url(raw: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(raw).with_context(|| format!("invalid api url `{raw}`"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        bail!("api url must use http or https, got `{}`", url.scheme());
    }
    if url.cannot_be_a_base() {
        bail!("api url `{raw}` cannot be used as a base");
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Install the stderr subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_shell_and_local_api() {
        let cli = Cli::try_parse_from(["todo"]).unwrap();
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.command, Command::Shell);
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["todo", "add", "Buy milk", "--done"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Add {
                title: "Buy milk".to_string(),
                done: true
            })
        );
        let cli = Cli::try_parse_from(["todo", "--api-url", "http://h:1/api", "delete", "3"]).unwrap();
        assert_eq!(cli.command, Some(Command::Delete { id: 3 }));
        assert_eq!(cli.api_url, "http://h:1/api");
    }

    #[test]
    fn rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["todo", "toggle", "abc"]).is_err());
    }

    #[test]
    fn normalizes_api_url() {
        let url = normalize_api_url("https://cms.example.com/api/?x=1#frag").unwrap();
        assert_eq!(url.as_str(), "https://cms.example.com/api/");
    }

    #[test]
    fn rejects_bad_api_urls() {
        assert!(normalize_api_url("localhost:3000").is_err());
        assert!(normalize_api_url("ftp://example.com/api").is_err());
        assert!(normalize_api_url("not a url").is_err());
    }
}
