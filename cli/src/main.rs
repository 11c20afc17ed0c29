use clap::Parser;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use todo_cli::config::init_tracing;
use todo_cli::{commands, shell, Cli, Command, Config, Shell, UreqTransport};
use todo_core::{Synchronizer, TodoClient};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let config = Config::from_cli(cli)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(config));
    // Stdin reads and ureq calls on the blocking pool cannot be interrupted;
    // exit without waiting for them.
    runtime.shutdown_background();
    result
}

async fn run(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupted, cancelling pending requests");
                cancel.cancel();
            }
        }
    });

    let client = TodoClient::new(config.api_url.as_str());
    let mut sync = Synchronizer::new(client, UreqTransport::new()).with_cancellation(cancel.child_token());
    let mut stdout = std::io::stdout();

    match config.command {
        Command::Shell => {
            let input = BufReader::new(tokio::io::stdin());
            shell::run(Shell::new(sync), input, &mut stdout, cancel).await
        }
        command => commands::execute(command, &mut sync, &mut stdout).await,
    }
}
