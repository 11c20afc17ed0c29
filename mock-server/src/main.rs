use mock_server::Access;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let access = match std::env::var("MOCK_ACCESS").as_deref() {
        Ok("read-only") => Access::read_only(),
        _ => Access::default(),
    };
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    mock_server::run_with_access(listener, access).await
}
