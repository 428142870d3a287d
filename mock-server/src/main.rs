use mock_server::{MockSettings, ServerSettings};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = ServerSettings::load()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log));
    if let Err(e) = fmt().with_env_filter(filter).try_init() {
        eprintln!("tracing init failed: {e}");
    }

    let addr = settings.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?settings.environment, "mock API listening");
    mock_server::run_with(listener, MockSettings::for_environment(settings.environment)).await?;
    Ok(())
}
