use clearhorizon::{Config, error::Result, start_server};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = dotenv {
        tracing::debug!("No .env file loaded: {e}");
    }

    let config = Config::load()?;

    start_server(config).await?;

    Ok(())
}
