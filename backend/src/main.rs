//! Backend entry-point: wires REST endpoints and OpenAPI docs.

mod server;

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::AppConfig;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env()?;
    server::run(config).await
}
