//! Server entry point: environment, logging, pool and migrations, optional
//! demo data, then serve.

use roster_api::{db, routes, seed, AppConfig, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("roster_api=info".parse()?))
        .init();

    let config = AppConfig::from_env();
    tracing::info!(database = %config.database_url, "starting");

    let pool = db::connect(&config.database_url, config.max_connections).await?;

    if config.seed_demo_data {
        seed::load_demo_data(&pool).await?;
    }

    let app = routes::app(AppState { pool });
    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
