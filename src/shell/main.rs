use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use event_log_ingest::shell::config::AppConfig;
use event_log_ingest::shell::http::router;
use event_log_ingest::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env()?;
    let state = AppState::build(&config).await?;

    let app = router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Event log endpoint: http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
