//! Schema Miner demo UI — serves the three-stage tabbed interface on a local port.
//! Run: cargo run -p schema-miner-ui
//! Then open http://127.0.0.1:7860 (or the printed URL). Settings: config/schema-miner.toml or SCHEMA_MINER__* env.

use schema_miner_core::{MinerConfig, TabbedInterface, UnwiredSession};
use schema_miner_ui::{build_router, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[schema-miner-ui] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MinerConfig::load()?;
    let template = config.template_source()?;

    // Pre-flight: a broken template still serves, but the operator hears about it now.
    match template.load() {
        Ok(_) => tracing::info!("schema template: {}", template.path.display()),
        Err(e) => tracing::error!("schema template unusable, output areas will show a diagnostic: {}", e),
    }

    let state = AppState {
        app_name: Arc::from(config.app_name.as_str()),
        interface: Arc::new(TabbedInterface::build()),
        template: Arc::new(template),
        session: Arc::new(UnwiredSession),
        max_upload_bytes: config.max_upload_bytes,
    };
    let app = build_router(state);

    let addrs = config.bind_addrs()?;
    let listener = tokio::net::TcpListener::bind(&addrs[..]).await?;
    let url = format!("http://{}", listener.local_addr()?);
    tracing::info!("{} running on {}", config.app_name, url);
    println!("{}: {}", config.app_name, url);
    if config.open_browser && webbrowser::open(&url).is_err() {
        tracing::warn!("could not open a browser for {}", url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
