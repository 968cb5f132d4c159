use anyhow::{Context, Result};
use clap::Parser;
use meeting_scribe::{create_router, AppState, Config, MeetingStore, ScribeRealtimeClient};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "meeting-scribe", about = "Realtime meeting transcription relay")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/meeting-scribe")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    let api_key = std::env::var("ELEVENLABS_API_KEY")
        .context("ELEVENLABS_API_KEY is not set (required for the recognition service)")?;

    let store = MeetingStore::new(&cfg.storage.data_dir);
    store.init()?;
    info!("Data directory: {}", cfg.storage.data_dir);

    let state = AppState {
        session_config: cfg.session_config(),
        reconcile_config: cfg.reconcile_config(),
        options: cfg.realtime_options(api_key),
        store,
        connector: Arc::new(ScribeRealtimeClient::new()),
    };

    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);
    info!("{} listening on {}", cfg.service.name, addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, create_router(state))
        .await
        .context("HTTP server failed")?;

    Ok(())
}
