use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use podplan_core::config::PodplanConfig;
use podplan_store::CatalogStore;
use tracing::{info, warn};

mod app;
mod http;

#[derive(Parser, Debug)]
#[command(name = "podplan-gateway", version, about = "Podcast episode planner")]
struct Args {
    /// Path to podplan.toml (default: ~/.podplan/podplan.toml)
    #[arg(long, env = "PODPLAN_CONFIG")]
    config: Option<String>,

    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "podplan_gateway=info,podplan_store=info,tower_http=debug".into()
            }),
        )
        .init();

    let args = Args::parse();

    // load config: --config > PODPLAN_CONFIG env > ~/.podplan/podplan.toml
    let mut config = PodplanConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        PodplanConfig::default()
    });
    if let Some(port) = args.port {
        config.gateway.port = port;
    }

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL;")?;

    // schema migration runs once here, never per request
    podplan_store::db::init_db(&db)?;
    info!("database migrations complete");

    let catalog = CatalogStore::new(db);
    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    let mount = config.gateway.mount_path();

    let state = Arc::new(app::AppState::new(config, catalog));
    let router = app::build_router(state);

    info!(mount = %mount, "Podplan gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
