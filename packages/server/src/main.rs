use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{Level, info};

use server::config::AppConfig;
use server::database::{ensure_indexes, init_db};
use server::oauth::github::GithubProvider;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    ensure_indexes(&db)
        .await
        .context("Failed to ensure indexes")?;

    let identity = GithubProvider::new(config.github.clone())
        .context("Failed to build GitHub client")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        identity: Arc::new(identity),
    };
    let app = server::build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    info!("API reference at http://{}/scalar", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
