use anyhow::Context;
use dotenv::dotenv;
use tokio::signal;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use care_dashboard_api::api::create_application;
use care_dashboard_api::config::ServerConfig;
use care_dashboard_domain::database;

/// The main entry point for the CareDashboard API server
///
/// Loads `.env`, sets up tracing, initializes the database pool, builds the
/// router and serves it until Ctrl+C or SIGTERM.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(false)
            .with_ansi(true)
            .with_timer(fmt::time::uptime())
            .with_writer(std::io::stdout))
        .with(env_filter)
        .init();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    info!("Starting CareDashboard API server ({})", config.app_env);

    if !config.data_dir.exists() {
        info!("Creating data directory: {}", config.data_dir.display());
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("Failed to create data directory {}", config.data_dir.display()))?;
    }

    if std::env::var("DB_SQLITE_PATH").is_err() {
        std::env::set_var("DB_SQLITE_PATH", config.sqlite_path());
        info!("Set DB_SQLITE_PATH to {}", config.sqlite_path().display());
    }

    match database::initialize_database_pool().await {
        Ok(()) => {
            if let Some(description) = database::get_connection_info() {
                info!("Database pool initialized: {}", description);
            }
        },
        Err(e) => {
            // The repository falls back to in-memory storage
            error!("Failed to initialize database pool: {}", e);
            warn!("Directory records will be served from in-memory storage");
        }
    }

    let app = create_application()
        .await
        .context("Failed to configure the directory client")?;

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
