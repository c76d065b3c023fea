use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use docker_images_mcp::config::Settings;
use docker_images_mcp::docker::{DockerEngine, ImageInventory, InMemoryInventory};
use docker_images_mcp::{create_app, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// MCP server listing Docker images over streamable HTTP
#[derive(Debug, Parser)]
#[command(name = "docker-images-mcp", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind, e.g. 0.0.0.0 or ::1
    #[arg(long)]
    bind_address: Option<String>,

    /// Docker socket path or unix:// / tcp:// URL
    #[arg(long)]
    docker_host: Option<String>,

    /// Extra configuration file, loaded after config/default
    #[arg(long)]
    config: Option<String>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Serve a canned inventory instead of querying the engine
    #[arg(long)]
    mock: bool,
}

impl Cli {
    fn apply(self, settings: &mut Settings) {
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(addr) = self.bind_address {
            settings.server.bind_address = addr;
        }
        if let Some(host) = self.docker_host {
            settings.docker.host = Some(host);
        }
        if let Some(level) = self.log_level {
            settings.log.level = level;
        }
        if self.mock {
            settings.docker.mock = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load application settings")?;
    cli.apply(&mut settings);
    settings
        .validate_all()
        .context("Invalid configuration")?;

    let level = settings.log.level.to_ascii_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("docker_images_mcp={level},tower_http={level}"))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let inventory: Arc<dyn ImageInventory> = if settings.docker.mock {
        warn!("Serving a canned image inventory (--mock)");
        Arc::new(InMemoryInventory::sample())
    } else {
        let engine =
            DockerEngine::from_settings(&settings.docker).context("Invalid docker host")?;
        info!("Using container engine at {}", engine.endpoint());
        Arc::new(engine)
    };

    if let Err(e) = inventory.ping().await {
        warn!("Container engine is not answering yet: {}", e);
    }

    let app = create_app(
        AppState::new(inventory),
        Duration::from_secs(settings.server.request_timeout_seconds),
    );

    let address = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;

    info!("Ready to serve MCP over HTTP on {}", address);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server exited gracefully");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
