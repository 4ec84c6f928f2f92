//! Anteroom -- standby cluster-membership agent daemon.
//!
//! Runs a node in standby mode: serve redirects to the current leader,
//! poll the cluster until a join attempt succeeds, then exit standby
//! so the surrounding tooling can restart the node as a full member.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::oneshot;
use tracing::{info, warn};

use anteroom::{HttpClusterClient, StandbyAgent};

/// Command-line arguments for the standby agent.
#[derive(Parser, Debug)]
#[command(
    name = "anteroom",
    version,
    about = "Standby cluster-membership agent"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "anteroom.example.yaml")]
    config: String,

    /// Override the bind address (host:port).
    #[arg(short, long)]
    bind: Option<String>,

    /// Additional candidate peer addresses, tried after known members.
    #[arg(short, long)]
    peers: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing / logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Loading configuration from {}", cli.config);
    let config = anteroom::config::load_config(&cli.config)?;

    let bind_addr = cli
        .bind
        .unwrap_or_else(|| format!("{}:{}", config.server.host, config.server.port));

    let client = Arc::new(HttpClusterClient::new(Duration::from_secs(
        config.sync.request_timeout,
    ))?);
    let agent = Arc::new(StandbyAgent::new(config.node.clone(), client)?);

    if agent.cluster_recorded() {
        info!(
            "resuming standby episode with cluster({:?})",
            agent.cluster_urls()
        );
    } else {
        info!("fresh standby episode, no prior cluster snapshot");
    }

    // One immediate sync with the operator-supplied hints; a failure
    // here just means the polling loop keeps retrying on its timer.
    let mut hints = config.sync.peers.clone();
    hints.extend(cli.peers);
    if let Err(err) = agent.sync_cluster(&hints).await {
        warn!("initial cluster sync failed: {err}");
    }

    agent.start();
    let remove_notify = agent
        .remove_notify()
        .ok_or_else(|| anyhow::anyhow!("standby agent did not start"))?;

    let app = anteroom::server::app(Arc::clone(&agent));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("standby agent listening on {}", bind_addr);

    // Serve redirects until the node joins the cluster or a signal
    // asks for shutdown.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&agent), remove_notify))
        .await?;

    if agent.join_index() > 0 {
        info!(
            "left standby mode, joined cluster at log index {}",
            agent.join_index()
        );
    } else {
        info!("standby agent shut down");
    }

    Ok(())
}

/// Resolve when standby mode ends: the node joined the cluster, or
/// SIGTERM/SIGINT asked for shutdown (in which case the agent is
/// stopped before returning).
async fn shutdown_signal(agent: Arc<StandbyAgent>, remove_notify: oneshot::Receiver<()>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, shutting down");
            agent.stop().await;
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
            agent.stop().await;
        },
        _ = remove_notify => {
            info!("removed from standby mode, ready to rejoin as a full member");
        },
    }
}
