use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use flowarden_core::Workflow;
use flowarden_gateway::GatewayBuilder;
use flowarden_rules::{Rule, RuleStore};
use flowarden_server::api::AppState;
use flowarden_server::config::FlowardenConfig;
use flowarden_server::seed::{apply_seeds, load_seed_file};
use flowarden_state::WorkflowStore;
use flowarden_state_memory::MemoryScopedStore;

/// Flowarden event pipeline HTTP server.
#[derive(Parser, Debug)]
#[command(name = "flowarden-server", about = "Standalone HTTP server for Flowarden")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "flowarden.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber from RUST_LOG or default to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = FlowardenConfig::load(Path::new(&cli.config))?;

    let rules: Arc<RuleStore> = Arc::new(MemoryScopedStore::<Rule>::new());
    let workflows: Arc<WorkflowStore> = Arc::new(MemoryScopedStore::<Workflow>::new());

    // Seed paths are resolved relative to the config file's directory.
    if let Some(ref seed_path) = config.seeds.path {
        let path = if Path::new(seed_path).is_relative() {
            Path::new(&cli.config)
                .parent()
                .unwrap_or(Path::new("."))
                .join(seed_path)
        } else {
            Path::new(seed_path).to_path_buf()
        };
        let specs = load_seed_file(&path)?;
        let summary = apply_seeds(rules.as_ref(), workflows.as_ref(), specs).await?;
        info!(
            path = %path.display(),
            scopes = summary.scopes,
            rules = summary.rules,
            workflows = summary.workflows,
            "seeds applied"
        );
    }

    let gateway = Arc::new(
        GatewayBuilder::new()
            .rule_store(rules)
            .workflow_store(workflows)
            .default_mode(config.engine.default_evaluation_mode)
            .build()?,
    );
    info!(
        default_mode = ?config.engine.default_evaluation_mode,
        handlers = ?gateway.dispatcher().registry().list(),
        "gateway ready"
    );

    let app = flowarden_server::api::router(AppState {
        gateway: Arc::clone(&gateway),
    });

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "flowarden-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Wait for events still processing in the background.
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    info!(
        timeout_secs = config.server.shutdown_timeout_seconds,
        "waiting for in-flight events..."
    );
    if tokio::time::timeout(shutdown_timeout, gateway.shutdown())
        .await
        .is_err()
    {
        warn!(
            timeout_secs = config.server.shutdown_timeout_seconds,
            "shutdown timeout exceeded, some events may not have finished"
        );
    }

    info!("flowarden-server shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
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
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
