// Main entry point for API server

use anyhow::{Context, Result};
use clap::Parser;
use credibility::AnalysisOrchestrator;
use server_core::{server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "server", about = "Credibility analysis HTTP API")]
struct Args {
    /// Log outbound payload sizes and raw provider responses
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose {
        "info,server_core=debug,credibility=debug,openai_client=debug"
    } else {
        "info,server_core=debug,credibility=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting credibility analysis API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(provider = %config.analyzer.provider, "Configuration loaded");

    let orchestrator = AnalysisOrchestrator::from_config(&config.analyzer)
        .context("Failed to initialize analysis provider")?;
    let app = build_app(orchestrator);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("  POST /analyze/article");
    tracing::info!("  POST /analyze/text/short");
    tracing::info!("  POST /analyze/text/long");
    tracing::info!("  GET  /health");
    if args.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
