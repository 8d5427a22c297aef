//! HTTP server binary for pdf2md-service.
//!
//! A thin shim that maps CLI flags and environment variables to
//! `ServiceConfig` and serves the router until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2md_service::config::{API_KEY_ENV, DEFAULT_MODEL};
use pdf2md_service::{router, AppState, ServiceConfig};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Serve PDF-to-Markdown conversion over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md-server",
    version,
    about = "Serve PDF-to-Markdown conversion over HTTP",
    long_about = "Accepts PDF uploads on POST /process-pdf and /process-pdf/raw, converts the \
text layer to Markdown, and optionally reorganises tables with Claude. Set ANTHROPIC_API_KEY \
to enable the reorganisation step.",
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// Interface to bind.
    #[arg(long, env = "PDF2MD_HOST", default_value = "0.0.0.0")]
    host: String,

    /// TCP port.
    #[arg(short, long, env = "PDF2MD_PORT", default_value_t = 5001)]
    port: u16,

    /// Anthropic model used for table reorganisation.
    #[arg(long, env = "PDF2MD_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum tokens per reorganisation response.
    #[arg(long, env = "PDF2MD_MAX_TOKENS", default_value_t = 20000)]
    max_tokens: usize,

    /// Sampling temperature (0.0–1.0; out-of-range values are rejected).
    #[arg(long, env = "PDF2MD_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Per-call timeout for the reorganisation API, in seconds.
    #[arg(long, env = "PDF2MD_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "PDF2MD_MAX_UPLOAD_BYTES", default_value_t = 100 * 1024 * 1024)]
    max_upload_bytes: usize,

    /// Directory for transient files (defaults to the system temp dir).
    #[arg(long, env = "PDF2MD_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(short, long, env = "PDF2MD_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real env vars always win.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Config ───────────────────────────────────────────────────────────
    let mut builder = ServiceConfig::builder()
        .host(cli.host)
        .port(cli.port)
        .model(cli.model)
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .api_timeout_secs(cli.api_timeout)
        .max_upload_bytes(cli.max_upload_bytes)
        .anthropic_api_key(std::env::var(API_KEY_ENV).ok());
    if let Some(dir) = cli.temp_dir {
        builder = builder.temp_dir(dir);
    }
    let config = builder.build().context("Invalid configuration")?;

    if !config.has_api_key() {
        warn!(
            "{} is not set; /process-pdf will return raw Markdown with a notice instead of reorganised tables",
            API_KEY_ENV
        );
    }

    let addr = config.bind_addr().context("Invalid bind address")?;
    let state = Arc::new(AppState::from_config(config));
    info!("Reorganizer: {:?}", state.pipeline.reorganizer());

    // ── Serve ────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("pdf2md-server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
