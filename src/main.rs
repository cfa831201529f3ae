use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bfhl::api::{AppState, router};
use bfhl::config::ServiceConfig;
use bfhl::consts::{DEFAULT_OFFICIAL_EMAIL, DEFAULT_PROVIDER_TIMEOUT_SECS};
use bfhl::dispatch::Dispatcher;
use bfhl::provider::AnswerProvider;
use bfhl::provider::gemini::GeminiProvider;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Parser)]
#[command(name = "bfhl", version, about = "One endpoint, five operations.")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Identity reported in every successful response
    #[arg(long, env = "OFFICIAL_EMAIL", default_value = DEFAULT_OFFICIAL_EMAIL)]
    official_email: String,

    /// Gemini API key; AI requests fail without it
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL")]
    model: Option<String>,

    /// Gemini REST root, overridable for proxies and tests
    #[arg(long, env = "GEMINI_BASE_URL")]
    gemini_base_url: Option<String>,

    /// AI provider timeout in seconds
    #[arg(short, long, env = "AI_TIMEOUT_SECS", default_value_t = DEFAULT_PROVIDER_TIMEOUT_SECS)]
    timeout: u64,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

impl Cli {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            official_email: self.official_email.clone(),
            provider_timeout: Duration::from_secs(self.timeout),
            gemini: None,
        }
        .with_gemini(
            self.gemini_api_key.clone(),
            self.model.clone(),
            self.gemini_base_url.clone(),
        )
    }
}

fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bfhl=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    let config = cli.service_config();
    let provider: Option<Arc<dyn AnswerProvider>> = match &config.gemini {
        Some(gemini) => {
            info!(model = %gemini.model, "AI provider configured");
            Some(Arc::new(GeminiProvider::new(gemini.clone())?) as Arc<dyn AnswerProvider>)
        }
        None => {
            warn!("GEMINI_API_KEY not set; AI requests will fail");
            None
        }
    };

    let dispatcher = Dispatcher::new(provider, config.provider_timeout);
    let app = router(AppState::new(dispatcher, &config.official_email));

    let addr = SocketAddr::new(cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, version = env!("CARGO_PKG_VERSION"), "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
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
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
