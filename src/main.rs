//! Semgrade HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use semgrade::config::Config;
use semgrade::embedding::{EmbeddingProvider, SentenceEmbedder};
use semgrade::evaluation::Evaluator;
use semgrade::gateway::{HandlerState, create_router_with_state};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;
    let policy = config.grading_policy()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        excellent_at = policy.excellent_at(),
        partial_at = policy.partial_at(),
        "Semgrade starting"
    );

    let sentence_config = config.sentence_config();
    if sentence_config.testing_stub {
        tracing::warn!("SEMGRADE_STUB_EMBEDDER set, grades will not reflect meaning");
    }

    // Loading may download weights; keep it off the async workers.
    let embedder = tokio::task::spawn_blocking(move || SentenceEmbedder::load(sentence_config))
        .await
        .context("embedder loading task panicked")?
        .context("failed to initialize the embedding model")?;

    tracing::info!(
        model = embedder.model_name(),
        dim = embedder.embedding_dim(),
        stub = embedder.is_stub(),
        "Embedding model ready"
    );

    let evaluator = Arc::new(Evaluator::with_policy(embedder, policy));
    let app = create_router_with_state(HandlerState::new(evaluator));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Semgrade shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var(Config::ENV_PORT)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(Config::default().port);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
