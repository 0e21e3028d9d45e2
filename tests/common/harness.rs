//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use semgrade::embedding::{EmbeddingProvider, SentenceConfig, SentenceEmbedder};
use semgrade::evaluation::Evaluator;
use semgrade::gateway::{HandlerState, create_router_with_state};
use semgrade::scoring::GradingPolicy;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Embedder failed to load: {0}")]
    EmbedderFailed(#[from] semgrade::EmbeddingError),
}

/// Serves `provider` on an ephemeral localhost port.
pub async fn spawn_server_with<P>(
    provider: P,
    policy: GradingPolicy,
) -> Result<TestServer, ServerStartupError>
where
    P: EmbeddingProvider + 'static,
{
    let evaluator = Arc::new(Evaluator::with_policy(provider, policy));
    let app = create_router_with_state(HandlerState::new(evaluator));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    wait_for_server_ready(
        addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Spawns a server backed by the deterministic stub embedder.
pub async fn spawn_test_server() -> Result<TestServer, ServerStartupError> {
    spawn_server_with(SentenceEmbedder::stub()?, GradingPolicy::default()).await
}

/// Spawns a server backed by a real model loaded from `config`.
pub async fn spawn_real_server(config: SentenceConfig) -> Result<TestServer, ServerStartupError> {
    let embedder = tokio::task::spawn_blocking(move || SentenceEmbedder::load(config))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))??;
    spawn_server_with(embedder, GradingPolicy::default()).await
}
