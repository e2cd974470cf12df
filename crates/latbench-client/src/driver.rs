//! Load driver: worker fan-out plus the scrape server.
//!
//! Workers loop on `fetch` forever. There is no pacing, no backpressure and
//! no drain: they stop when the runtime is dropped at process exit. Each
//! iteration yields once, so a fetch that fails without awaiting cannot
//! monopolize a runtime thread.

use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use latbench_core::error::{LatBenchError, Result};

use crate::app_state::AppState;
use crate::client::FetchOutcome;
use crate::config::{self, ClientProfile};
use crate::router;

/// One request against a target. Implementations log their own failures.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Spawn `workers` unbounded fetch loops sharing `fetcher`.
pub fn spawn_workers(fetcher: Arc<dyn Fetcher>, url: Arc<str>, workers: usize) -> Vec<JoinHandle<()>> {
    (0..workers)
        .map(|id| {
            let fetcher = Arc::clone(&fetcher);
            let url = Arc::clone(&url);
            tokio::spawn(async move {
                tracing::debug!(worker = id, %url, "worker started");
                loop {
                    fetcher.fetch(&url).await;
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect()
}

/// Serve `/metrics` on `listener` until `shutdown` resolves.
pub async fn serve_metrics<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router::build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| LatBenchError::Internal(format!("metrics server failed: {e}")))
}

/// Bring up state, start workers, and block on the scrape server.
pub async fn run(state: AppState) -> Result<()> {
    let cfg = state.cfg();
    let url: Arc<str> = Arc::from(cfg.url.as_str());
    let _workers = spawn_workers(state.client(), url, cfg.workers);

    let listener = TcpListener::bind(cfg.listen)
        .await
        .map_err(|e| LatBenchError::Internal(format!("bind {} failed: {e}", cfg.listen)))?;

    tracing::info!(
        listen = %cfg.listen,
        target = %cfg.url,
        transport = %state.client().tag(),
        workers = cfg.workers,
        "serving /metrics"
    );

    serve_metrics(listener, state.clone(), shutdown_signal()).await
}

/// Entry point shared by both client binaries.
///
/// Missing URL: diagnostic and exit 0. Pipeline or bind failure: exit 1.
pub async fn main_for(profile: ClientProfile) -> ExitCode {
    let cfg = match config::load_from_env(profile) {
        Ok(cfg) => cfg,
        Err(e @ LatBenchError::MissingEnv(_)) => {
            // stdout regardless of RUST_LOG
            println!("Error: {e}");
            tracing::debug!(kind = e.kind().as_str(), "missing target url");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            tracing::error!(kind = e.kind().as_str(), "Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(cfg) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(kind = e.kind().as_str(), "Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let res = run(state.clone()).await;

    if let Err(e) = state.provider().shutdown() {
        tracing::warn!(error = %e, "error shutting down meter provider");
    }

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind().as_str(), "Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, shutting down");
}
