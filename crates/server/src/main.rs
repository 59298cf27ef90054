use std::{future::IntoFuture, time::Duration};

use config::ServerConfig;
use review_store::ReviewStore;
use server::{AppState, http};
use thiserror::Error;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},review_store={level},config={level},tower_http={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string).unwrap_or_else(|err| {
        eprintln!("Invalid RUST_LOG value {log_level:?} ({err}); falling back to info");
        EnvFilter::new("warn,server=info,review_store=info,config=info")
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let config = ServerConfig::from_env();
    let store = match config.store_seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded reviewer selection");
            ReviewStore::with_seed(seed)
        }
        None => ReviewStore::new(),
    };

    let app_router = http::router(AppState::new(store), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        request_timeout = ?config.request_timeout,
        "Server running on http://{local_addr}"
    );

    let signals = ShutdownSignals::install();
    let graceful = signals.clone();

    let server = axum::serve(listener, app_router)
        .with_graceful_shutdown(async move { graceful.graceful().await })
        .into_future();
    tokio::pin!(server);

    let serve_result = tokio::select! {
        res = &mut server => res,
        _ = signals.forced() => {
            tracing::warn!("Forced shutdown requested, exiting immediately");
            std::process::exit(130);
        }
        _ = signals.deadline(config.shutdown_timeout) => {
            tracing::warn!(
                "In-flight requests still running after {:?}, exiting immediately",
                config.shutdown_timeout
            );
            std::process::exit(130);
        }
    };

    serve_result?;
    tracing::info!("Server stopped");

    Ok(())
}

/// Flags raised by the first (graceful) and second (forced) termination signal.
#[derive(Clone)]
struct ShutdownSignals {
    graceful: watch::Receiver<bool>,
    forced: watch::Receiver<bool>,
}

impl ShutdownSignals {
    fn install() -> Self {
        let (graceful_tx, graceful) = watch::channel(false);
        let (forced_tx, forced) = watch::channel(false);

        tokio::spawn(async move {
            let mut termination = match TerminationSignals::install() {
                Ok(termination) => termination,
                Err(err) => {
                    tracing::error!(error = %err, "Failed to install shutdown signal handlers");
                    return;
                }
            };

            termination.recv().await;
            tracing::info!("Shutdown requested, draining in-flight requests (signal again to force)");
            let _ = graceful_tx.send(true);

            termination.recv().await;
            tracing::warn!("Second shutdown signal received, forcing exit");
            let _ = forced_tx.send(true);
        });

        Self { graceful, forced }
    }

    async fn graceful(&self) {
        flag_raised(self.graceful.clone()).await;
    }

    async fn forced(&self) {
        flag_raised(self.forced.clone()).await;
    }

    /// Resolves `grace` after the graceful flag is raised.
    async fn deadline(&self, grace: Duration) {
        self.graceful().await;
        tokio::time::sleep(grace).await;
    }
}

/// Waits until the flag is set. A dropped sender means the flag can never be
/// raised, so the future stays pending.
async fn flag_raised(mut rx: watch::Receiver<bool>) {
    let raised = rx.wait_for(|raised| *raised).await.is_ok();
    if !raised {
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
struct TerminationSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: Option<tokio::signal::unix::Signal>,
}

#[cfg(unix)]
impl TerminationSignals {
    fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        let interrupt = signal(SignalKind::interrupt())?;
        let terminate = match signal(SignalKind::terminate()) {
            Ok(terminate) => Some(terminate),
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable; only SIGINT stops the server");
                None
            }
        };

        Ok(Self {
            interrupt,
            terminate,
        })
    }

    async fn recv(&mut self) {
        match self.terminate.as_mut() {
            Some(terminate) => {
                tokio::select! {
                    _ = self.interrupt.recv() => {}
                    _ = terminate.recv() => {}
                }
            }
            None => {
                self.interrupt.recv().await;
            }
        }
    }
}

#[cfg(not(unix))]
struct TerminationSignals;

#[cfg(not(unix))]
impl TerminationSignals {
    fn install() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::watch;

    use super::{ShutdownSignals, flag_raised};

    fn signals() -> (watch::Sender<bool>, watch::Sender<bool>, ShutdownSignals) {
        let (graceful_tx, graceful) = watch::channel(false);
        let (forced_tx, forced) = watch::channel(false);
        (graceful_tx, forced_tx, ShutdownSignals { graceful, forced })
    }

    #[tokio::test]
    async fn flag_raised_resolves_after_send() {
        let (tx, rx) = watch::channel(false);
        let waiter = tokio::spawn(flag_raised(rx));

        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should resolve once the flag is raised")
            .unwrap();
    }

    #[tokio::test]
    async fn flag_raised_stays_pending_when_sender_drops() {
        let (tx, rx) = watch::channel(false);
        drop(tx);

        let result = tokio::time::timeout(Duration::from_millis(50), flag_raised(rx)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn forced_flag_is_independent_of_graceful() {
        let (graceful_tx, forced_tx, signals) = signals();

        graceful_tx.send(true).unwrap();
        let forced = tokio::time::timeout(Duration::from_millis(50), signals.forced()).await;
        assert!(forced.is_err());

        forced_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), signals.forced())
            .await
            .expect("forced flag should resolve once raised");
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_waits_for_graceful_flag_then_grace_period() {
        let (graceful_tx, _forced_tx, signals) = signals();
        let deadline =
            tokio::spawn(async move { signals.deadline(Duration::from_secs(5)).await });

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!deadline.is_finished());

        graceful_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(6), deadline)
            .await
            .expect("deadline should elapse after the grace period")
            .unwrap();
    }
}
