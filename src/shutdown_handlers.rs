use async_trait::async_trait;
use tracing::{info, warn};

use crate::shutdown::{ShutdownReceiver, ShutdownSender, ShutdownSignal};

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Where operating-system stop requests come from.
#[async_trait]
trait SignalSource: Send {
    async fn next_signal(&mut self) -> ShutdownSignal;
}

fn announce(shutdown_tx: &ShutdownSender, received: ShutdownSignal) {
    info!("Received {}. Shutting down gracefully...", received);
    drop(shutdown_tx.send(received));
}

/// First signal broadcasts shutdown. Later signals are acknowledged but do
/// not force an exit; the in-flight batch still drains. Returns when some
/// other party broadcasts shutdown before any signal arrives.
async fn forward_signals<S>(
    shutdown_tx: ShutdownSender,
    mut shutdown_rx: ShutdownReceiver,
    mut source: S,
) where
    S: SignalSource,
{
    let mut stopping = false;
    loop {
        let received = tokio::select! {
            _ = shutdown_rx.recv(), if !stopping => return,
            received = source.next_signal() => received,
        };
        if stopping {
            info!(
                "Received {} again. Waiting for in-flight requests to finish...",
                received
            );
        } else {
            announce(&shutdown_tx, received);
            stopping = true;
        }
    }
}

#[cfg(unix)]
fn register(kind: SignalKind, name: &str) -> Option<Signal> {
    match signal(kind) {
        Ok(signal) => Some(signal),
        Err(err) => {
            warn!("Failed to register {} handler: {}", name, err);
            None
        }
    }
}

/// Resolves on the next delivery. A stream that failed to register or has
/// ended never resolves again.
#[cfg(unix)]
async fn recv_or_pending(slot: &mut Option<Signal>) {
    if let Some(signal) = slot.as_mut()
        && signal.recv().await.is_some()
    {
        return;
    }
    *slot = None;
    std::future::pending::<()>().await;
}

#[cfg(unix)]
struct UnixSignals {
    interrupt: Option<Signal>,
    terminate: Option<Signal>,
}

#[cfg(unix)]
#[async_trait]
impl SignalSource for UnixSignals {
    async fn next_signal(&mut self) -> ShutdownSignal {
        tokio::select! {
            () = recv_or_pending(&mut self.interrupt) => ShutdownSignal::Interrupt,
            () = recv_or_pending(&mut self.terminate) => ShutdownSignal::Terminate,
        }
    }
}

#[cfg(not(unix))]
struct CtrlC {
    failed: bool,
}

#[cfg(not(unix))]
#[async_trait]
impl SignalSource for CtrlC {
    async fn next_signal(&mut self) -> ShutdownSignal {
        if !self.failed {
            match tokio::signal::ctrl_c().await {
                Ok(()) => return ShutdownSignal::Interrupt,
                Err(err) => {
                    warn!("Failed to listen for Ctrl+C: {}", err);
                    self.failed = true;
                }
            }
        }
        std::future::pending::<ShutdownSignal>().await
    }
}

/// Turns SIGINT/SIGTERM into a shutdown broadcast. Handlers are registered
/// before this returns, so a signal that arrives right after startup is not
/// lost. The task keeps running after the first signal until aborted. Must
/// be called from within a tokio runtime.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> tokio::task::JoinHandle<()> {
    let shutdown_rx = shutdown_tx.subscribe();

    #[cfg(unix)]
    let source = UnixSignals {
        interrupt: register(SignalKind::interrupt(), "SIGINT"),
        terminate: register(SignalKind::terminate(), "SIGTERM"),
    };
    #[cfg(not(unix))]
    let source = CtrlC { failed: false };

    tokio::spawn(forward_signals(shutdown_tx.clone(), shutdown_rx, source))
}
