// Signal handling module
//
// Supported signals:
// - SIGTERM: graceful shutdown
// - SIGINT:  graceful shutdown (Ctrl+C)
// - SIGHUP:  reopen log files (logrotate convention)

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Signal handler state shared with the server loop
pub struct SignalHandler {
    /// Notified once on SIGTERM or SIGINT
    pub shutdown: Arc<Notify>,
    /// Set before `shutdown` is notified
    pub shutdown_requested: Arc<AtomicBool>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Request a graceful shutdown; the first signal wins
///
/// Repeats while the server is still draining are ignored.
fn request_shutdown(handler: &SignalHandler, signal: &str) {
    use std::sync::atomic::Ordering;

    if handler.shutdown_requested.swap(true, Ordering::SeqCst) {
        return;
    }
    logger::log_shutdown_started(signal);
    handler.shutdown.notify_one();
}

#[cfg(unix)]
fn register(kind: tokio::signal::unix::SignalKind) -> Option<tokio::signal::unix::Signal> {
    match tokio::signal::unix::signal(kind) {
        Ok(s) => Some(s),
        Err(e) => {
            logger::log_error(&format!("Failed to register handler for {kind:?}: {e}"));
            None
        }
    }
}

/// Start the signal listener task (Unix)
///
/// SIGTERM and SIGINT request a graceful shutdown; SIGHUP reopens the log
/// files so logrotate can move them without restarting the service. The
/// task keeps listening after a shutdown request, so log rotation still
/// works while connections drain.
#[cfg(unix)]
pub fn start_signal_handler(handler: &Arc<SignalHandler>) {
    use tokio::signal::unix::SignalKind;

    let handler = Arc::clone(handler);
    tokio::spawn(async move {
        let Some(mut sighup) = register(SignalKind::hangup()) else {
            return;
        };
        let Some(mut sigterm) = register(SignalKind::terminate()) else {
            return;
        };
        let Some(mut sigint) = register(SignalKind::interrupt()) else {
            return;
        };

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    logger::reopen_log_files();
                }

                _ = sigterm.recv() => {
                    request_shutdown(&handler, "SIGTERM");
                }

                _ = sigint.recv() => {
                    request_shutdown(&handler, "SIGINT");
                }
            }
        }
    });
}

/// Fallback for non-Unix targets, where only Ctrl+C is available
#[cfg(not(unix))]
pub fn start_signal_handler(handler: &Arc<SignalHandler>) {
    let handler = Arc::clone(handler);
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            request_shutdown(&handler, "Ctrl+C");
        }
    });
}
