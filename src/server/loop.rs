// Server loop module
// Accept loop with graceful shutdown and connection draining

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How long in-flight requests get to finish after the accept loop stops
const DRAIN_GRACE: std::time::Duration = std::time::Duration::from_secs(5);
/// Poll interval while draining
const DRAIN_POLL: std::time::Duration = std::time::Duration::from_millis(50);

/// Run the accept loop until a shutdown notification arrives
///
/// On shutdown the listener is dropped first so no new connections land,
/// then in-flight connections get `DRAIN_GRACE` to finish. Accept errors
/// are transient (EMFILE and friends), so they are logged and the loop
/// keeps going.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    // Stop accepting before draining
    drop(listener);
    drain_connections(&active_connections).await;
    logger::log_shutdown_complete();
}

/// Wait for active connections to finish, up to the grace period
async fn drain_connections(active_connections: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + DRAIN_GRACE;

    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Drain grace period elapsed with {active} connections still active"
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_state() -> Arc<AppState> {
        let mut config = Config::load_from("nonexistent-config").expect("defaults load");
        config.logging.access_log = false;
        Arc::new(AppState::new(&config))
    }

    #[tokio::test]
    async fn test_server_loop_stops_on_shutdown() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let shutdown = Arc::new(Notify::new());

        // Notify stores a permit, so signalling before the loop first polls
        // notified() still stops it
        shutdown.notify_one();

        start_server_loop(
            listener,
            test_state(),
            Arc::new(AtomicUsize::new(0)),
            shutdown,
        )
        .await;
    }

    #[tokio::test]
    async fn test_drain_returns_when_no_connections() {
        let counter = AtomicUsize::new(0);
        drain_connections(&counter).await;
    }

    #[tokio::test]
    async fn test_drain_waits_for_active_connections() {
        let counter = Arc::new(AtomicUsize::new(1));
        let background = Arc::clone(&counter);
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            background.fetch_sub(1, Ordering::SeqCst);
        });
        drain_connections(&counter).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_request() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        let shutdown = Arc::new(Notify::new());

        let loop_shutdown = Arc::clone(&shutdown);
        let server = tokio::spawn(start_server_loop(
            listener,
            test_state(),
            Arc::new(AtomicUsize::new(0)),
            loop_shutdown,
        ));

        let mut client = tokio::net::TcpStream::connect(addr).await.expect("connect");
        client
            .write_all(b"GET /lambdaexp/5 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .expect("send request");

        let mut response = Vec::new();
        client
            .read_to_end(&mut response)
            .await
            .expect("read response");
        let text = String::from_utf8_lossy(&response);
        assert!(text.starts_with("HTTP/1.1 200"), "got: {text}");
        assert!(text.ends_with("8"), "got: {text}");

        shutdown.notify_one();
        server.await.expect("server loop join");
    }
}
