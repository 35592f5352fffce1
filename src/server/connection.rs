// Connection handling module
// Accepts a single TCP connection and serves HTTP/1.1 on it

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection, enforcing the connection limit before serving
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment first, then check: two racing accepts cannot both claim
    // the last free slot
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
    );
}

/// Serve HTTP/1.1 on an accepted stream in a spawned task
///
/// Wraps the stream in `TokioIo`, applies keep-alive and the configured
/// read/write timeout, and decrements the counter when the connection ends.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let keep_alive_timeout = state.config.performance.keep_alive_timeout;
        let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
            state.config.performance.read_timeout,
            state.config.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { handler::handle_request(req, peer_addr, state).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    async fn connected_pair() -> (tokio::net::TcpStream, tokio::net::TcpStream, std::net::SocketAddr)
    {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        let client = tokio::net::TcpStream::connect(addr).await.expect("connect");
        let (server, peer) = listener.accept().await.expect("accept");
        (server, client, peer)
    }

    #[tokio::test]
    async fn test_accept_connection_over_limit_rejected() {
        let mut config = Config::load_from("nonexistent-config").expect("defaults load");
        config.performance.max_connections = Some(1);
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(&config));
        // One connection already active: the next accept must be refused
        let counter = Arc::new(AtomicUsize::new(1));

        let (server, _client, peer) = connected_pair().await;
        accept_connection(server, peer, &state, &counter);

        // Rejected accepts roll the counter back
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_accept_connection_within_limit_counts() {
        let mut config = Config::load_from("nonexistent-config").expect("defaults load");
        config.performance.max_connections = Some(8);
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(&config));
        let counter = Arc::new(AtomicUsize::new(0));

        let (server, client, peer) = connected_pair().await;
        accept_connection(server, peer, &state, &counter);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        drop(client);
    }

    #[tokio::test]
    async fn test_accept_connection_unlimited_by_default() {
        let mut config = Config::load_from("nonexistent-config").expect("defaults load");
        config.logging.access_log = false;
        assert_eq!(config.performance.max_connections, None);
        let state = Arc::new(AppState::new(&config));
        let counter = Arc::new(AtomicUsize::new(10_000));

        let (server, client, peer) = connected_pair().await;
        accept_connection(server, peer, &state, &counter);
        assert_eq!(counter.load(Ordering::SeqCst), 10_001);

        drop(client);
    }
}
