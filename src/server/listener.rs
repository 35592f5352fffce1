// Listener module
// TCP listener construction with socket options applied before bind

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Listen backlog, matching the nginx default
const LISTEN_BACKLOG: i32 = 128;

/// Create a `TcpListener` with `SO_REUSEPORT` and `SO_REUSEADDR` enabled.
///
/// `SO_REUSEPORT` lets several service processes share one port for load
/// spreading; `SO_REUSEADDR` allows rebinding while old sockets sit in
/// TIME_WAIT, so quick restarts do not fail spuriously.
pub fn create_reusable_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;
    // Tokio needs the socket in non-blocking mode
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listener_binds_ephemeral_port() {
        let addr = "127.0.0.1:0".parse().expect("addr");
        let listener = create_reusable_listener(addr).expect("bind");
        assert_ne!(listener.local_addr().expect("local addr").port(), 0);
    }

    #[tokio::test]
    async fn test_two_listeners_share_port() {
        // SO_REUSEPORT permits a second bind on the same address
        let addr = "127.0.0.1:0".parse().expect("addr");
        let first = create_reusable_listener(addr).expect("first bind");
        let bound = first.local_addr().expect("local addr");
        let second = create_reusable_listener(bound).expect("second bind");
        assert_eq!(
            second.local_addr().expect("local addr").port(),
            bound.port()
        );
    }
}
