// Server module entry point
// Listener construction, accept loop, connection serving, signal handling

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file maps to server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export common entry points
pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};
