//! Logger module
//!
//! Provides logging utilities for the HTTP service including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging with SIGHUP reopen support

mod format;
mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Re-open configured log files (SIGHUP rotation)
pub fn reopen_log_files() {
    match writer::reopen() {
        Ok(()) => writer::info("[SIGNAL] Log files reopened"),
        Err(e) => writer::error(&format!("[ERROR] Failed to reopen log files: {e}")),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    writer::info("======================================");
    writer::info("lambdaexp server started successfully");
    writer::info(&format!("Listening on: http://{addr}"));
    writer::info(&format!(
        "Endpoint: GET http://{addr}/lambdaexp/{{number}}"
    ));
    if config.health.enabled {
        writer::info(&format!(
            "Health probes: {} {}",
            config.health.liveness_path, config.health.readiness_path
        ));
    }
    writer::info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        writer::info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        writer::info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        writer::info(&format!("Error log: {path}"));
    }
    writer::info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    writer::info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    writer::error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    writer::error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    writer::error(&format!("[WARN] {message}"));
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        writer::info(&format!("[Headers] Count: {count}"));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    writer::access(&entry.render(format));
}

pub fn log_shutdown_started(signal: &str) {
    writer::info(&format!(
        "\n[Shutdown] {signal} received, stopping accept loop"
    ));
}

pub fn log_shutdown_complete() {
    writer::info("[Shutdown] All connections drained, bye");
}
