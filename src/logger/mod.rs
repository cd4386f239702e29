//! Logger module
//!
//! Provides logging utilities for the tracker including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Leveled error/warning/info/debug logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use writer::Level;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        &config.logging.level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info("======================================");
    log_info("Exercise tracker started");
    log_info(&format!("Listening on: http://{addr}"));
    log_info(&format!("Log level: {}", config.logging.level));
    match config.server.workers {
        Some(workers) => log_info(&format!("Worker threads: {workers}")),
        None => log_info("Worker threads: default (CPU cores)"),
    }
    match config.store.path {
        Some(ref path) => log_info(&format!("Document store: {path}")),
        None => log_info("Document store: in-memory (records are lost on exit)"),
    }
    if let Some(ref path) = config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    log_info("======================================");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    writer::write(Level::Error, message);
}

pub fn log_warning(message: &str) {
    writer::write(Level::Warn, message);
}

pub fn log_info(message: &str) {
    writer::write(Level::Info, message);
}

pub fn log_debug(message: &str) {
    writer::write(Level::Debug, message);
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    writer::write_access(&entry.format(format));
}
