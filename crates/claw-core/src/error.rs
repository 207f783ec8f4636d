//! Core error types for clawlink

use std::path::PathBuf;
use thiserror::Error;

/// Transport-related errors.
///
/// These never escape the connection manager as failures; they are
/// converted into log entries and a transition to mock or disconnected.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Handshake could not be started or completed
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    /// Outbound message could not be queued
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// The transport is gone
    #[error("Transport closed")]
    Closed,
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
