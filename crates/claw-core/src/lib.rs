//! claw-core: Core types and configuration for clawlink
//!
//! This crate provides the shared domain types (connection and agent
//! status, log entries, display language), the session settings model,
//! and the error taxonomy used by the client and CLI crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    default_config_path, load_settings, save_settings, ConnectionMode, SessionSettings,
    SettingsPatch, DEFAULT_GATEWAY_URL,
};
pub use error::{ConfigError, TransportError};
pub use types::{ConnectionStatus, Language, LogEntry, LogSender};

pub use claw_protocol::AgentStatus;
