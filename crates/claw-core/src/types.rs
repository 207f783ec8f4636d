//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Lifecycle of the gateway link.
///
/// Exactly one value is active at any time. The connection manager only
/// moves between the first four; `Error` is kept for presentation layers
/// that want to flag a degraded UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No link and none being attempted
    Disconnected,
    /// Handshake in flight
    Connecting,
    /// Live gateway link
    Connected,
    /// Degraded local-simulation mode, no real gateway
    Mock,
    /// Reserved for presentation use
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Mock => write!(f, "mock"),
            ConnectionStatus::Error => write!(f, "error"),
        }
    }
}

/// Display language for user-facing log text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    En,
    /// Simplified Chinese
    Zh,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            other => Err(format!("unknown language '{other}' (expected 'en' or 'zh')")),
        }
    }
}

/// Who produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSender {
    /// Typed by the user
    User,
    /// Produced by the remote (or simulated) agent
    Agent,
    /// Diagnostic or status text from the client itself
    System,
}

impl fmt::Display for LogSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSender::User => write!(f, "user"),
            LogSender::Agent => write!(f, "agent"),
            LogSender::System => write!(f, "system"),
        }
    }
}

/// One entry in the bounded activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonically increasing identifier, unique per entry.
    ///
    /// Doubles as the cursor presentation layers use to tail the log
    /// across ring-buffer eviction.
    pub id: u64,
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
    /// Who produced the entry
    pub sender: LogSender,
    /// Entry text, already localized
    pub text: String,
}

/// Current Unix timestamp in milliseconds.
///
/// Returns 0 if the system clock is before the epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
