//! Message types for the OpenClaw gateway protocol
//!
//! Messages are JSON text frames with a `type` discriminator. The gateway
//! is an external agent backend; this module only defines the shapes the
//! client emits and the subset of inbound shapes it understands.
//!
//! # Message Flow
//!
//! 1. Client opens the socket and sends `ConnectionInit` once
//! 2. Client sends `Ping` periodically while connected
//! 3. User commands go out as `Command`
//! 4. The gateway streams back `log` and `status` payloads; anything else
//!    is tolerated and ignored

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Client identifier reported in the session greeting.
pub const CLIENT_NAME: &str = "clawlink";

/// What the remote agent is currently doing.
///
/// Carried on the wire in `status` payloads as a lowercase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Agent is idle and ready for commands
    Idle,
    /// Agent is working on the last-issued command
    Processing,
    /// Agent reported a failure
    Error,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStatus::Idle => write!(f, "idle"),
            AgentStatus::Processing => write!(f, "processing"),
            AgentStatus::Error => write!(f, "error"),
        }
    }
}

/// Payload of the one-shot session greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitPayload {
    /// Client identifier, e.g. `clawlink/0.1.0`
    pub client: String,
}

/// Messages sent from the client to the gateway.
///
/// Two historical command shapes exist in the wild (`command` and
/// `message`); this client standardizes on `command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// A user command for the agent
    Command {
        /// The raw command text
        content: String,
    },

    /// Keep-alive sent while connected to defeat idle-timeout proxies
    Ping,

    /// Session greeting, sent exactly once after the socket opens
    ConnectionInit {
        /// Client identification payload
        payload: InitPayload,
    },
}

impl Outbound {
    /// Build a command message
    pub fn command(content: impl Into<String>) -> Self {
        Outbound::Command {
            content: content.into(),
        }
    }

    /// Build the session greeting with this crate's identity
    pub fn connection_init() -> Self {
        Outbound::ConnectionInit {
            payload: InitPayload {
                client: format!("{}/{}", CLIENT_NAME, env!("CARGO_PKG_VERSION")),
            },
        }
    }

    /// Serialize to a JSON text frame
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

/// Messages received from the gateway.
///
/// Unrecognized `type` values decode to [`Inbound::Unknown`] so that newer
/// gateways never break the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    /// A line of agent output
    Log {
        /// Human-readable message text
        message: String,
    },

    /// Agent status update
    Status {
        /// New agent status
        status: AgentStatus,
    },

    /// Any payload shape this client does not understand
    #[serde(other)]
    Unknown,
}

impl Inbound {
    /// Parse an inbound text frame.
    ///
    /// Fails only on malformed JSON or a missing `type` discriminator;
    /// unknown but well-formed payloads succeed as [`Inbound::Unknown`].
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_shape() {
        let json = Outbound::command("ping").to_json().unwrap();
        assert_eq!(json, r#"{"type":"command","content":"ping"}"#);
    }

    #[test]
    fn test_ping_wire_shape() {
        let json = Outbound::Ping.to_json().unwrap();
        assert_eq!(json, r#"{"type":"ping"}"#);
    }

    #[test]
    fn test_connection_init_carries_client_identity() {
        let json = Outbound::connection_init().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "connection_init");
        let client = value["payload"]["client"].as_str().unwrap();
        assert!(client.starts_with("clawlink/"));
    }

    #[test]
    fn test_parse_log_payload() {
        let inbound = Inbound::parse(r#"{"type":"log","message":"hello"}"#).unwrap();
        assert_eq!(
            inbound,
            Inbound::Log {
                message: "hello".to_string()
            }
        );
    }

    #[test]
    fn test_parse_status_payload() {
        let inbound = Inbound::parse(r#"{"type":"status","status":"processing"}"#).unwrap();
        assert_eq!(
            inbound,
            Inbound::Status {
                status: AgentStatus::Processing
            }
        );
    }

    #[test]
    fn test_unknown_type_is_tolerated() {
        let inbound = Inbound::parse(r#"{"type":"telemetry","cpu":42}"#).unwrap();
        assert_eq!(inbound, Inbound::Unknown);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(Inbound::parse("not json at all").is_err());
        assert!(Inbound::parse(r#"{"message":"no type field"}"#).is_err());
    }

    #[test]
    fn test_agent_status_display() {
        assert_eq!(AgentStatus::Idle.to_string(), "idle");
        assert_eq!(AgentStatus::Processing.to_string(), "processing");
    }
}
