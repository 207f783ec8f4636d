//! claw-protocol: Wire protocol for the OpenClaw gateway link
//!
//! This crate defines the JSON message shapes exchanged between the
//! clawlink client and an OpenClaw agent gateway, plus the endpoint
//! helpers used to turn user-typed addresses into well-formed,
//! authenticated connection URLs.

pub mod endpoint;
pub mod error;
pub mod message;

pub use endpoint::{connect_url, is_loopback_host, sanitize, AuthField};
pub use error::ProtocolError;
pub use message::{AgentStatus, Inbound, InitPayload, Outbound, CLIENT_NAME};
