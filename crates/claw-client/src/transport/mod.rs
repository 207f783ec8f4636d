//! Transport capability
//!
//! The connection manager never touches a socket directly. It talks to a
//! [`Connector`] that opens transports and to the [`Transport`] handles it
//! returns; everything the socket observes comes back as
//! [`TransportEvent`]s through the client event channel. This keeps the
//! state machine deterministic — tests inject a fake implementing the
//! same capability set.

pub mod ws;

use claw_core::TransportError;
use claw_protocol::Outbound;

/// Parameters for opening a transport session.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    /// Generation number of this session. Events from a torn-down
    /// transport carry a stale generation and are ignored.
    pub session: u64,
    /// Fully constructed connection URL, auth parameters included.
    pub url: String,
}

/// Something that happened on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    /// Generation of the transport that produced this event
    pub session: u64,
    /// What happened
    pub kind: TransportEventKind,
}

/// The four things a transport can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEventKind {
    /// Handshake completed; the link is live
    Opened,
    /// A text frame arrived
    Message(String),
    /// The transport failed unrecoverably
    Error(String),
    /// The link closed with a closure code and reason
    Closed {
        /// WebSocket closure code (1000 normal, 1006 abnormal, 1008
        /// policy violation, ...)
        code: u16,
        /// Human-readable reason, possibly empty
        reason: String,
    },
}

/// A live transport session handle.
///
/// At most one exists at a time; the connection manager owns it.
pub trait Transport: Send {
    /// Queue an outbound message. Never blocks.
    fn send(&mut self, frame: &Outbound) -> Result<(), TransportError>;

    /// Tear the session down. Idempotent; any in-flight handshake is
    /// abandoned.
    fn close(&mut self);
}

/// Opens transport sessions.
pub trait Connector: Send {
    /// Start a handshake and return the session handle immediately.
    ///
    /// Success here only means the attempt started; the outcome arrives
    /// later as an `Opened`, `Error`, or `Closed` event.
    fn open(&mut self, request: ConnectRequest) -> Result<Box<dyn Transport>, TransportError>;
}
