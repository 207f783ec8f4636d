//! The client event enum
//!
//! Every callback-shaped input — socket open/message/error/close, timer
//! fires — is reified as a [`ClientEvent`] and processed by a single
//! state-transition function on the connection manager. Handlers run to
//! completion one at a time, so the state machine never observes
//! interleaved partial updates.

use crate::timer::{TimerId, TimerKind};
use crate::transport::TransportEvent;

/// One discrete input to the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Something happened on the wire
    Transport(TransportEvent),
    /// A scheduled timer fired
    Timer {
        /// Which timer
        id: TimerId,
        /// What it was for
        kind: TimerKind,
    },
}
