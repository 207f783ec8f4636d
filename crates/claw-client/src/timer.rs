//! Cancellable-timer capability
//!
//! The heartbeat and the simulated-reply delay are the only time-driven
//! behavior in the client. Both go through [`TimerDriver`] so tests can
//! advance virtual time deterministically instead of sleeping.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::event::ClientEvent;

/// Identifies a scheduled timer. Stale ids are ignored on fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// What a timer firing means to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Send the periodic keep-alive
    Heartbeat,
    /// Deliver the pending simulated agent reply
    MockReply,
}

/// Schedules and cancels single-shot timers.
pub trait TimerDriver: Send {
    /// Schedule a single-shot timer; its firing is delivered as a
    /// [`ClientEvent::Timer`].
    fn schedule(&mut self, kind: TimerKind, after: Duration) -> TimerId;

    /// Cancel a pending timer. Cancelling an already-fired or unknown id
    /// is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Real driver: one tokio sleep task per pending timer, each guarded by a
/// CancellationToken so cancellation never races a late fire into the
/// event channel.
pub struct TokioTimers {
    events: mpsc::Sender<ClientEvent>,
    next_id: u64,
    pending: HashMap<TimerId, CancellationToken>,
}

impl TokioTimers {
    /// Create a driver delivering fires into the given event channel.
    pub fn new(events: mpsc::Sender<ClientEvent>) -> Self {
        Self {
            events,
            next_id: 0,
            pending: HashMap::new(),
        }
    }
}

impl TimerDriver for TokioTimers {
    fn schedule(&mut self, kind: TimerKind, after: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let token = CancellationToken::new();
        self.pending.insert(id, token.clone());

        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(after) => {
                    let _ = events.send(ClientEvent::Timer { id, kind }).await;
                }
            }
        });

        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(token) = self.pending.remove(&id) {
            token.cancel();
        }
    }
}
