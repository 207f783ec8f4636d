//! claw-client: Session store and gateway connection manager
//!
//! The connection/session layer of clawlink: a dependency-injected
//! [`SessionStore`], the [`ConnectionManager`] state machine, the
//! transport and timer capabilities it runs on, and the deterministic
//! fallback simulation used when no real gateway is reachable.

pub mod event;
pub mod manager;
pub mod store;
pub mod text;
pub mod timer;
pub mod transport;

pub use event::ClientEvent;
pub use manager::{ConnectionManager, HEARTBEAT_INTERVAL};
pub use store::{SessionStore, StoreHandle, ViewId, MAX_LOG_ENTRIES};
pub use timer::{TimerDriver, TimerId, TimerKind, TokioTimers};
pub use transport::ws::WsConnector;
pub use transport::{ConnectRequest, Connector, Transport, TransportEvent, TransportEventKind};
