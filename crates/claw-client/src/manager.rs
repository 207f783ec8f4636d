//! Gateway connection manager
//!
//! One instance per process lifetime; owns at most one live transport
//! session and drives the connect/validate/monitor/fallback state
//! machine:
//!
//! - `disconnected → connecting` on a validated `connect()`
//! - `connecting → connected` when the handshake opens
//! - `connecting|connected → mock` on transport error or abnormal closure
//! - `connected → disconnected` on normal closure or `disconnect()`
//! - `mock → disconnected` on `disconnect()` only; a fresh `connect()`
//!   is required to retry the real transport
//!
//! All state transitions happen inside [`ConnectionManager::handle_event`]
//! or the three user-facing calls; each runs to completion before the
//! next, so partial updates are never observable. `connect()` and
//! `send_command()` return immediately — the outcome arrives as events.

use std::time::Duration;

use rand::Rng;

use claw_core::{AgentStatus, ConnectionMode, ConnectionStatus, Language, LogSender};
use claw_protocol::{connect_url, endpoint, sanitize, AuthField, Inbound, Outbound};

use crate::event::ClientEvent;
use crate::store::StoreHandle;
use crate::text;
use crate::timer::{TimerDriver, TimerId, TimerKind};
use crate::transport::{ConnectRequest, Connector, Transport, TransportEventKind};

/// Keep-alive cadence while connected. Intermediary proxies commonly cut
/// idle WebSockets after 30–60 s.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Simulated replies arrive after 500 ms plus up to this much jitter.
const MOCK_REPLY_BASE: Duration = Duration::from_millis(500);
const MOCK_REPLY_JITTER_MS: u64 = 1500;

/// WebSocket closure codes the diagnostics care about.
const CLOSE_NORMAL: u16 = 1000;
const CLOSE_ABNORMAL: u16 = 1006;
const CLOSE_POLICY_VIOLATION: u16 = 1008;

/// Stateful client driving the link to the OpenClaw gateway.
pub struct ConnectionManager<C: Connector, T: TimerDriver> {
    store: StoreHandle,
    connector: C,
    timers: T,
    transport: Option<Box<dyn Transport>>,
    /// Generation of the current transport; bumped on every teardown so
    /// events from dead transports are recognizably stale.
    session: u64,
    heartbeat: Option<TimerId>,
    /// Pending simulated reply: timer id plus the command it answers.
    mock_reply: Option<(TimerId, String)>,
    auth_fields: Vec<AuthField>,
}

impl<C: Connector, T: TimerDriver> ConnectionManager<C, T> {
    /// Create a manager over the given store and capabilities.
    pub fn new(store: StoreHandle, connector: C, timers: T) -> Self {
        Self {
            store,
            connector,
            timers,
            transport: None,
            session: 0,
            heartbeat: None,
            mock_reply: None,
            auth_fields: AuthField::ALL.to_vec(),
        }
    }

    /// Override which credential query parameters the handshake carries.
    ///
    /// The default is the full compatibility set; see [`AuthField`].
    pub fn with_auth_fields(mut self, fields: Vec<AuthField>) -> Self {
        self.auth_fields = fields;
        self
    }

    /// Generation of the current transport session.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Whether a transport handle is currently held.
    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    /// Attempt a gateway connection. Returns immediately.
    ///
    /// In remote mode an empty token is rejected with a log entry and no
    /// other state change. Once validation passes, any existing transport
    /// or pending attempt is torn down (last-call-wins; at most one
    /// session ever exists).
    pub fn connect(&mut self, token: &str) {
        let settings = self.store.settings();
        let lang = settings.language;

        // Validate before touching anything: a rejected call must leave
        // the current session, heartbeat, and any pending simulated
        // reply exactly as they were.
        if settings.mode == ConnectionMode::Remote && token.is_empty() {
            self.store
                .add_log(LogSender::System, text::token_required(lang));
            return;
        }

        self.teardown_transport();
        self.cancel_mock_reply();

        // Local mode ignores the configured address and targets the
        // well-known loopback gateway.
        let target = match settings.mode {
            ConnectionMode::Local => claw_core::DEFAULT_GATEWAY_URL.to_string(),
            ConnectionMode::Remote => sanitize(&settings.gateway_url),
        };
        // The logged target never includes the credential.
        let url = connect_url(&target, token, &self.auth_fields);

        self.store
            .set_connection_status(ConnectionStatus::Connecting);
        self.store
            .add_log(LogSender::System, text::connecting(lang, &target));

        let request = ConnectRequest {
            session: self.session,
            url,
        };
        match self.connector.open(request) {
            Ok(transport) => self.transport = Some(transport),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start gateway connection");
                self.enter_mock(None);
            }
        }
    }

    /// Tear everything down and return to `disconnected`. Idempotent.
    pub fn disconnect(&mut self) {
        self.teardown_transport();
        self.cancel_mock_reply();
        self.store
            .set_connection_status(ConnectionStatus::Disconnected);
    }

    /// Relay a user command, or simulate a response in mock mode.
    ///
    /// The `user` log entry is appended first in every case, even if
    /// dispatch subsequently fails.
    pub fn send_command(&mut self, command: &str) {
        let lang = self.store.settings().language;
        self.store.add_log(LogSender::User, command);

        match self.store.connection_status() {
            ConnectionStatus::Connected => {
                self.store.set_agent_status(AgentStatus::Processing);
                if let Some(transport) = self.transport.as_mut() {
                    if let Err(e) = transport.send(&Outbound::command(command)) {
                        tracing::warn!(error = %e, "Failed to send command");
                    }
                } else {
                    tracing::warn!("Connected status with no transport handle");
                }
            }
            ConnectionStatus::Mock => {
                self.store.set_agent_status(AgentStatus::Processing);
                // A new command replaces any not-yet-fired reply.
                self.cancel_mock_reply();
                let jitter = rand::thread_rng().gen_range(0..=MOCK_REPLY_JITTER_MS);
                let delay = MOCK_REPLY_BASE + Duration::from_millis(jitter);
                let id = self.timers.schedule(TimerKind::MockReply, delay);
                self.mock_reply = Some((id, command.to_string()));
            }
            _ => {
                self.store
                    .add_log(LogSender::System, text::not_connected(lang));
            }
        }
    }

    /// Process one event. The single state-transition function.
    pub fn handle_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Transport(transport_event) => {
                if transport_event.session != self.session {
                    tracing::debug!(
                        stale = transport_event.session,
                        current = self.session,
                        "Ignoring event from torn-down transport"
                    );
                    return;
                }
                match transport_event.kind {
                    TransportEventKind::Opened => self.on_opened(),
                    TransportEventKind::Message(payload) => self.on_message(&payload),
                    TransportEventKind::Error(detail) => self.on_error(&detail),
                    TransportEventKind::Closed { code, reason } => self.on_closed(code, &reason),
                }
            }
            ClientEvent::Timer { id, kind } => match kind {
                TimerKind::Heartbeat => self.on_heartbeat(id),
                TimerKind::MockReply => self.on_mock_reply(id),
            },
        }
    }

    fn on_opened(&mut self) {
        let lang = self.store.settings().language;
        self.store.set_connection_status(ConnectionStatus::Connected);
        self.store.add_log(LogSender::System, text::connected(lang));

        if let Some(transport) = self.transport.as_mut() {
            if let Err(e) = transport.send(&Outbound::connection_init()) {
                tracing::warn!(error = %e, "Failed to send session greeting");
            }
        }

        self.heartbeat = Some(self.timers.schedule(TimerKind::Heartbeat, HEARTBEAT_INTERVAL));
    }

    fn on_message(&mut self, payload: &str) {
        match Inbound::parse(payload) {
            Ok(Inbound::Log { message }) => {
                self.store.add_log(LogSender::Agent, message);
                self.store.set_agent_status(AgentStatus::Idle);
            }
            Ok(Inbound::Status { status }) => {
                self.store.set_agent_status(status);
            }
            Ok(Inbound::Unknown) => {
                tracing::debug!(payload, "Ignoring unrecognized gateway payload");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed gateway payload");
            }
        }
    }

    fn on_error(&mut self, detail: &str) {
        tracing::warn!(detail, "Transport error");
        if self.store.connection_status() != ConnectionStatus::Mock {
            self.enter_mock(None);
        }
    }

    fn on_closed(&mut self, code: u16, reason: &str) {
        let previous = self.store.connection_status();
        if previous == ConnectionStatus::Mock {
            return;
        }

        let lang = self.store.settings().language;

        if code == CLOSE_NORMAL {
            self.teardown_transport();
            self.store
                .set_connection_status(ConnectionStatus::Disconnected);
            self.store
                .add_log(LogSender::System, text::closed(lang, code, reason));
            // A normal closure before the session ever carried traffic
            // usually means the path is wrong, not the host.
            if previous == ConnectionStatus::Connecting {
                self.store
                    .add_log(LogSender::System, text::hint_wrong_path(lang));
            }
        } else {
            self.store
                .add_log(LogSender::System, text::closed(lang, code, reason));
            self.enter_mock(Some(code));
        }
    }

    fn on_heartbeat(&mut self, id: TimerId) {
        if self.heartbeat != Some(id) {
            return;
        }
        self.heartbeat = None;

        if self.store.connection_status() != ConnectionStatus::Connected {
            return;
        }
        if let Some(transport) = self.transport.as_mut() {
            if let Err(e) = transport.send(&Outbound::Ping) {
                // The socket task will surface the failure as an event.
                tracing::warn!(error = %e, "Failed to send heartbeat");
            }
        }
        self.heartbeat = Some(self.timers.schedule(TimerKind::Heartbeat, HEARTBEAT_INTERVAL));
    }

    fn on_mock_reply(&mut self, id: TimerId) {
        let command = match self.mock_reply.take() {
            Some((pending, command)) if pending == id => command,
            other => {
                self.mock_reply = other;
                return;
            }
        };

        let lang = self.store.settings().language;
        self.store.set_agent_status(AgentStatus::Idle);
        self.store
            .add_log(LogSender::Agent, text::mock_reply(lang, &command));
    }

    /// Switch to simulation mode with a localized announcement and,
    /// when a closure code identifies the failure, an actionable hint.
    fn enter_mock(&mut self, code: Option<u16>) {
        self.teardown_transport();
        self.store.set_connection_status(ConnectionStatus::Mock);

        let settings = self.store.settings();
        let lang = settings.language;
        self.store.add_log(LogSender::System, text::fallback(lang));

        match code {
            Some(CLOSE_ABNORMAL) => {
                let target = match settings.mode {
                    ConnectionMode::Local => claw_core::DEFAULT_GATEWAY_URL.to_string(),
                    ConnectionMode::Remote => sanitize(&settings.gateway_url),
                };
                self.store
                    .add_log(LogSender::System, text::hint_unreachable(lang, &target));
            }
            Some(CLOSE_POLICY_VIOLATION) => {
                self.store
                    .add_log(LogSender::System, text::hint_token_rejected(lang));
            }
            _ => {}
        }

        if settings.mode == ConnectionMode::Remote {
            let target = sanitize(&settings.gateway_url);
            let plaintext = target.starts_with("ws://") || target.starts_with("http://");
            if plaintext && !endpoint::is_loopback_host(&target) {
                self.store
                    .add_log(LogSender::System, text::hint_plaintext_remote(lang));
            }
        }
    }

    /// Drop the transport handle and stop the heartbeat. Bumps the
    /// session generation so in-flight events from the old transport are
    /// ignored. Never left running without a live transport.
    fn teardown_transport(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
        }
        if let Some(id) = self.heartbeat.take() {
            self.timers.cancel(id);
        }
        self.session += 1;
    }

    fn cancel_mock_reply(&mut self) {
        if let Some((id, _)) = self.mock_reply.take() {
            self.timers.cancel(id);
        }
    }
}
