//! Session state store
//!
//! Process-wide state: connection status, agent status, settings, and the
//! bounded activity log. The store owns no behavior — it never validates
//! and never rejects a write; the connection manager is responsible for
//! gating calls. It is explicitly constructed and passed by handle to the
//! manager and the presentation layer, so the core stays testable in
//! isolation.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use claw_core::{
    AgentStatus, ConnectionStatus, LogEntry, LogSender, SessionSettings, SettingsPatch,
};

/// The activity log keeps only this many most-recent entries.
pub const MAX_LOG_ENTRIES: usize = 50;

/// Themed full-screen views the presentation layer can switch between.
///
/// Presentation-only; the connection manager never reads this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    /// The isometric world
    World,
    /// Capability tree
    Skills,
    /// Memory timeline
    Memory,
    /// Task board
    Tasks,
    /// Persona editor
    Soul,
    /// Raw console
    Console,
    /// Connection settings
    Settings,
}

/// All session state behind a single struct.
#[derive(Debug)]
pub struct SessionStore {
    connection_status: ConnectionStatus,
    agent_status: AgentStatus,
    logs: VecDeque<LogEntry>,
    settings: SessionSettings,
    zoom_level: f32,
    current_view: ViewId,
    next_log_id: u64,
}

impl SessionStore {
    /// Create a store with the given settings and empty state.
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            connection_status: ConnectionStatus::Disconnected,
            agent_status: AgentStatus::Idle,
            logs: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            settings,
            zoom_level: 1.0,
            current_view: ViewId::World,
            next_log_id: 0,
        }
    }

    /// Replace the connection status.
    pub fn set_connection_status(&mut self, status: ConnectionStatus) {
        self.connection_status = status;
    }

    /// Replace the agent status.
    pub fn set_agent_status(&mut self, status: AgentStatus) {
        self.agent_status = status;
    }

    /// Append a log entry, evicting the oldest beyond [`MAX_LOG_ENTRIES`].
    ///
    /// Always appends, never mutates existing entries. Returns the new
    /// entry's id.
    pub fn add_log(&mut self, sender: LogSender, text: impl Into<String>) -> u64 {
        let id = self.next_log_id;
        self.next_log_id += 1;
        self.logs.push_back(LogEntry {
            id,
            timestamp: claw_core::types::now_millis(),
            sender,
            text: text.into(),
        });
        while self.logs.len() > MAX_LOG_ENTRIES {
            self.logs.pop_front();
        }
        id
    }

    /// Shallow-merge a settings patch; untouched fields keep their values.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings.apply(patch);
    }

    /// Set the presentation zoom, clamped to 0.5–2.0.
    pub fn set_zoom_level(&mut self, zoom: f32) {
        self.zoom_level = zoom.clamp(0.5, 2.0);
    }

    /// Switch the active presentation view.
    pub fn set_current_view(&mut self, view: ViewId) {
        self.current_view = view;
    }

    /// Current connection status.
    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection_status
    }

    /// Current agent status.
    pub fn agent_status(&self) -> AgentStatus {
        self.agent_status
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> SessionSettings {
        self.settings.clone()
    }

    /// Snapshot of the retained log, oldest first.
    pub fn logs(&self) -> Vec<LogEntry> {
        self.logs.iter().cloned().collect()
    }

    /// Entries with an id strictly greater than `after`, oldest first.
    ///
    /// Ids are monotonic across eviction, so presentation layers can tail
    /// the log with their last-seen id as the cursor.
    pub fn logs_after(&self, after: u64) -> Vec<LogEntry> {
        self.logs
            .iter()
            .filter(|entry| entry.id > after)
            .cloned()
            .collect()
    }

    /// Current zoom level.
    pub fn zoom_level(&self) -> f32 {
        self.zoom_level
    }

    /// Active presentation view.
    pub fn current_view(&self) -> ViewId {
        self.current_view
    }
}

/// Cloneable handle to a shared [`SessionStore`].
///
/// One store is created at application start; the handle is passed to the
/// connection manager and to whatever renders the state.
#[derive(Debug, Clone)]
pub struct StoreHandle(Arc<Mutex<SessionStore>>);

impl StoreHandle {
    /// Wrap a store for shared access.
    pub fn new(store: SessionStore) -> Self {
        Self(Arc::new(Mutex::new(store)))
    }

    fn with<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> R {
        // Lock poisoning is survivable here: the store holds plain data.
        let mut guard = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// See [`SessionStore::set_connection_status`].
    pub fn set_connection_status(&self, status: ConnectionStatus) {
        self.with(|store| store.set_connection_status(status));
    }

    /// See [`SessionStore::set_agent_status`].
    pub fn set_agent_status(&self, status: AgentStatus) {
        self.with(|store| store.set_agent_status(status));
    }

    /// See [`SessionStore::add_log`].
    pub fn add_log(&self, sender: LogSender, text: impl Into<String>) -> u64 {
        self.with(|store| store.add_log(sender, text))
    }

    /// See [`SessionStore::update_settings`].
    pub fn update_settings(&self, patch: SettingsPatch) {
        self.with(|store| store.update_settings(patch));
    }

    /// See [`SessionStore::set_zoom_level`].
    pub fn set_zoom_level(&self, zoom: f32) {
        self.with(|store| store.set_zoom_level(zoom));
    }

    /// See [`SessionStore::set_current_view`].
    pub fn set_current_view(&self, view: ViewId) {
        self.with(|store| store.set_current_view(view));
    }

    /// See [`SessionStore::connection_status`].
    pub fn connection_status(&self) -> ConnectionStatus {
        self.with(|store| store.connection_status())
    }

    /// See [`SessionStore::agent_status`].
    pub fn agent_status(&self) -> AgentStatus {
        self.with(|store| store.agent_status())
    }

    /// See [`SessionStore::settings`].
    pub fn settings(&self) -> SessionSettings {
        self.with(|store| store.settings())
    }

    /// See [`SessionStore::logs`].
    pub fn logs(&self) -> Vec<LogEntry> {
        self.with(|store| store.logs())
    }

    /// See [`SessionStore::logs_after`].
    pub fn logs_after(&self, after: u64) -> Vec<LogEntry> {
        self.with(|store| store.logs_after(after))
    }
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new(SessionStore::new(SessionSettings::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claw_core::ConnectionMode;

    #[test]
    fn test_log_is_bounded_to_most_recent_entries() {
        let mut store = SessionStore::new(SessionSettings::default());
        for i in 0..120 {
            store.add_log(LogSender::System, format!("entry {i}"));
        }

        let logs = store.logs();
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        // The most recent 50, in call order.
        assert_eq!(logs.first().unwrap().text, "entry 70");
        assert_eq!(logs.last().unwrap().text, "entry 119");
    }

    #[test]
    fn test_log_under_capacity_keeps_everything() {
        let mut store = SessionStore::new(SessionSettings::default());
        for i in 0..7 {
            store.add_log(LogSender::User, format!("cmd {i}"));
        }
        assert_eq!(store.logs().len(), 7);
    }

    #[test]
    fn test_log_ids_are_unique_and_monotonic() {
        let mut store = SessionStore::new(SessionSettings::default());
        let a = store.add_log(LogSender::System, "a");
        let b = store.add_log(LogSender::System, "b");
        assert!(b > a);
    }

    #[test]
    fn test_logs_after_tails_across_eviction() {
        let mut store = SessionStore::new(SessionSettings::default());
        for i in 0..60 {
            store.add_log(LogSender::System, format!("entry {i}"));
        }
        let cursor = store.logs().last().unwrap().id;
        store.add_log(LogSender::Agent, "fresh");

        let tail = store.logs_after(cursor);
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].text, "fresh");
    }

    #[test]
    fn test_update_settings_leaves_other_state_untouched() {
        let mut store = SessionStore::new(SessionSettings::default());
        store.add_log(LogSender::System, "before");
        store.set_connection_status(ConnectionStatus::Mock);

        store.update_settings(SettingsPatch {
            mode: Some(ConnectionMode::Remote),
            ..Default::default()
        });

        assert_eq!(store.settings().mode, ConnectionMode::Remote);
        assert_eq!(store.connection_status(), ConnectionStatus::Mock);
        assert_eq!(store.logs().len(), 1);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut store = SessionStore::new(SessionSettings::default());
        store.set_zoom_level(9.0);
        assert_eq!(store.zoom_level(), 2.0);
        store.set_zoom_level(0.1);
        assert_eq!(store.zoom_level(), 0.5);
    }
}
