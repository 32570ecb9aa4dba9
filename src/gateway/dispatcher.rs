use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::events::{Audience, Broadcast, ChangeEvent};
use super::session::GatewaySession;

/// Manages all active gateway sessions and broadcasts events.
pub struct Dispatcher {
    sessions: Arc<DashMap<String, GatewaySession>>,
    tx: broadcast::Sender<Broadcast>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1024);
        Self {
            sessions: Arc::new(DashMap::new()),
            tx,
        }
    }

    pub fn register_session(&self, session: GatewaySession) {
        self.sessions.insert(session.session_id.clone(), session);
    }

    pub fn remove_session(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Distinct members with at least one live session, sorted.
    pub fn online_member_ids(&self) -> Vec<String> {
        let ids: BTreeSet<String> = self
            .sessions
            .iter()
            .map(|entry| entry.value().member_id.clone())
            .collect();
        ids.into_iter().collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Broadcast> {
        self.tx.subscribe()
    }

    /// Fans an event out to every connected session. Sessions filter by audience
    /// and topic on their side. Having no listeners is not an error.
    pub fn publish(&self, audience: Audience, event: ChangeEvent) {
        tracing::debug!(event = event.event_type(), "publishing gateway event");
        let _ = self.tx.send(Broadcast { audience, event });
    }
}
