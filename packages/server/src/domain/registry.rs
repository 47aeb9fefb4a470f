//! Connection registry: live connections to logical sessions.

use std::collections::HashMap;

use super::entity::{PresenceKey, Session};
use super::value_object::ConnectionId;

/// Owns every session and the connection bindings pointing at them.
///
/// A session is reachable from any number of bound connections while a
/// client reconnects; it stays in the registry after its last binding is
/// gone until presence finalizes the departure.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    sessions: HashMap<PresenceKey, Session>,
    bindings: HashMap<ConnectionId, PresenceKey>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> Option<&Session> {
        self.bindings
            .get(connection_id)
            .and_then(|key| self.sessions.get(key))
    }

    pub fn lookup_mut(&mut self, connection_id: &ConnectionId) -> Option<&mut Session> {
        let key = self.bindings.get(connection_id)?;
        self.sessions.get_mut(key)
    }

    pub fn key_of(&self, connection_id: &ConnectionId) -> Option<&PresenceKey> {
        self.bindings.get(connection_id)
    }

    pub fn session(&self, key: &PresenceKey) -> Option<&Session> {
        self.sessions.get(key)
    }

    pub fn session_mut(&mut self, key: &PresenceKey) -> Option<&mut Session> {
        self.sessions.get_mut(key)
    }

    pub fn insert(&mut self, session: Session) {
        self.bindings
            .insert(session.connection_id.clone(), session.key.clone());
        self.sessions.insert(session.key.clone(), session);
    }

    pub fn bind(&mut self, connection_id: ConnectionId, key: PresenceKey) {
        self.bindings.insert(connection_id, key);
    }

    /// Drop the binding of a connection. The session itself is kept.
    pub fn unbind(&mut self, connection_id: &ConnectionId) -> Option<PresenceKey> {
        self.bindings.remove(connection_id)
    }

    pub fn is_bound(&self, key: &PresenceKey) -> bool {
        self.bindings.values().any(|bound| bound == key)
    }

    pub fn bound_connections(&self, key: &PresenceKey) -> Vec<ConnectionId> {
        self.bindings
            .iter()
            .filter(|(_, bound)| *bound == key)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn remove(&mut self, key: &PresenceKey) -> Option<Session> {
        self.bindings.retain(|_, bound| bound != key);
        self.sessions.remove(key)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{DisplayName, StableClientId, Timestamp};

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn stable(id: &str) -> PresenceKey {
        PresenceKey::Stable(StableClientId::new(id.to_string()).unwrap())
    }

    fn session(key: PresenceKey, connection: &str) -> Session {
        Session::new(
            key,
            conn(connection),
            DisplayName::new("Bob".to_string()).unwrap(),
            Timestamp::new(0),
        )
    }

    #[test]
    fn test_lookup_by_connection() {
        // テスト項目: 接続 ID からセッションを引ける
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(session(stable("device-b"), "c1"));

        // when (操作):
        let found = registry.lookup(&conn("c1"));

        // then (期待する結果):
        assert_eq!(found.unwrap().display_name.as_str(), "Bob");
        assert!(registry.lookup(&conn("c2")).is_none());
    }

    #[test]
    fn test_unbind_keeps_session() {
        // テスト項目: unbind は接続の紐付けのみを削除し、セッションは残す
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(session(stable("device-b"), "c1"));

        // when (操作):
        let key = registry.unbind(&conn("c1"));

        // then (期待する結果):
        assert_eq!(key, Some(stable("device-b")));
        assert!(registry.lookup(&conn("c1")).is_none());
        assert!(registry.session(&stable("device-b")).is_some());
        assert!(!registry.is_bound(&stable("device-b")));
    }

    #[test]
    fn test_two_connections_share_one_session() {
        // テスト項目: 再接続中は複数の接続 ID が同じセッションを参照できる
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(session(stable("device-b"), "c1"));

        // when (操作):
        registry.bind(conn("c2"), stable("device-b"));
        registry.unbind(&conn("c1"));

        // then (期待する結果):
        assert_eq!(registry.len(), 1);
        assert!(registry.is_bound(&stable("device-b")));
        assert_eq!(registry.bound_connections(&stable("device-b")), vec![conn("c2")]);
    }

    #[test]
    fn test_remove_drops_all_bindings() {
        // テスト項目: セッション削除時に紐付いた全ての接続も削除される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new();
        registry.insert(session(stable("device-b"), "c1"));
        registry.bind(conn("c2"), stable("device-b"));

        // when (操作):
        let removed = registry.remove(&stable("device-b"));

        // then (期待する結果):
        assert!(removed.is_some());
        assert!(registry.is_empty());
        assert!(registry.lookup(&conn("c2")).is_none());
    }
}
