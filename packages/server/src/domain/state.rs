//! Chat state aggregate.
//!
//! Combines the connection registry and the room store so that every inbound
//! event is applied as one consistent step. Each method returns what the
//! caller needs for fan-out; nothing here performs I/O.

use super::{
    entity::{DirectoryEntry, HistoryEntry, MessageBody, PresenceKey, Session},
    error::RepositoryError,
    registry::ConnectionRegistry,
    room::{Room, RoomStore},
    value_object::{ConnectionId, DisplayName, RoomName, StableClientId, Timestamp},
};

/// Result of `register_or_reconnect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub session: Session,
    /// `false` when an existing session was rebound (reconnect)
    pub is_new: bool,
    /// History of the session's room, oldest first
    pub history: Vec<HistoryEntry>,
    /// Other members of the session's room
    pub room_peers: Vec<ConnectionId>,
}

/// Result of `unregister`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub key: PresenceKey,
    pub session: Session,
    /// Another connection is still bound to the same session
    pub still_bound: bool,
}

/// A session that has been removed for good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedDeparture {
    pub session: Session,
    /// Members of the session's last room to notify
    pub notify: Vec<ConnectionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSwitch {
    pub session: Session,
    pub previous_room: RoomName,
    pub history: Vec<HistoryEntry>,
    /// Every connection of the session, all moved into the new room
    pub moved: Vec<ConnectionId>,
    /// Members of the new room outside the session
    pub room_peers: Vec<ConnectionId>,
}

impl RoomSwitch {
    pub fn changed(&self) -> bool {
        self.previous_room != self.session.room
    }
}

/// A message appended to a room's history and the connections to deliver it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedMessage {
    pub sender: Session,
    pub room: RoomName,
    pub recipients: Vec<ConnectionId>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    registry: ConnectionRegistry,
    rooms: RoomStore,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session, or rebind an existing one sharing `client_id`.
    pub fn register_or_reconnect(
        &mut self,
        connection_id: ConnectionId,
        name: DisplayName,
        client_id: Option<StableClientId>,
        now: Timestamp,
    ) -> Result<Registration, RepositoryError> {
        let key = PresenceKey::for_client(client_id, &connection_id);

        if let Some(bound) = self.registry.key_of(&connection_id)
            && bound != &key
        {
            return Err(RepositoryError::ConnectionAlreadyBound(
                connection_id.into_string(),
            ));
        }

        let is_new = match self.registry.session_mut(&key) {
            Some(session) => {
                session.rebind(connection_id.clone(), name);
                false
            }
            None => {
                self.registry.insert(Session::new(
                    key.clone(),
                    connection_id.clone(),
                    name,
                    now,
                ));
                true
            }
        };
        self.registry.bind(connection_id.clone(), key.clone());

        let session = self
            .registry
            .session(&key)
            .cloned()
            .ok_or_else(|| RepositoryError::SessionNotFound(connection_id.to_string()))?;
        self.rooms.join(connection_id.clone(), &session.room, now);

        Ok(Registration {
            history: self.rooms.history(&session.room),
            room_peers: self
                .rooms
                .broadcast_targets(&session.room, Some(&connection_id)),
            session,
            is_new,
        })
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> Option<Session> {
        self.registry.lookup(connection_id).cloned()
    }

    /// Drop a connection's binding and room membership. Presence is not decided here.
    pub fn unregister(&mut self, connection_id: &ConnectionId) -> Option<Departure> {
        let key = self.registry.unbind(connection_id)?;
        self.rooms.leave_all(connection_id);
        let remaining = self.registry.bound_connections(&key);
        let still_bound = !remaining.is_empty();
        let session = self.registry.session_mut(&key)?;
        if session.connection_id == *connection_id
            && let Some(next) = remaining.into_iter().min()
        {
            session.connection_id = next;
        }
        Some(Departure {
            session: session.clone(),
            still_bound,
            key,
        })
    }

    /// Move an unbound session into its grace period, returning the new epoch.
    pub fn enter_grace_period(&mut self, key: &PresenceKey) -> Option<u64> {
        if self.registry.is_bound(key) {
            return None;
        }
        self.registry
            .session_mut(key)
            .map(|session| session.enter_grace_period())
    }

    /// Remove a session for good if nothing has rebound it.
    ///
    /// With `expected_epoch`, the session must still be waiting on that exact
    /// grace period; a reconnect (or a newer disconnect) makes this a no-op.
    pub fn finalize_departure(
        &mut self,
        key: &PresenceKey,
        expected_epoch: Option<u64>,
    ) -> Option<FinalizedDeparture> {
        if self.registry.is_bound(key) {
            return None;
        }
        let session = self.registry.session(key)?;
        if let Some(epoch) = expected_epoch
            && !session.is_pending_since(epoch)
        {
            return None;
        }
        let session = self.registry.remove(key)?;
        Some(FinalizedDeparture {
            notify: self.rooms.broadcast_targets(&session.room, None),
            session,
        })
    }

    pub fn switch_room(
        &mut self,
        connection_id: &ConnectionId,
        room: RoomName,
        now: Timestamp,
    ) -> Result<RoomSwitch, RepositoryError> {
        let session = self
            .registry
            .lookup_mut(connection_id)
            .ok_or_else(|| RepositoryError::SessionNotFound(connection_id.to_string()))?;
        let previous_room = std::mem::replace(&mut session.room, room.clone());
        let session = session.clone();

        // The room belongs to the session, so every tab follows.
        let mut moved = self.registry.bound_connections(&session.key);
        moved.sort();
        for bound in &moved {
            self.rooms.leave_current(bound, &previous_room);
            self.rooms.join(bound.clone(), &room, now);
        }
        let room_peers = self
            .rooms
            .broadcast_targets(&room, None)
            .into_iter()
            .filter(|member| !moved.contains(member))
            .collect();

        Ok(RoomSwitch {
            history: self.rooms.history(&room),
            moved,
            room_peers,
            previous_room,
            session,
        })
    }

    /// Append a message to the target room's history and compute its recipients.
    pub fn record_message(
        &mut self,
        connection_id: &ConnectionId,
        room: Option<RoomName>,
        body: MessageBody,
        now: Timestamp,
    ) -> Result<RoutedMessage, RepositoryError> {
        let sender = self
            .registry
            .lookup(connection_id)
            .cloned()
            .ok_or_else(|| RepositoryError::SessionNotFound(connection_id.to_string()))?;
        let room = room.unwrap_or_else(|| sender.room.clone());

        let entry = HistoryEntry::new(sender.display_name.clone(), body, now);
        if let Some(evicted) = self.rooms.append_history(&room, entry, now) {
            tracing::debug!(
                "Evicted history entry from '{}' in room '{}'",
                evicted.sender_name,
                room
            );
        }

        Ok(RoutedMessage {
            recipients: self.rooms.broadcast_targets(&room, Some(connection_id)),
            sender,
            room,
        })
    }

    /// The sender's session and the other members of its current room.
    pub fn room_peers(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<(Session, Vec<ConnectionId>), RepositoryError> {
        let session = self
            .registry
            .lookup(connection_id)
            .cloned()
            .ok_or_else(|| RepositoryError::SessionNotFound(connection_id.to_string()))?;
        let peers = self
            .rooms
            .broadcast_targets(&session.room, Some(connection_id));
        Ok((session, peers))
    }

    /// One entry per session, sorted by name then id.
    pub fn directory(&self) -> Vec<DirectoryEntry> {
        let mut entries: Vec<DirectoryEntry> = self
            .registry
            .sessions()
            .map(|session| DirectoryEntry {
                id: session.connection_id.clone(),
                name: session.display_name.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        entries
    }

    pub fn room(&self, name: &RoomName) -> Option<Room> {
        self.rooms.get(name).cloned()
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.rooms.rooms().into_iter().cloned().collect()
    }
}
