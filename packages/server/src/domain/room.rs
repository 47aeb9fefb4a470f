//! Room membership and bounded history.

use std::collections::{HashMap, HashSet, VecDeque};

use super::{
    entity::HistoryEntry,
    value_object::{ConnectionId, RoomName, Timestamp},
};

/// Number of history entries a room keeps.
pub const HISTORY_CAPACITY: usize = 20;

/// Bounded FIFO of recent messages. The oldest entry is evicted first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, returning the evicted one if the buffer was full.
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        if self.capacity == 0 {
            return Some(entry);
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub name: RoomName,
    pub members: HashSet<ConnectionId>,
    pub history: History,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(name: RoomName, created_at: Timestamp) -> Self {
        Self {
            name,
            members: HashSet::new(),
            history: History::with_capacity(HISTORY_CAPACITY),
            created_at,
        }
    }

    pub fn add_member(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id)
    }

    /// Members of the room except `exclude`, if given.
    pub fn members_except(&self, exclude: Option<&ConnectionId>) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|id| Some(*id) != exclude)
            .cloned()
            .collect()
    }

    pub fn sorted_members(&self) -> Vec<ConnectionId> {
        let mut members: Vec<ConnectionId> = self.members.iter().cloned().collect();
        members.sort();
        members
    }
}

/// All rooms, created lazily on first reference.
#[derive(Debug, Clone, Default)]
pub struct RoomStore {
    rooms: HashMap<RoomName, Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &RoomName) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn get_or_create(&mut self, name: &RoomName, now: Timestamp) -> &mut Room {
        self.rooms.entry(name.clone()).or_insert_with(|| {
            tracing::debug!("Room '{}' created", name);
            Room::new(name.clone(), now)
        })
    }

    /// Move a connection into `name`, creating the room if needed.
    pub fn join(&mut self, connection_id: ConnectionId, name: &RoomName, now: Timestamp) {
        self.leave_all(&connection_id);
        self.get_or_create(name, now).add_member(connection_id);
    }

    /// Remove a connection from its room without any notification.
    pub fn leave_current(&mut self, connection_id: &ConnectionId, name: &RoomName) -> bool {
        self.rooms
            .get_mut(name)
            .is_some_and(|room| room.remove_member(connection_id))
    }

    /// Remove a connection from every room it is a member of.
    pub fn leave_all(&mut self, connection_id: &ConnectionId) {
        for room in self.rooms.values_mut() {
            room.remove_member(connection_id);
        }
    }

    pub fn append_history(
        &mut self,
        name: &RoomName,
        entry: HistoryEntry,
        now: Timestamp,
    ) -> Option<HistoryEntry> {
        self.get_or_create(name, now).history.push(entry)
    }

    pub fn history(&self, name: &RoomName) -> Vec<HistoryEntry> {
        self.rooms
            .get(name)
            .map(|room| room.history.to_vec())
            .unwrap_or_default()
    }

    /// Broadcast targets for `name`: every member except `exclude`.
    pub fn broadcast_targets(
        &self,
        name: &RoomName,
        exclude: Option<&ConnectionId>,
    ) -> Vec<ConnectionId> {
        self.rooms
            .get(name)
            .map(|room| room.members_except(exclude))
            .unwrap_or_default()
    }

    /// Rooms sorted by name.
    pub fn rooms(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        rooms
    }
}
