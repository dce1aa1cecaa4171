use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-user relationship document. Created lazily with empty sets on first
/// access and never deleted; only the protocol layer mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub friends: BTreeSet<UserId>,
    pub requests_sent: BTreeSet<UserId>,
    pub requests_received: BTreeSet<UserId>,
    pub updated_at: DateTime<Utc>,
}

impl RelationshipRecord {
    pub fn empty(now: DateTime<Utc>) -> Self {
        RelationshipRecord {
            friends: BTreeSet::new(),
            requests_sent: BTreeSet::new(),
            requests_received: BTreeSet::new(),
            updated_at: now,
        }
    }

    /// Applies a delta in place. Set union/removal, so repeated application
    /// of the same delta is a no-op after the first.
    pub fn apply(&mut self, delta: &RelationshipDelta, now: DateTime<Utc>) {
        for id in &delta.add_friends {
            self.friends.insert(*id);
        }
        for id in &delta.remove_friends {
            self.friends.remove(id);
        }
        for id in &delta.add_sent {
            self.requests_sent.insert(*id);
        }
        for id in &delta.remove_sent {
            self.requests_sent.remove(id);
        }
        for id in &delta.add_received {
            self.requests_received.insert(*id);
        }
        for id in &delta.remove_received {
            self.requests_received.remove(id);
        }
        self.updated_at = now;
    }

    pub fn status_towards(&self, other: UserId) -> RelationshipStatus {
        if self.friends.contains(&other) {
            RelationshipStatus::Friends
        } else if self.requests_sent.contains(&other) {
            RelationshipStatus::Sent
        } else if self.requests_received.contains(&other) {
            RelationshipStatus::Received
        } else {
            RelationshipStatus::None
        }
    }
}

/// One pair is in exactly one of these states at a time, seen from one side.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStatus {
    None,
    Sent,
    Received,
    Friends,
}

/// Set mutations against a single user's record. One delta corresponds to
/// one document write; store backends apply it atomically per document.
#[derive(Debug, Clone, Default)]
pub struct RelationshipDelta {
    pub add_friends: Vec<UserId>,
    pub remove_friends: Vec<UserId>,
    pub add_sent: Vec<UserId>,
    pub remove_sent: Vec<UserId>,
    pub add_received: Vec<UserId>,
    pub remove_received: Vec<UserId>,
}

impl RelationshipDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_friend(mut self, id: UserId) -> Self {
        self.add_friends.push(id);
        self
    }

    pub fn remove_friend(mut self, id: UserId) -> Self {
        self.remove_friends.push(id);
        self
    }

    pub fn add_sent(mut self, id: UserId) -> Self {
        self.add_sent.push(id);
        self
    }

    pub fn remove_sent(mut self, id: UserId) -> Self {
        self.remove_sent.push(id);
        self
    }

    pub fn add_received(mut self, id: UserId) -> Self {
        self.add_received.push(id);
        self
    }

    pub fn remove_received(mut self, id: UserId) -> Self {
        self.remove_received.push(id);
        self
    }
}
