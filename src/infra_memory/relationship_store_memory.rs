use crate::application_port::RelationError;
use crate::domain_model::*;
use crate::domain_port::RelationshipStore;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// DashMap-backed relationship documents with the same read-fallback
/// contract as the MySQL store: while the backend is unreachable, reads
/// serve the last record this instance handed out (or an empty one) and
/// writes fail with `StoreUnavailable`.
///
/// `set_offline` simulates an unreachable backend; demos and tests use it to
/// exercise the degraded path.
#[derive(Default)]
pub struct MemoryRelationshipStore {
    docs: DashMap<UserId, RelationshipRecord>,
    last_served: DashMap<UserId, RelationshipRecord>,
    offline: AtomicBool,
}

impl MemoryRelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RelationshipStore for MemoryRelationshipStore {
    async fn get_or_create(&self, user: UserId) -> Result<RelationshipRecord, RelationError> {
        if self.is_offline() {
            let fallback = self
                .last_served
                .get(&user)
                .map(|r| r.value().clone())
                .unwrap_or_else(|| RelationshipRecord::empty(Utc::now()));
            return Ok(fallback);
        }

        let record = self
            .docs
            .entry(user)
            .or_insert_with(|| RelationshipRecord::empty(Utc::now()))
            .clone();
        self.last_served.insert(user, record.clone());
        Ok(record)
    }

    async fn apply(&self, user: UserId, delta: RelationshipDelta) -> Result<(), RelationError> {
        if self.is_offline() {
            return Err(RelationError::StoreUnavailable(
                "relationship backend offline".to_owned(),
            ));
        }

        let mut entry = self
            .docs
            .entry(user)
            .or_insert_with(|| RelationshipRecord::empty(Utc::now()));
        entry.apply(&delta, Utc::now());
        Ok(())
    }
}
