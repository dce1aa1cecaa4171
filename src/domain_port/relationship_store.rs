use crate::application_port::RelationError;
use crate::domain_model::*;

/// Durable per-user relationship documents.
///
/// `apply` is the primitive: one delta, one document write, applied
/// atomically per document. The named mutations are thin wrappers kept for
/// call-site readability. Every mutation bumps `updated_at`.
///
/// Reads on an unreachable backend fall back to the last record this store
/// instance served for that user, or an empty record. Writes never fall
/// back; they surface `StoreUnavailable` and are neither queued nor retried.
#[async_trait::async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Returns the existing record, persisting an empty one first if none
    /// exists. Never overwrites existing state.
    async fn get_or_create(&self, user: UserId) -> Result<RelationshipRecord, RelationError>;

    async fn apply(&self, user: UserId, delta: RelationshipDelta) -> Result<(), RelationError>;

    async fn add_friend(&self, user: UserId, other: UserId) -> Result<(), RelationError> {
        self.apply(user, RelationshipDelta::new().add_friend(other))
            .await
    }

    async fn remove_friend(&self, user: UserId, other: UserId) -> Result<(), RelationError> {
        self.apply(user, RelationshipDelta::new().remove_friend(other))
            .await
    }

    async fn add_sent_request(&self, user: UserId, other: UserId) -> Result<(), RelationError> {
        self.apply(user, RelationshipDelta::new().add_sent(other))
            .await
    }

    async fn remove_sent_request(&self, user: UserId, other: UserId) -> Result<(), RelationError> {
        self.apply(user, RelationshipDelta::new().remove_sent(other))
            .await
    }

    async fn add_received_request(
        &self,
        user: UserId,
        other: UserId,
    ) -> Result<(), RelationError> {
        self.apply(user, RelationshipDelta::new().add_received(other))
            .await
    }

    async fn remove_received_request(
        &self,
        user: UserId,
        other: UserId,
    ) -> Result<(), RelationError> {
        self.apply(user, RelationshipDelta::new().remove_received(other))
            .await
    }
}
