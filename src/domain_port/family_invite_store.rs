use crate::application_port::FamilyError;
use crate::domain_model::*;

/// Per-user invitation documents, keyed like the relationship documents.
/// Entries are matched by (family, counterpart); removals of entries that
/// are already gone are no-ops.
#[async_trait::async_trait]
pub trait FamilyInviteStore: Send + Sync {
    async fn get_or_create(&self, user: UserId) -> Result<FamilyInviteRecord, FamilyError>;

    async fn push_received(&self, user: UserId, invite: FamilyInvite) -> Result<(), FamilyError>;

    async fn push_sent(&self, user: UserId, invite: SentFamilyInvite) -> Result<(), FamilyError>;

    async fn remove_received(
        &self,
        user: UserId,
        family: FamilyId,
        from: UserId,
    ) -> Result<(), FamilyError>;

    async fn remove_sent(
        &self,
        user: UserId,
        family: FamilyId,
        to: UserId,
    ) -> Result<(), FamilyError>;
}
