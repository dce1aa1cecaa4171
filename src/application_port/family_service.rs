use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum FamilyError {
    #[error("user not found")]
    UserNotFound,
    #[error("family not found")]
    FamilyNotFound,
    #[error("not a member")]
    NotMember,
    #[error("already a member")]
    AlreadyMember,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Family-membership protocol, mirroring the friend-request shape with one
/// asymmetry: accepting mutates the shared family record in addition to the
/// two per-user invite documents.
#[async_trait::async_trait]
pub trait FamilyService: Send + Sync {
    async fn create_family(&self, owner: UserId, name: &str) -> Result<FamilyRecord, FamilyError>;

    async fn send_family_invite(
        &self,
        family: FamilyId,
        from: UserId,
        to: UserId,
    ) -> Result<(), FamilyError>;

    /// `user` joins `family`, clearing the invite from `from`. Lenient like
    /// the friend accept: membership is added even when the invite entries
    /// are already gone.
    async fn accept_family_invite(
        &self,
        user: UserId,
        family: FamilyId,
        from: UserId,
    ) -> Result<(), FamilyError>;

    async fn decline_family_invite(
        &self,
        user: UserId,
        family: FamilyId,
        from: UserId,
    ) -> Result<(), FamilyError>;

    /// Removes `user` from the family. When the leaver is the creator and
    /// was the last member, the family record is deleted.
    async fn leave_family(&self, user: UserId, family: FamilyId) -> Result<(), FamilyError>;

    async fn get_family(&self, family: FamilyId) -> Result<Option<FamilyRecord>, FamilyError>;

    async fn families_of(&self, user: UserId) -> Result<Vec<FamilyRecord>, FamilyError>;

    async fn pending_invites(&self, user: UserId) -> Result<Vec<FamilyInvite>, FamilyError>;

    /// Resolved member list with the creator flagged, cached with a TTL.
    async fn family_members(
        &self,
        family: FamilyId,
        force_refresh: bool,
    ) -> Result<Vec<FamilyMember>, FamilyError>;
}
