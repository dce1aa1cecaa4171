use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    #[error("user not found")]
    UserNotFound,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Friend-request protocol over two denormalized per-user documents.
///
/// Two-document transitions are two independent writes with no rollback of
/// the first when the second fails; every mutation is an idempotent set
/// operation, so callers recover from a partial application by retrying with
/// the same arguments. Nothing here is linearizable and nothing pretends to
/// be.
#[async_trait::async_trait]
pub trait RelationshipService: Send + Sync {
    /// No-op when sender and receiver are the same user, when they are
    /// already friends, or when an identical request is already pending.
    async fn send_friend_request(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<(), RelationError>;

    /// Receiver accepts the request from sender. Lenient: proceeds to the
    /// friends state even when no pending request exists.
    async fn accept_friend_request(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<(), RelationError>;

    /// Clears the pending request on both sides. The same removal works
    /// whether the receiver declines or the sender cancels.
    async fn decline_friend_request(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<(), RelationError>;

    async fn remove_friend(&self, user: UserId, other: UserId) -> Result<(), RelationError>;

    /// Resolved friend list, served from the roster cache within its TTL
    /// unless `force_refresh` is set.
    async fn get_friends(
        &self,
        user: UserId,
        force_refresh: bool,
    ) -> Result<Vec<UserProfile>, RelationError>;

    /// Resolved incoming requests, same caching rules as `get_friends`.
    async fn get_pending_requests(
        &self,
        user: UserId,
        force_refresh: bool,
    ) -> Result<Vec<UserProfile>, RelationError>;

    async fn relationship_status(
        &self,
        user: UserId,
        other: UserId,
    ) -> Result<RelationshipStatus, RelationError>;
}
