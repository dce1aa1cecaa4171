use crate::application_port::{RelationError, RelationshipService};
use crate::cache::{Clock, TtlCache};
use crate::domain_model::*;
use crate::domain_port::{NotificationSender, ProfileRepo, RelationshipStore};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Profiles are resolved in batches of this size, concurrently within a
/// batch, to keep the number of in-flight lookups bounded.
pub(crate) const RESOLVE_BATCH: usize = 10;

/// Cached resolved lists for one user: the friend list and the incoming
/// request list. Invalidated together; a mutation touching one almost
/// always touches the other.
pub struct RosterCache {
    friends: TtlCache<UserId, Vec<UserProfile>>,
    requests: TtlCache<UserId, Vec<UserProfile>>,
}

impl RosterCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        RosterCache {
            friends: TtlCache::new(ttl, clock.clone()),
            requests: TtlCache::new(ttl, clock),
        }
    }

    pub fn invalidate(&self, user: UserId) {
        self.friends.invalidate(&user);
        self.requests.invalidate(&user);
    }
}

pub struct RealRelationshipService {
    profiles: Arc<dyn ProfileRepo>,
    store: Arc<dyn RelationshipStore>,
    roster: Arc<RosterCache>,
    notifier: Arc<dyn NotificationSender>,
}

impl RealRelationshipService {
    pub fn new(
        profiles: Arc<dyn ProfileRepo>,
        store: Arc<dyn RelationshipStore>,
        roster: Arc<RosterCache>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            profiles,
            store,
            roster,
            notifier,
        }
    }

    async fn resolve_profile(&self, user: UserId) -> Result<UserProfile, RelationError> {
        self.profiles
            .get(user)
            .await
            .map_err(|e| RelationError::StoreUnavailable(e.to_string()))?
            .ok_or(RelationError::UserNotFound)
    }

    /// Resolves a set of ids to profiles, dropping ids that no longer
    /// resolve. Partial results are preferred over total failure.
    async fn resolve_many(&self, ids: &BTreeSet<UserId>) -> Vec<UserProfile> {
        let ids: Vec<UserId> = ids.iter().copied().collect();
        let mut out = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(RESOLVE_BATCH) {
            let batch =
                futures_util::future::join_all(chunk.iter().map(|id| self.profiles.get(*id)))
                    .await;
            for resolved in batch {
                match resolved {
                    Ok(Some(profile)) => out.push(profile),
                    Ok(None) => {}
                    Err(e) => tracing::warn!("profile resolution failed: {e:#}"),
                }
            }
        }
        out
    }

    async fn notify_best_effort(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(notification).await {
            tracing::warn!("notification dropped: {e:#}");
        }
    }

    // The two-document writes for each transition. No rollback of the first
    // write when the second fails: a partial application is a one-sided
    // pending/friend state that the same call repairs on retry.

    async fn write_send(&self, sender: UserId, receiver: UserId) -> Result<(), RelationError> {
        self.store.add_sent_request(sender, receiver).await?;
        self.store.add_received_request(receiver, sender).await
    }

    async fn write_accept(&self, sender: UserId, receiver: UserId) -> Result<(), RelationError> {
        self.store
            .apply(
                sender,
                RelationshipDelta::new()
                    .remove_sent(receiver)
                    .add_friend(receiver),
            )
            .await?;
        self.store
            .apply(
                receiver,
                RelationshipDelta::new()
                    .remove_received(sender)
                    .add_friend(sender),
            )
            .await
    }

    async fn write_decline(&self, sender: UserId, receiver: UserId) -> Result<(), RelationError> {
        self.store.remove_sent_request(sender, receiver).await?;
        self.store.remove_received_request(receiver, sender).await
    }

    async fn write_remove(&self, user: UserId, other: UserId) -> Result<(), RelationError> {
        self.store.remove_friend(user, other).await?;
        self.store.remove_friend(other, user).await
    }
}

#[async_trait::async_trait]
impl RelationshipService for RealRelationshipService {
    async fn send_friend_request(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<(), RelationError> {
        if sender == receiver {
            return Ok(());
        }

        let sender_profile = self.resolve_profile(sender).await?;
        self.resolve_profile(receiver).await?;

        // The set writes below are idempotent on their own; the short
        // circuit exists so a duplicate call produces no second
        // notification.
        let record = self.store.get_or_create(sender).await?;
        if record.friends.contains(&receiver) || record.requests_sent.contains(&receiver) {
            return Ok(());
        }

        let outcome = self.write_send(sender, receiver).await;
        self.roster.invalidate(sender);
        self.roster.invalidate(receiver);
        outcome?;

        self.notify_best_effort(Notification::friend_request(
            receiver,
            sender,
            sender_profile.label(),
        ))
        .await;

        Ok(())
    }

    async fn accept_friend_request(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<(), RelationError> {
        tracing::debug!(%sender, %receiver, "accepting friend request");

        // Lenient merge: no guard on a pending request existing. Removing an
        // absent entry is a no-op and the friend addition proceeds, so a
        // repeated or raced accept still converges on the friends state.
        let outcome = self.write_accept(sender, receiver).await;
        self.roster.invalidate(sender);
        self.roster.invalidate(receiver);
        outcome?;

        match self.profiles.get(receiver).await {
            Ok(Some(accepter)) => {
                self.notify_best_effort(Notification::friend_accepted(
                    sender,
                    receiver,
                    accepter.label(),
                ))
                .await;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("accepter lookup failed, skipping notification: {e:#}"),
        }

        Ok(())
    }

    async fn decline_friend_request(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<(), RelationError> {
        tracing::debug!(%sender, %receiver, "declining friend request");

        let outcome = self.write_decline(sender, receiver).await;
        self.roster.invalidate(sender);
        self.roster.invalidate(receiver);
        outcome?;

        Ok(())
    }

    async fn remove_friend(&self, user: UserId, other: UserId) -> Result<(), RelationError> {
        let outcome = self.write_remove(user, other).await;
        self.roster.invalidate(user);
        self.roster.invalidate(other);
        outcome?;

        Ok(())
    }

    async fn get_friends(
        &self,
        user: UserId,
        force_refresh: bool,
    ) -> Result<Vec<UserProfile>, RelationError> {
        if !force_refresh {
            if let Some(list) = self.roster.friends.get(&user) {
                return Ok(list);
            }
        }

        let record = match self.store.get_or_create(user).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("friend list read failed, serving cache: {e}");
                return Ok(self.roster.friends.get(&user).unwrap_or_default());
            }
        };

        let resolved = self.resolve_many(&record.friends).await;
        self.roster.friends.insert(user, resolved.clone());
        Ok(resolved)
    }

    async fn get_pending_requests(
        &self,
        user: UserId,
        force_refresh: bool,
    ) -> Result<Vec<UserProfile>, RelationError> {
        if !force_refresh {
            if let Some(list) = self.roster.requests.get(&user) {
                return Ok(list);
            }
        }

        let record = match self.store.get_or_create(user).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("pending request read failed, serving cache: {e}");
                return Ok(self.roster.requests.get(&user).unwrap_or_default());
            }
        };

        let resolved = self.resolve_many(&record.requests_received).await;
        self.roster.requests.insert(user, resolved.clone());
        Ok(resolved)
    }

    async fn relationship_status(
        &self,
        user: UserId,
        other: UserId,
    ) -> Result<RelationshipStatus, RelationError> {
        let record = self.store.get_or_create(user).await?;
        Ok(record.status_towards(other))
    }
}
