use super::relationship_service_impl::RESOLVE_BATCH;
use crate::application_port::{FamilyError, FamilyService};
use crate::cache::TtlCache;
use crate::domain_model::*;
use crate::domain_port::{FamilyInviteStore, FamilyStore, NotificationSender, ProfileRepo};
use chrono::Utc;
use std::sync::Arc;

pub struct RealFamilyService {
    profiles: Arc<dyn ProfileRepo>,
    families: Arc<dyn FamilyStore>,
    invites: Arc<dyn FamilyInviteStore>,
    members_cache: Arc<TtlCache<FamilyId, Vec<FamilyMember>>>,
    notifier: Arc<dyn NotificationSender>,
}

impl RealFamilyService {
    pub fn new(
        profiles: Arc<dyn ProfileRepo>,
        families: Arc<dyn FamilyStore>,
        invites: Arc<dyn FamilyInviteStore>,
        members_cache: Arc<TtlCache<FamilyId, Vec<FamilyMember>>>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            profiles,
            families,
            invites,
            members_cache,
            notifier,
        }
    }

    async fn resolve_profile(&self, user: UserId) -> Result<UserProfile, FamilyError> {
        self.profiles
            .get(user)
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?
            .ok_or(FamilyError::UserNotFound)
    }

    async fn notify_best_effort(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(notification).await {
            tracing::warn!("notification dropped: {e:#}");
        }
    }

    /// Resolves the member set to profiles, concurrently within batches,
    /// dropping members that no longer resolve.
    async fn resolve_members(&self, record: &FamilyRecord) -> Vec<FamilyMember> {
        let ids: Vec<UserId> = record.members.iter().copied().collect();
        let mut out = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(RESOLVE_BATCH) {
            let batch =
                futures_util::future::join_all(chunk.iter().map(|id| self.profiles.get(*id)))
                    .await;
            for (id, resolved) in chunk.iter().zip(batch) {
                match resolved {
                    Ok(Some(profile)) => out.push(FamilyMember {
                        is_creator: *id == record.created_by,
                        profile,
                    }),
                    Ok(None) => {}
                    Err(e) => tracing::warn!("member resolution failed: {e:#}"),
                }
            }
        }
        out
    }

    /// Clears the invite pair for (user receiving, from sending). Entries
    /// already gone are skipped; the operation is retry-safe.
    async fn clear_invite_pair(
        &self,
        user: UserId,
        family: FamilyId,
        from: UserId,
    ) -> Result<(), FamilyError> {
        self.invites.remove_received(user, family, from).await?;
        self.invites.remove_sent(from, family, user).await
    }
}

#[async_trait::async_trait]
impl FamilyService for RealFamilyService {
    async fn create_family(&self, owner: UserId, name: &str) -> Result<FamilyRecord, FamilyError> {
        self.resolve_profile(owner).await?;

        let record = FamilyRecord::new(FamilyId::random(), name, owner, Utc::now());
        self.families.insert(record.clone()).await?;
        tracing::info!(family = %record.id, %owner, "family created");
        Ok(record)
    }

    async fn send_family_invite(
        &self,
        family: FamilyId,
        from: UserId,
        to: UserId,
    ) -> Result<(), FamilyError> {
        if from == to {
            return Ok(());
        }

        let record = self
            .families
            .get(family)
            .await?
            .ok_or(FamilyError::FamilyNotFound)?;
        if !record.members.contains(&from) {
            return Err(FamilyError::NotMember);
        }
        if record.members.contains(&to) {
            return Err(FamilyError::AlreadyMember);
        }

        let from_profile = self.resolve_profile(from).await?;
        self.resolve_profile(to).await?;

        // One pending invite per (user, family) pair; a duplicate call is a
        // no-op and sends no second notification.
        let to_invites = self.invites.get_or_create(to).await?;
        if to_invites.has_invite_for(family) {
            return Ok(());
        }

        let now = Utc::now();
        self.invites
            .push_received(
                to,
                FamilyInvite {
                    family_id: family,
                    family_name: record.name.clone(),
                    from_user: from,
                    from_user_name: from_profile.label().to_owned(),
                    sent_at: now,
                },
            )
            .await?;
        self.invites
            .push_sent(
                from,
                SentFamilyInvite {
                    family_id: family,
                    to_user: to,
                    sent_at: now,
                },
            )
            .await?;

        self.notify_best_effort(Notification::family_invite(
            to,
            family,
            &record.name,
            from_profile.label(),
        ))
        .await;

        Ok(())
    }

    async fn accept_family_invite(
        &self,
        user: UserId,
        family: FamilyId,
        from: UserId,
    ) -> Result<(), FamilyError> {
        let record = self
            .families
            .get(family)
            .await?
            .ok_or(FamilyError::FamilyNotFound)?;

        // Membership first, then the invite cleanup: a crash in between
        // leaves a member with a stale invite entry, which the next accept
        // or decline clears.
        let outcome = async {
            self.families.add_member(family, user).await?;
            self.clear_invite_pair(user, family, from).await
        }
        .await;
        self.members_cache.invalidate(&family);
        outcome?;

        match self.profiles.get(user).await {
            Ok(Some(accepter)) => {
                self.notify_best_effort(Notification::family_accepted(
                    from,
                    family,
                    &record.name,
                    accepter.label(),
                ))
                .await;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("accepter lookup failed, skipping notification: {e:#}"),
        }

        Ok(())
    }

    async fn decline_family_invite(
        &self,
        user: UserId,
        family: FamilyId,
        from: UserId,
    ) -> Result<(), FamilyError> {
        self.clear_invite_pair(user, family, from).await?;

        // The family may be gone by now; the decline still succeeded.
        if let Ok(Some(record)) = self.families.get(family).await {
            if let Ok(Some(decliner)) = self.profiles.get(user).await {
                self.notify_best_effort(Notification::family_declined(
                    from,
                    family,
                    &record.name,
                    decliner.label(),
                ))
                .await;
            }
        }

        Ok(())
    }

    async fn leave_family(&self, user: UserId, family: FamilyId) -> Result<(), FamilyError> {
        let record = self
            .families
            .get(family)
            .await?
            .ok_or(FamilyError::FamilyNotFound)?;

        let outcome = async {
            self.families.remove_member(family, user).await?;
            // The creator leaving an otherwise empty family takes the
            // record with them.
            if record.created_by == user && record.members.len() == 1 {
                self.families.delete(family).await?;
                tracing::info!(%family, "family deleted with its last member");
            }
            Ok(())
        }
        .await;
        self.members_cache.invalidate(&family);
        outcome
    }

    async fn get_family(&self, family: FamilyId) -> Result<Option<FamilyRecord>, FamilyError> {
        self.families.get(family).await
    }

    async fn families_of(&self, user: UserId) -> Result<Vec<FamilyRecord>, FamilyError> {
        self.families.families_of(user).await
    }

    async fn pending_invites(&self, user: UserId) -> Result<Vec<FamilyInvite>, FamilyError> {
        Ok(self.invites.get_or_create(user).await?.received)
    }

    async fn family_members(
        &self,
        family: FamilyId,
        force_refresh: bool,
    ) -> Result<Vec<FamilyMember>, FamilyError> {
        if !force_refresh {
            if let Some(list) = self.members_cache.get(&family) {
                return Ok(list);
            }
        }

        let Some(record) = self.families.get(family).await? else {
            return Ok(Vec::new());
        };

        let members = self.resolve_members(&record).await;
        self.members_cache.insert(family, members.clone());
        Ok(members)
    }
}
