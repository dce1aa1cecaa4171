use crate::application_port::FamilyError;
use crate::domain_model::*;
use crate::domain_port::FamilyInviteStore;
use chrono::Utc;
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryFamilyInviteStore {
    docs: DashMap<UserId, FamilyInviteRecord>,
}

impl MemoryFamilyInviteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FamilyInviteStore for MemoryFamilyInviteStore {
    async fn get_or_create(&self, user: UserId) -> Result<FamilyInviteRecord, FamilyError> {
        Ok(self
            .docs
            .entry(user)
            .or_insert_with(|| FamilyInviteRecord::empty(Utc::now()))
            .clone())
    }

    async fn push_received(&self, user: UserId, invite: FamilyInvite) -> Result<(), FamilyError> {
        let mut record = self
            .docs
            .entry(user)
            .or_insert_with(|| FamilyInviteRecord::empty(Utc::now()));
        // union semantics, keyed by (family, inviter)
        let exists = record
            .received
            .iter()
            .any(|i| i.family_id == invite.family_id && i.from_user == invite.from_user);
        if !exists {
            record.received.push(invite);
        }
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn push_sent(&self, user: UserId, invite: SentFamilyInvite) -> Result<(), FamilyError> {
        let mut record = self
            .docs
            .entry(user)
            .or_insert_with(|| FamilyInviteRecord::empty(Utc::now()));
        let exists = record
            .sent
            .iter()
            .any(|i| i.family_id == invite.family_id && i.to_user == invite.to_user);
        if !exists {
            record.sent.push(invite);
        }
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn remove_received(
        &self,
        user: UserId,
        family: FamilyId,
        from: UserId,
    ) -> Result<(), FamilyError> {
        if let Some(mut record) = self.docs.get_mut(&user) {
            record
                .received
                .retain(|i| !(i.family_id == family && i.from_user == from));
            record.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn remove_sent(
        &self,
        user: UserId,
        family: FamilyId,
        to: UserId,
    ) -> Result<(), FamilyError> {
        if let Some(mut record) = self.docs.get_mut(&user) {
            record
                .sent
                .retain(|i| !(i.family_id == family && i.to_user == to));
            record.updated_at = Utc::now();
        }
        Ok(())
    }
}
