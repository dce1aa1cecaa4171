use crate::application_port::FamilyError;
use crate::domain_model::*;
use crate::domain_port::FamilyStore;
use chrono::Utc;
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryFamilyStore {
    families: DashMap<FamilyId, FamilyRecord>,
}

impl MemoryFamilyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FamilyStore for MemoryFamilyStore {
    async fn insert(&self, family: FamilyRecord) -> Result<(), FamilyError> {
        self.families.insert(family.id, family);
        Ok(())
    }

    async fn get(&self, family: FamilyId) -> Result<Option<FamilyRecord>, FamilyError> {
        Ok(self.families.get(&family).map(|r| r.value().clone()))
    }

    async fn add_member(&self, family: FamilyId, user: UserId) -> Result<(), FamilyError> {
        let mut record = self
            .families
            .get_mut(&family)
            .ok_or(FamilyError::FamilyNotFound)?;
        record.members.insert(user);
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn remove_member(&self, family: FamilyId, user: UserId) -> Result<(), FamilyError> {
        let mut record = self
            .families
            .get_mut(&family)
            .ok_or(FamilyError::FamilyNotFound)?;
        record.members.remove(&user);
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, family: FamilyId) -> Result<(), FamilyError> {
        self.families.remove(&family);
        Ok(())
    }

    async fn families_of(&self, user: UserId) -> Result<Vec<FamilyRecord>, FamilyError> {
        let mut out: Vec<FamilyRecord> = self
            .families
            .iter()
            .filter(|entry| entry.value().members.contains(&user))
            .map(|entry| entry.value().clone())
            .collect();
        out.sort_by_key(|f| f.created_at);
        Ok(out)
    }
}
