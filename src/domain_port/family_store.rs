use crate::application_port::FamilyError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait FamilyStore: Send + Sync {
    async fn insert(&self, family: FamilyRecord) -> Result<(), FamilyError>;
    async fn get(&self, family: FamilyId) -> Result<Option<FamilyRecord>, FamilyError>;
    async fn add_member(&self, family: FamilyId, user: UserId) -> Result<(), FamilyError>;
    async fn remove_member(&self, family: FamilyId, user: UserId) -> Result<(), FamilyError>;
    async fn delete(&self, family: FamilyId) -> Result<(), FamilyError>;
    /// Members-contains query across all families.
    async fn families_of(&self, user: UserId) -> Result<Vec<FamilyRecord>, FamilyError>;
}
