use crate::domain_model::*;

/// Profile lookups. A deleted or unknown id resolves to `None`; only a
/// backend failure is an error.
#[async_trait::async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get(&self, user: UserId) -> anyhow::Result<Option<UserProfile>>;
}
