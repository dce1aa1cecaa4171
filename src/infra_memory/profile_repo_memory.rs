use crate::domain_model::*;
use crate::domain_port::ProfileRepo;
use dashmap::DashMap;

/// Profile directory for demos and tests; seed it with `upsert`.
#[derive(Default)]
pub struct MemoryProfileRepo {
    profiles: DashMap<UserId, UserProfile>,
}

impl MemoryProfileRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, profile: UserProfile) {
        self.profiles.insert(profile.id, profile);
    }

    pub fn remove(&self, user: UserId) {
        self.profiles.remove(&user);
    }
}

#[async_trait::async_trait]
impl ProfileRepo for MemoryProfileRepo {
    async fn get(&self, user: UserId) -> anyhow::Result<Option<UserProfile>> {
        Ok(self.profiles.get(&user).map(|p| p.value().clone()))
    }
}
