use crate::cache::{Clock, TtlCache};
use crate::domain_model::*;
use crate::domain_port::ProfileRepo;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use std::sync::Arc;
use std::time::Duration;

// Table:
//   users(user_id PK, display_name, email, avatar, last_seen)

pub struct MySqlProfileRepo {
    pool: MySqlPool,
    // profile lookups repeat heavily during roster resolution
    cache: TtlCache<UserId, UserProfile>,
}

impl MySqlProfileRepo {
    pub fn new(pool: MySqlPool, cache_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        MySqlProfileRepo {
            pool,
            cache: TtlCache::new(cache_ttl, clock),
        }
    }
}

#[async_trait::async_trait]
impl ProfileRepo for MySqlProfileRepo {
    async fn get(&self, user: UserId) -> anyhow::Result<Option<UserProfile>> {
        if let Some(profile) = self.cache.get(&user) {
            return Ok(Some(profile));
        }

        let Some(row) = sqlx::query(
            "SELECT user_id, display_name, email, avatar, last_seen FROM users WHERE user_id = ?",
        )
        .bind(user)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let profile = UserProfile {
            id: row.get("user_id"),
            display_name: row.get("display_name"),
            email: row.get("email"),
            avatar: row.get::<Option<String>, _>("avatar"),
            last_seen: row.get::<Option<DateTime<Utc>>, _>("last_seen"),
        };
        self.cache.insert(user, profile.clone());
        Ok(Some(profile))
    }
}
