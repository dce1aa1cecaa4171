use crate::application_port::RelationError;
use crate::domain_model::*;
use crate::domain_port::RelationshipStore;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sqlx::{MySqlPool, Row};

// Tables:
//   relationship_docs(owner_id PK, updated_at)
//   relationship_entries(owner_id, field, other_id) PK(owner_id, field, other_id)
// with field one of 'friend' | 'sent' | 'received'. INSERT IGNORE is the
// set union, DELETE the set removal; one transaction per document write.

const FIELD_FRIEND: &str = "friend";
const FIELD_SENT: &str = "sent";
const FIELD_RECEIVED: &str = "received";

pub struct MySqlRelationshipStore {
    pool: MySqlPool,
    // last record served per user, the read fallback while the pool errors
    last_served: DashMap<UserId, RelationshipRecord>,
}

impl MySqlRelationshipStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlRelationshipStore {
            pool,
            last_served: DashMap::new(),
        }
    }

    async fn load(&self, user: UserId) -> Result<RelationshipRecord, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let doc = sqlx::query("SELECT updated_at FROM relationship_docs WHERE owner_id = ?")
            .bind(user)
            .fetch_optional(tx.as_mut())
            .await?;
        let updated_at = match doc {
            Some(row) => row.get::<DateTime<Utc>, _>("updated_at"),
            None => {
                let now = Utc::now();
                sqlx::query(
                    r#"
INSERT IGNORE INTO relationship_docs (owner_id, updated_at)
VALUES (?, ?)
"#,
                )
                .bind(user)
                .bind(now)
                .execute(tx.as_mut())
                .await?;
                now
            }
        };

        let rows = sqlx::query("SELECT field, other_id FROM relationship_entries WHERE owner_id = ?")
            .bind(user)
            .fetch_all(tx.as_mut())
            .await?;

        tx.commit().await?;

        let mut record = RelationshipRecord::empty(updated_at);
        for row in rows {
            let other = row.get::<UserId, _>("other_id");
            match row.get::<String, _>("field").as_str() {
                FIELD_FRIEND => {
                    record.friends.insert(other);
                }
                FIELD_SENT => {
                    record.requests_sent.insert(other);
                }
                FIELD_RECEIVED => {
                    record.requests_received.insert(other);
                }
                other_field => tracing::warn!("unknown relationship field: {other_field}"),
            }
        }
        Ok(record)
    }
}

#[async_trait::async_trait]
impl RelationshipStore for MySqlRelationshipStore {
    async fn get_or_create(&self, user: UserId) -> Result<RelationshipRecord, RelationError> {
        match self.load(user).await {
            Ok(record) => {
                self.last_served.insert(user, record.clone());
                Ok(record)
            }
            Err(e) => {
                tracing::warn!("relationship read failed, serving last known record: {e}");
                Ok(self
                    .last_served
                    .get(&user)
                    .map(|r| r.value().clone())
                    .unwrap_or_else(|| RelationshipRecord::empty(Utc::now())))
            }
        }
    }

    async fn apply(&self, user: UserId, delta: RelationshipDelta) -> Result<(), RelationError> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RelationError::StoreUnavailable(e.to_string()))?;

        sqlx::query(
            r#"
INSERT IGNORE INTO relationship_docs (owner_id, updated_at)
VALUES (?, ?)
"#,
        )
        .bind(user)
        .bind(now)
        .execute(tx.as_mut())
        .await
        .map_err(|e| RelationError::StoreUnavailable(e.to_string()))?;

        let additions = [
            (FIELD_FRIEND, &delta.add_friends),
            (FIELD_SENT, &delta.add_sent),
            (FIELD_RECEIVED, &delta.add_received),
        ];
        for (field, ids) in additions {
            for id in ids {
                sqlx::query(
                    r#"
INSERT IGNORE INTO relationship_entries (owner_id, field, other_id)
VALUES (?, ?, ?)
"#,
                )
                .bind(user)
                .bind(field)
                .bind(id)
                .execute(tx.as_mut())
                .await
                .map_err(|e| RelationError::StoreUnavailable(e.to_string()))?;
            }
        }

        let removals = [
            (FIELD_FRIEND, &delta.remove_friends),
            (FIELD_SENT, &delta.remove_sent),
            (FIELD_RECEIVED, &delta.remove_received),
        ];
        for (field, ids) in removals {
            for id in ids {
                sqlx::query(
                    "DELETE FROM relationship_entries WHERE owner_id = ? AND field = ? AND other_id = ?",
                )
                .bind(user)
                .bind(field)
                .bind(id)
                .execute(tx.as_mut())
                .await
                .map_err(|e| RelationError::StoreUnavailable(e.to_string()))?;
            }
        }

        sqlx::query("UPDATE relationship_docs SET updated_at = ? WHERE owner_id = ?")
            .bind(now)
            .bind(user)
            .execute(tx.as_mut())
            .await
            .map_err(|e| RelationError::StoreUnavailable(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RelationError::StoreUnavailable(e.to_string()))?;

        Ok(())
    }
}
