use crate::application_port::FamilyError;
use crate::domain_model::*;
use crate::domain_port::FamilyInviteStore;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

// Tables:
//   family_invite_docs(owner_id PK, updated_at)
//   family_invites_received(owner_id, family_id, from_user, family_name,
//                           from_user_name, sent_at) PK(owner_id, family_id, from_user)
//   family_invites_sent(owner_id, family_id, to_user, sent_at)
//                           PK(owner_id, family_id, to_user)

pub struct MySqlFamilyInviteStore {
    pool: MySqlPool,
}

impl MySqlFamilyInviteStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlFamilyInviteStore { pool }
    }

    async fn touch(&self, user: UserId) -> Result<(), FamilyError> {
        let now = Utc::now();
        sqlx::query(
            r#"
INSERT INTO family_invite_docs (owner_id, updated_at)
VALUES (?, ?)
ON DUPLICATE KEY UPDATE updated_at = VALUES(updated_at)
"#,
        )
        .bind(user)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl FamilyInviteStore for MySqlFamilyInviteStore {
    async fn get_or_create(&self, user: UserId) -> Result<FamilyInviteRecord, FamilyError> {
        let doc = sqlx::query("SELECT updated_at FROM family_invite_docs WHERE owner_id = ?")
            .bind(user)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;
        let updated_at = match doc {
            Some(row) => row.get::<DateTime<Utc>, _>("updated_at"),
            None => {
                let now = Utc::now();
                sqlx::query(
                    "INSERT IGNORE INTO family_invite_docs (owner_id, updated_at) VALUES (?, ?)",
                )
                .bind(user)
                .bind(now)
                .execute(&self.pool)
                .await
                .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;
                now
            }
        };

        let mut record = FamilyInviteRecord::empty(updated_at);

        let received = sqlx::query(
            r#"
SELECT family_id, family_name, from_user, from_user_name, sent_at
FROM family_invites_received
WHERE owner_id = ?
ORDER BY sent_at
"#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;
        for row in received {
            record.received.push(FamilyInvite {
                family_id: row.get("family_id"),
                family_name: row.get("family_name"),
                from_user: row.get("from_user"),
                from_user_name: row.get("from_user_name"),
                sent_at: row.get::<DateTime<Utc>, _>("sent_at"),
            });
        }

        let sent = sqlx::query(
            r#"
SELECT family_id, to_user, sent_at
FROM family_invites_sent
WHERE owner_id = ?
ORDER BY sent_at
"#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;
        for row in sent {
            record.sent.push(SentFamilyInvite {
                family_id: row.get("family_id"),
                to_user: row.get("to_user"),
                sent_at: row.get::<DateTime<Utc>, _>("sent_at"),
            });
        }

        Ok(record)
    }

    async fn push_received(&self, user: UserId, invite: FamilyInvite) -> Result<(), FamilyError> {
        sqlx::query(
            r#"
INSERT IGNORE INTO family_invites_received
    (owner_id, family_id, from_user, family_name, from_user_name, sent_at)
VALUES (?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(user)
        .bind(invite.family_id)
        .bind(invite.from_user)
        .bind(&invite.family_name)
        .bind(&invite.from_user_name)
        .bind(invite.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        self.touch(user).await
    }

    async fn push_sent(&self, user: UserId, invite: SentFamilyInvite) -> Result<(), FamilyError> {
        sqlx::query(
            r#"
INSERT IGNORE INTO family_invites_sent (owner_id, family_id, to_user, sent_at)
VALUES (?, ?, ?, ?)
"#,
        )
        .bind(user)
        .bind(invite.family_id)
        .bind(invite.to_user)
        .bind(invite.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        self.touch(user).await
    }

    async fn remove_received(
        &self,
        user: UserId,
        family: FamilyId,
        from: UserId,
    ) -> Result<(), FamilyError> {
        sqlx::query(
            "DELETE FROM family_invites_received WHERE owner_id = ? AND family_id = ? AND from_user = ?",
        )
        .bind(user)
        .bind(family)
        .bind(from)
        .execute(&self.pool)
        .await
        .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        self.touch(user).await
    }

    async fn remove_sent(
        &self,
        user: UserId,
        family: FamilyId,
        to: UserId,
    ) -> Result<(), FamilyError> {
        sqlx::query(
            "DELETE FROM family_invites_sent WHERE owner_id = ? AND family_id = ? AND to_user = ?",
        )
        .bind(user)
        .bind(family)
        .bind(to)
        .execute(&self.pool)
        .await
        .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        self.touch(user).await
    }
}
