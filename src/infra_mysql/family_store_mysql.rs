use crate::application_port::FamilyError;
use crate::domain_model::*;
use crate::domain_port::FamilyStore;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

// Tables:
//   families(family_id PK, name, created_by, created_at, updated_at)
//   family_members(family_id, user_id) PK(family_id, user_id)

pub struct MySqlFamilyStore {
    pool: MySqlPool,
}

impl MySqlFamilyStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlFamilyStore { pool }
    }

    async fn exists(&self, family: FamilyId) -> Result<bool, FamilyError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM families WHERE family_id = ?")
            .bind(family)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;
        Ok(count > 0)
    }
}

#[async_trait::async_trait]
impl FamilyStore for MySqlFamilyStore {
    async fn insert(&self, family: FamilyRecord) -> Result<(), FamilyError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        sqlx::query(
            r#"
INSERT INTO families (family_id, name, created_by, created_at, updated_at)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(family.id)
        .bind(&family.name)
        .bind(family.created_by)
        .bind(family.created_at)
        .bind(family.updated_at)
        .execute(tx.as_mut())
        .await
        .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        for member in &family.members {
            sqlx::query("INSERT IGNORE INTO family_members (family_id, user_id) VALUES (?, ?)")
                .bind(family.id)
                .bind(member)
                .execute(tx.as_mut())
                .await
                .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, family: FamilyId) -> Result<Option<FamilyRecord>, FamilyError> {
        let Some(row) = sqlx::query(
            "SELECT family_id, name, created_by, created_at, updated_at FROM families WHERE family_id = ?",
        )
        .bind(family)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?
        else {
            return Ok(None);
        };

        let member_rows = sqlx::query("SELECT user_id FROM family_members WHERE family_id = ?")
            .bind(family)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        let mut record = FamilyRecord {
            id: row.get("family_id"),
            name: row.get("name"),
            created_by: row.get("created_by"),
            members: Default::default(),
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
            updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        };
        for member_row in member_rows {
            record.members.insert(member_row.get::<UserId, _>("user_id"));
        }
        Ok(Some(record))
    }

    async fn add_member(&self, family: FamilyId, user: UserId) -> Result<(), FamilyError> {
        if !self.exists(family).await? {
            return Err(FamilyError::FamilyNotFound);
        }

        sqlx::query("INSERT IGNORE INTO family_members (family_id, user_id) VALUES (?, ?)")
            .bind(family)
            .bind(user)
            .execute(&self.pool)
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        sqlx::query("UPDATE families SET updated_at = ? WHERE family_id = ?")
            .bind(Utc::now())
            .bind(family)
            .execute(&self.pool)
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        Ok(())
    }

    async fn remove_member(&self, family: FamilyId, user: UserId) -> Result<(), FamilyError> {
        if !self.exists(family).await? {
            return Err(FamilyError::FamilyNotFound);
        }

        sqlx::query("DELETE FROM family_members WHERE family_id = ? AND user_id = ?")
            .bind(family)
            .bind(user)
            .execute(&self.pool)
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        sqlx::query("UPDATE families SET updated_at = ? WHERE family_id = ?")
            .bind(Utc::now())
            .bind(family)
            .execute(&self.pool)
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, family: FamilyId) -> Result<(), FamilyError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        sqlx::query("DELETE FROM family_members WHERE family_id = ?")
            .bind(family)
            .execute(tx.as_mut())
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;
        sqlx::query("DELETE FROM families WHERE family_id = ?")
            .bind(family)
            .execute(tx.as_mut())
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        Ok(())
    }

    async fn families_of(&self, user: UserId) -> Result<Vec<FamilyRecord>, FamilyError> {
        // members-contains query
        let rows = sqlx::query(
            r#"
SELECT f.family_id
FROM families f
JOIN family_members m ON m.family_id = f.family_id
WHERE m.user_id = ?
ORDER BY f.created_at
"#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| FamilyError::StoreUnavailable(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(record) = self.get(row.get::<FamilyId, _>("family_id")).await? {
                out.push(record);
            }
        }
        Ok(out)
    }
}
