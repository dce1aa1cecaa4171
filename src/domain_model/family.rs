use crate::domain_model::{UserId, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct FamilyId(pub uuid::Uuid);

impl FamilyId {
    pub fn random() -> Self {
        FamilyId(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FamilyId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(FamilyId)
    }
}

/// A named group of users sharing an album. The creator stays a member
/// until the family is deleted; a family with zero members is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyRecord {
    pub id: FamilyId,
    pub name: String,
    pub created_by: UserId,
    pub members: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FamilyRecord {
    pub fn new(id: FamilyId, name: &str, created_by: UserId, now: DateTime<Utc>) -> Self {
        let mut members = BTreeSet::new();
        members.insert(created_by);
        FamilyRecord {
            id,
            name: name.to_owned(),
            created_by,
            members,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Invitation as stored on the invitee's side. Family name and inviter name
/// are denormalized so the invite list renders without extra lookups.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FamilyInvite {
    pub family_id: FamilyId,
    pub family_name: String,
    pub from_user: UserId,
    pub from_user_name: String,
    pub sent_at: DateTime<Utc>,
}

/// Invitation as stored on the inviter's side.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SentFamilyInvite {
    pub family_id: FamilyId,
    pub to_user: UserId,
    pub sent_at: DateTime<Utc>,
}

/// Per-user invitation document, the family analog of `RelationshipRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyInviteRecord {
    pub received: Vec<FamilyInvite>,
    pub sent: Vec<SentFamilyInvite>,
    pub updated_at: DateTime<Utc>,
}

impl FamilyInviteRecord {
    pub fn empty(now: DateTime<Utc>) -> Self {
        FamilyInviteRecord {
            received: Vec::new(),
            sent: Vec::new(),
            updated_at: now,
        }
    }

    pub fn has_invite_for(&self, family: FamilyId) -> bool {
        self.received.iter().any(|inv| inv.family_id == family)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyMember {
    pub profile: UserProfile,
    pub is_creator: bool,
}
