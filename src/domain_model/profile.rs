use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Name shown in notification bodies; falls back to the email when the
    /// user never set a display name.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.email
        } else {
            &self.display_name
        }
    }
}
