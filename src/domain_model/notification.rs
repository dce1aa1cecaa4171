use crate::domain_model::{FamilyId, UserId};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FriendRequest,
    FriendAccepted,
    FamilyInvite,
    FamilyAccepted,
    FamilyDeclined,
}

/// Push payload handed to the notification pump. Delivery is best effort;
/// nothing in the relationship protocol depends on it.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
}

impl Notification {
    pub fn friend_request(recipient: UserId, sender: UserId, sender_name: &str) -> Self {
        Notification {
            recipient,
            kind: NotificationKind::FriendRequest,
            title: "Friend request".to_owned(),
            message: format!("{sender_name} wants to be your friend"),
            data: json!({ "from": sender }),
        }
    }

    pub fn friend_accepted(recipient: UserId, accepter: UserId, accepter_name: &str) -> Self {
        Notification {
            recipient,
            kind: NotificationKind::FriendAccepted,
            title: "Request accepted".to_owned(),
            message: format!("{accepter_name} accepted your friend request"),
            data: json!({ "from": accepter }),
        }
    }

    pub fn family_invite(
        recipient: UserId,
        family: FamilyId,
        family_name: &str,
        inviter_name: &str,
    ) -> Self {
        Notification {
            recipient,
            kind: NotificationKind::FamilyInvite,
            title: "Family invitation".to_owned(),
            message: format!("{inviter_name} invited you to the family \"{family_name}\""),
            data: json!({ "family_id": family }),
        }
    }

    pub fn family_accepted(
        recipient: UserId,
        family: FamilyId,
        family_name: &str,
        accepter_name: &str,
    ) -> Self {
        Notification {
            recipient,
            kind: NotificationKind::FamilyAccepted,
            title: "Invitation accepted".to_owned(),
            message: format!("{accepter_name} joined the family \"{family_name}\""),
            data: json!({ "family_id": family }),
        }
    }

    pub fn family_declined(
        recipient: UserId,
        family: FamilyId,
        family_name: &str,
        decliner_name: &str,
    ) -> Self {
        Notification {
            recipient,
            kind: NotificationKind::FamilyDeclined,
            title: "Invitation declined".to_owned(),
            message: format!("{decliner_name} declined the invitation to \"{family_name}\""),
            data: json!({ "family_id": family }),
        }
    }
}
