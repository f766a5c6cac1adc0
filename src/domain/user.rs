use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::role::Role;
use crate::domain::types::{
    DisplayName, Email, Identified, MediaUrl, Password, PhoneNumber, RecordId,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for User {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Account created by an administrator (`POST /api/users/create`).
#[derive(Clone, Debug, Serialize)]
pub struct NewUser {
    pub name: DisplayName,
    pub email: Email,
    pub password: Password,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<MediaUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaUrl>,
}

/// Profile edit (`PUT /api/users/{id}`).
#[derive(Clone, Debug, Serialize)]
pub struct UpdateAccount {
    pub name: DisplayName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<PhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<MediaUrl>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StatusChange {
    pub user_id: RecordId,
    pub status: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RoleChange {
    pub user_id: RecordId,
    pub role: Role,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Admin verdict on an instructor registration.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct InstructorReview {
    pub user_id: RecordId,
    pub status: ReviewDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PasswordChange {
    pub user_id: RecordId,
    pub old_password: Password,
    pub new_password: Password,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_tolerates_sparse_payload() {
        let user: User = serde_json::from_str(
            r#"{"_id":"1","name":"An","email":"an@example.com","role":"instructor","created_at":"2024-07-01T08:00:00.000Z"}"#,
        )
        .unwrap();
        assert!(!user.status);
        assert!(user.created_at.is_some());
    }

    #[test]
    fn review_omits_empty_comment() {
        let review = InstructorReview {
            user_id: RecordId::new("7").unwrap(),
            status: ReviewDecision::Approve,
            comment: None,
        };
        assert_eq!(
            serde_json::to_value(&review).unwrap(),
            serde_json::json!({"user_id": "7", "status": "approve"})
        );
    }
}
