//! Logged-in session context shared by every screen.

use serde::{Deserialize, Serialize};

use crate::domain::role::{Capability, Role};
use crate::domain::types::{RecordId, TypeConstraintError};

/// Profile of the logged-in account as returned by `GET /api/auth`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Bearer token plus the profile it belongs to.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AuthSession {
    #[serde(skip)]
    token: String,
    user: SessionUser,
}

impl AuthSession {
    /// Starts a session; the token must be non-empty.
    pub fn login(token: impl Into<String>, user: SessionUser) -> Result<Self, TypeConstraintError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self { token, user })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.user.role.can(capability)
    }

    /// Ends the session and hands back the token so it can be revoked remotely.
    pub fn logout(self) -> String {
        self.token
    }
}

#[cfg(test)]
pub(crate) fn test_session(role: Role) -> AuthSession {
    AuthSession::login(
        "token-123",
        SessionUser {
            id: RecordId::new("u1").unwrap(),
            name: "Test User".into(),
            email: "test@example.com".into(),
            role,
            avatar: None,
        },
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_token() {
        let user = test_session(Role::Student).user().clone();
        assert_eq!(
            AuthSession::login("  ", user),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn session_exposes_role_capabilities() {
        let session = test_session(Role::Instructor);
        assert_eq!(session.role(), Role::Instructor);
        assert!(session.can(Capability::RequestPayouts));
        assert!(!session.can(Capability::ManagePayouts));
    }

    #[test]
    fn logout_returns_token() {
        assert_eq!(test_session(Role::Admin).logout(), "token-123");
    }

    #[test]
    fn session_user_reads_backend_shape() {
        let user: SessionUser = serde_json::from_str(
            r#"{"_id":"abc","name":"Lan","email":"lan@example.com","role":"student","status":true}"#,
        )
        .unwrap();
        assert_eq!(user.id.as_str(), "abc");
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.avatar, None);
    }
}
