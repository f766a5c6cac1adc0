//! Forms posted from the user and instructor-request screens.

use serde::Deserialize;
use validator::Validate;

use crate::domain::role::Role;
use crate::domain::types::{DisplayName, Email, MediaUrl, Password, PhoneNumber, RecordId};
use crate::domain::user::{
    InstructorReview, NewUser, PasswordChange, ReviewDecision, RoleChange, StatusChange,
    UpdateAccount,
};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize, Validate)]
/// Admin-created account.
pub struct NewUserForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
}

impl TryFrom<NewUserForm> for NewUser {
    type Error = FormError;

    fn try_from(form: NewUserForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let role: Role = form.role.parse().map_err(|_| FormError::InvalidRole)?;
        let phone_number = non_blank(form.phone_number)
            .map(PhoneNumber::new)
            .transpose()?;
        // Instructors must be reachable by phone.
        if role == Role::Instructor && phone_number.is_none() {
            return Err(FormError::InvalidPhoneNumber);
        }
        Ok(Self {
            name: DisplayName::new(form.name)?,
            email: Email::new(form.email)?,
            password: Password::new(form.password)?,
            role,
            description: non_blank(form.description),
            phone_number,
            avatar: MediaUrl::optional(form.avatar.as_deref().unwrap_or_default())?,
            video: MediaUrl::optional(form.video.as_deref().unwrap_or_default())?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: bool,
    #[serde(default)]
    pub next: Option<String>,
}

impl StatusForm {
    pub fn into_change(self, user_id: RecordId) -> StatusChange {
        StatusChange {
            user_id,
            status: self.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: String,
    #[serde(default)]
    pub next: Option<String>,
}

impl RoleForm {
    pub fn into_change(self, user_id: RecordId) -> Result<RoleChange, FormError> {
        Ok(RoleChange {
            user_id,
            role: self.role.parse().map_err(|_| FormError::InvalidRole)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewInstructorForm {
    pub decision: ReviewDecision,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub comment: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl ReviewInstructorForm {
    /// A rejection must explain itself.
    pub fn into_review(self, user_id: RecordId) -> Result<InstructorReview, FormError> {
        self.validate()?;
        let comment = non_blank(self.comment);
        if self.decision == ReviewDecision::Reject && comment.is_none() {
            return Err(FormError::Invalid(
                "A reason is required to reject an instructor".to_string(),
            ));
        }
        Ok(InstructorReview {
            user_id,
            status: self.decision,
            comment,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AccountForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl TryFrom<AccountForm> for UpdateAccount {
    type Error = FormError;

    fn try_from(form: AccountForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: DisplayName::new(form.name)?,
            description: non_blank(form.description),
            phone_number: non_blank(form.phone_number)
                .map(PhoneNumber::new)
                .transpose()?,
            avatar: MediaUrl::optional(form.avatar.as_deref().unwrap_or_default())?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordForm {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 6))]
    pub new_password: String,
    #[validate(must_match(other = "new_password"))]
    pub confirm_password: String,
}

impl PasswordForm {
    pub fn into_change(self, user_id: RecordId) -> Result<PasswordChange, FormError> {
        self.validate()?;
        Ok(PasswordChange {
            user_id,
            old_password: Password::new(self.old_password)?,
            new_password: Password::new(self.new_password)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user_form(role: &str, phone: Option<&str>) -> NewUserForm {
        NewUserForm {
            name: "Lan".into(),
            email: "lan@example.com".into(),
            password: "secret1".into(),
            role: role.into(),
            description: Some("  ".into()),
            phone_number: phone.map(str::to_string),
            avatar: Some(String::new()),
            video: None,
        }
    }

    #[test]
    fn new_student_needs_no_phone() {
        let user = NewUser::try_from(new_user_form("student", None)).unwrap();
        assert_eq!(user.role, Role::Student);
        assert_eq!(user.description, None);
        assert_eq!(user.avatar, None);
    }

    #[test]
    fn new_instructor_requires_phone() {
        assert!(matches!(
            NewUser::try_from(new_user_form("instructor", None)),
            Err(FormError::InvalidPhoneNumber)
        ));
        let user = NewUser::try_from(new_user_form("instructor", Some("+84 912 345 678"))).unwrap();
        assert_eq!(user.phone_number.unwrap().as_str(), "+84912345678");
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(matches!(
            NewUser::try_from(new_user_form("guest", None)),
            Err(FormError::InvalidRole)
        ));
    }

    #[test]
    fn rejection_requires_comment() {
        let id = RecordId::new("u9").unwrap();
        let form = ReviewInstructorForm {
            decision: ReviewDecision::Reject,
            comment: Some(" ".into()),
            next: None,
        };
        assert!(form.into_review(id.clone()).is_err());

        let form = ReviewInstructorForm {
            decision: ReviewDecision::Approve,
            comment: None,
            next: None,
        };
        assert_eq!(form.into_review(id).unwrap().status, ReviewDecision::Approve);
    }

    #[test]
    fn password_confirmation_must_match() {
        let id = RecordId::new("u1").unwrap();
        let form = PasswordForm {
            old_password: "old".into(),
            new_password: "newpass".into(),
            confirm_password: "other".into(),
        };
        assert!(form.into_change(id).is_err());
    }
}
