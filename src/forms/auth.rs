use serde::Deserialize;
use validator::Validate;

use crate::api::auth::Credentials;
use crate::domain::types::{Email, Password};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            email: Email::new(form.email)?,
            password: Password::new(form.password)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_form_normalizes_email() {
        let credentials = Credentials::try_from(LoginForm {
            email: "Admin@Example.com".into(),
            password: "secret".into(),
        })
        .unwrap();
        assert_eq!(credentials.email.as_str(), "admin@example.com");
    }

    #[test]
    fn login_form_rejects_bad_email() {
        assert!(
            Credentials::try_from(LoginForm {
                email: "nope".into(),
                password: "secret".into(),
            })
            .is_err()
        );
    }
}
