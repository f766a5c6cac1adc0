//! Session transitions: login exchanges credentials for a token and the
//! profile behind it, logout revokes the token remotely.

use crate::api::auth::Credentials;
use crate::api::{ApiError, AuthApi};
use crate::domain::session::AuthSession;
use crate::forms::auth::LoginForm;
use crate::services::{ServiceError, ServiceResult};

pub async fn login<A>(api: &A, form: LoginForm) -> ServiceResult<AuthSession>
where
    A: AuthApi + ?Sized,
{
    let credentials = Credentials::try_from(form).map_err(|err| {
        log::error!("Failed to validate login form: {err}");
        ServiceError::from(err)
    })?;

    let token = api.login(&credentials).await.map_err(|err| {
        log::error!("Login failed for {}: {err}", credentials.email);
        match err {
            ApiError::Unauthorized => ServiceError::Form("Invalid email or password".to_string()),
            ApiError::Rejected { message, .. } => ServiceError::Form(message),
            other => ServiceError::from(other),
        }
    })?;

    let user = api.current_user(&token).await.map_err(|err| {
        log::error!("Failed to load profile after login: {err}");
        ServiceError::from(err)
    })?;

    log::info!("User {} logged in as {}", user.email, user.role);
    Ok(AuthSession::login(token, user)?)
}

/// Revokes the token remotely. A failure is logged only: the local session
/// is purged regardless.
pub async fn logout<A>(api: &A, session: AuthSession)
where
    A: AuthApi + ?Sized,
{
    let email = session.user().email.clone();
    if let Err(err) = api.logout().await {
        log::error!("Failed to revoke token of {email}: {err}");
    }
    session.logout();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::domain::role::Role;
    use crate::domain::session::{SessionUser, test_session};

    fn form(password: &str) -> LoginForm {
        LoginForm {
            email: "lan@example.com".into(),
            password: password.into(),
        }
    }

    fn profile() -> SessionUser {
        test_session(Role::Instructor).user().clone()
    }

    /// Ensures the fresh token is used to load the profile.
    #[actix_web::test]
    async fn login_builds_session() {
        let mut api = MockApi::new();
        api.expect_login()
            .withf(|credentials| credentials.email.as_str() == "lan@example.com")
            .times(1)
            .returning(|_| Ok("tok-1".to_string()));
        api.expect_current_user()
            .withf(|token| token == "tok-1")
            .times(1)
            .returning(|_| Ok(profile()));

        let session = login(&api, form("secret1")).await.unwrap();

        assert_eq!(session.token(), "tok-1");
        assert_eq!(session.role(), Role::Instructor);
    }

    #[actix_web::test]
    async fn wrong_password_is_a_form_error() {
        let mut api = MockApi::new();
        api.expect_login().returning(|_| Err(ApiError::Unauthorized));
        api.expect_current_user().times(0);

        let result = login(&api, form("wrong-pass")).await;
        assert!(matches!(result, Err(ServiceError::Form(m)) if m == "Invalid email or password"));
    }

    #[actix_web::test]
    async fn malformed_email_never_reaches_backend() {
        let mut api = MockApi::new();
        api.expect_login().times(0);
        let form = LoginForm {
            email: "nobody".into(),
            password: "secret1".into(),
        };

        assert!(matches!(login(&api, form).await, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn logout_tolerates_backend_failure() {
        let mut api = MockApi::new();
        api.expect_logout()
            .times(1)
            .returning(|| Err(ApiError::Transport("down".into())));

        logout(&api, test_session(Role::Student)).await;
    }
}
