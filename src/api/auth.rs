use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError, ApiResult, AuthApi};
use crate::domain::session::SessionUser;
use crate::domain::types::{Email, Password};

/// Body of `POST /api/auth`.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: Email,
    pub password: Password,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> ApiResult<String> {
        let response: TokenResponse = self.post_json("/api/auth", credentials).await?;
        response
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ApiError::Decode("login response carried no token".to_string()))
    }

    async fn current_user(&self, token: &str) -> ApiResult<SessionUser> {
        self.with_token(Some(token)).get_json("/api/auth").await
    }

    async fn logout(&self) -> ApiResult<()> {
        self.get_ack("/api/auth/logout").await
    }
}
