use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Not authorized")]
    Unauthorized,

    #[error("Entity not found")]
    NotFound,

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Maps a non-success status and the backend's `message`, if any.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            _ => ApiError::Rejected {
                status: status.as_u16(),
                message: message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| format!("Request failed with status {status}")),
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<TypeConstraintError> for ApiError {
    fn from(err: TypeConstraintError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, None),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, Some("missing".into())),
            ApiError::NotFound
        ));
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, Some("Email exists".into()));
        assert_eq!(err.to_string(), "Email exists");
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, Some("  ".into()));
        assert_eq!(err.to_string(), "Request failed with status 502 Bad Gateway");
    }
}
