//! Business workflows behind the routes. Every service takes the adapter as
//! a generic so tests can substitute `MockApi`.

use std::future::Future;

use thiserror::Error;

use crate::api::{ApiError, ApiResult, Resource};
use crate::browser::{FetchOutcome, ResourceBrowser};
use crate::domain::role::Capability;
use crate::domain::session::AuthSession;
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::pagination::{Page, PageRequest};

pub mod auth;
pub mod blogs;
pub mod cart;
pub mod catalog;
pub mod categories;
pub mod courses;
pub mod payouts;
pub mod purchases;
pub mod reviews;
pub mod subscriptions;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The role lacks the capability.
    #[error("unauthorized")]
    Unauthorized,

    /// The backend no longer accepts the session token.
    #[error("session expired")]
    SessionExpired,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error("{0}")]
    Upstream(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => ServiceError::SessionExpired,
            ApiError::NotFound => ServiceError::NotFound,
            ApiError::Validation(message) => ServiceError::Form(message),
            other => ServiceError::Upstream(other.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

pub fn ensure_capability(session: &AuthSession, capability: Capability) -> ServiceResult<()> {
    if session.can(capability) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Mounts a browser and performs its first fetch. A failed fetch stays on the
/// browser as a notice; only an expired session aborts.
pub(crate) async fn browse<R, F, Fut>(
    condition: R::Condition,
    request: PageRequest,
    fetch: F,
) -> ServiceResult<ResourceBrowser<R>>
where
    R: Resource,
    F: FnOnce(R::Condition, PageRequest) -> Fut,
    Fut: Future<Output = ApiResult<Page<R::Record>>>,
{
    let mut browser = ResourceBrowser::<R>::new(condition, request);
    let ticket = browser.mount();
    match browser.load(ticket, fetch).await {
        FetchOutcome::Failed(ApiError::Unauthorized) => Err(ServiceError::SessionExpired),
        _ => Ok(browser),
    }
}

/// Logs a failed mutation and converts it.
pub(crate) fn mutation_failed(action: &str, err: ApiError) -> ServiceError {
    log::error!("Failed to {action}: {err}");
    ServiceError::from(err)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::pagination::{Page, PageInfo};

    pub fn page_of<T>(records: Vec<T>, page_num: usize, page_size: usize, total: usize) -> Page<T> {
        Page {
            page_data: records,
            page_info: PageInfo {
                page_num,
                page_size,
                total_items: total,
                total_pages: total.div_ceil(page_size),
            },
        }
    }
}
