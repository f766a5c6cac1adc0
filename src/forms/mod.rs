//! Form definitions backing the HTML routes.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::{RecordId, TypeConstraintError};

pub mod auth;
pub mod blogs;
pub mod cart;
pub mod categories;
pub mod courses;
pub mod payouts;
pub mod reviews;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid identifier")]
    InvalidId,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid url")]
    InvalidUrl,

    #[error("invalid status")]
    InvalidStatus,

    #[error("invalid role")]
    InvalidRole,

    #[error("rating must be between 1 and 5")]
    InvalidRating,

    #[error("amount cannot be negative")]
    InvalidAmount,

    #[error("{0}")]
    Invalid(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            TypeConstraintError::InvalidUrl => FormError::InvalidUrl,
            TypeConstraintError::InvalidRating => FormError::InvalidRating,
            TypeConstraintError::NegativeAmount => FormError::InvalidAmount,
            other => FormError::Invalid(other.to_string()),
        }
    }
}

/// Body of a row action that carries nothing but the page to return to.
#[derive(Debug, Default, Deserialize)]
pub struct ActionForm {
    #[serde(default)]
    pub next: Option<String>,
}

pub(crate) fn parse_id(value: &str) -> Result<RecordId, FormError> {
    RecordId::new(value).map_err(|_| FormError::InvalidId)
}

/// Empty optional inputs arrive as `""`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Numeric inputs left empty take the type's default.
pub(crate) fn blank_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(value) => value.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Numbers {
        #[serde(default, deserialize_with = "blank_as_default")]
        price: f64,
        #[serde(default, deserialize_with = "blank_as_default")]
        position: u32,
    }

    #[test]
    fn blank_numbers_fall_back_to_default() {
        let numbers: Numbers = serde_html_form::from_str("price=&position=3").unwrap();
        assert_eq!(numbers.price, 0.0);
        assert_eq!(numbers.position, 3);

        let numbers: Numbers = serde_html_form::from_str("price=12.5").unwrap();
        assert_eq!(numbers.price, 12.5);
        assert_eq!(numbers.position, 0);

        assert!(serde_html_form::from_str::<Numbers>("price=abc").is_err());
    }
}
