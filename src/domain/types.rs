//! Strongly-typed value objects used by domain entities and forms.
//!
//! Values coming from forms pass through these wrappers before they are sent
//! to the backend, so a payload built from them is known to satisfy the basic
//! shape the remote contract expects.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{ValidateEmail, ValidateUrl};

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Provided url failed format validation.
    #[error("invalid url address")]
    InvalidUrl,
    /// Rating outside of the 1..=5 range.
    #[error("rating must be between 1 and 5")]
    InvalidRating,
    /// Negative monetary amount.
    #[error("amount cannot be negative")]
    NegativeAmount,
}

/// Opaque backend identifier (the `_id` of every record).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wraps a trimmed, non-empty identifier.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RecordId {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Anything rendered as a table row is keyed by its backend identifier.
pub trait Identified {
    fn id(&self) -> &RecordId;
}

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = email.into().trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Macro generating trimmed, non-empty string wrappers.
macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(TypeConstraintError::EmptyString);
                }
                Ok(Self(trimmed))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

non_empty_string_newtype!(DisplayName, "Person name enforcing non-empty values.");
non_empty_string_newtype!(Title, "Name of a course, session, lesson, category or blog.");
non_empty_string_newtype!(Password, "Raw password forwarded to the backend once.");

/// Rich text sanitized with `ammonia` before it is sent or rendered.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct RichText(String);

impl RichText {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(ammonia::clean(value.into().trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Normalizes a phone number string to E.164 format.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Ok(Self(normalize_phone_to_e164(&value.into())?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Absolute URL pointing at an image or video hosted elsewhere.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MediaUrl(String);

impl MediaUrl {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let url = value.into().trim().to_string();
        if url.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !url.validate_url() {
            return Err(TypeConstraintError::InvalidUrl);
        }
        Ok(Self(url))
    }

    /// Empty input becomes `None`; anything else must be a valid url.
    pub fn optional(value: &str) -> Result<Option<Self>, TypeConstraintError> {
        if value.trim().is_empty() {
            Ok(None)
        } else {
            Self::new(value).map(Some)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Review score in the 1..=5 range.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, TypeConstraintError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidRating)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Non-negative amount in đồng.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd, Default)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeAmount)
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_is_trimmed_and_non_empty() {
        assert_eq!(RecordId::new("  abc ").unwrap().as_str(), "abc");
        assert_eq!(RecordId::new("   "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn record_id_serializes_as_plain_string() {
        let id = RecordId::new("66a1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"66a1\"");
    }

    #[test]
    fn email_is_normalized() {
        let email = Email::new("  Teacher@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "teacher@example.com");
        assert_eq!(Email::new("nope"), Err(TypeConstraintError::InvalidEmail));
    }

    #[test]
    fn title_rejects_blank() {
        assert!(Title::new("Algebra I").is_ok());
        assert_eq!(Title::new(" \t"), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn rich_text_strips_scripts() {
        let text = RichText::new("<p>Hello</p><script>alert(1)</script>");
        assert_eq!(text.as_str(), "<p>Hello</p>");
    }

    #[test]
    fn phone_is_normalized_to_e164() {
        let phone = PhoneNumber::new("+84 912 345 678").unwrap();
        assert_eq!(phone.as_str(), "+84912345678");
        assert_eq!(
            PhoneNumber::new("not a phone"),
            Err(TypeConstraintError::InvalidPhone)
        );
    }

    #[test]
    fn media_url_optional_accepts_blank() {
        assert_eq!(MediaUrl::optional("  ").unwrap(), None);
        assert!(MediaUrl::optional("https://cdn.example.com/a.png").unwrap().is_some());
        assert_eq!(
            MediaUrl::optional("not a url"),
            Err(TypeConstraintError::InvalidUrl)
        );
    }

    #[test]
    fn rating_and_amount_bounds() {
        assert!(Rating::new(5).is_ok());
        assert_eq!(Rating::new(0), Err(TypeConstraintError::InvalidRating));
        assert_eq!(Amount::new(-1.0), Err(TypeConstraintError::NegativeAmount));
        assert_eq!(Amount::new(1500.0).unwrap().get(), 1500.0);
    }
}
