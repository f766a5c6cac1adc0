//! Course authoring and moderation forms.

use serde::Deserialize;
use validator::Validate;

use crate::domain::course::{
    CoursePayload, CourseStatus, CourseStatusChange, LessonPayload, LessonType, SessionPayload,
};
use crate::domain::types::{Amount, MediaUrl, RecordId, RichText, Title};
use crate::forms::{FormError, blank_as_default, non_blank, parse_id};

#[derive(Debug, Deserialize, Validate)]
pub struct CourseForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub category_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// A free course ignores price and discount.
    #[serde(default)]
    pub is_free: bool,
    #[serde(default, deserialize_with = "blank_as_default")]
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Percent.
    #[serde(default, deserialize_with = "blank_as_default")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: f64,
}

impl TryFrom<CourseForm> for CoursePayload {
    type Error = FormError;

    fn try_from(form: CourseForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let (price, discount) = if form.is_free {
            (0.0, 0.0)
        } else {
            (form.price, form.discount)
        };
        Ok(Self {
            name: Title::new(form.name).map_err(|_| FormError::InvalidName)?,
            category_id: parse_id(&form.category_id)?,
            description: RichText::new(form.description),
            content: RichText::new(form.content),
            video_url: MediaUrl::optional(form.video_url.as_deref().unwrap_or_default())?,
            image_url: MediaUrl::optional(form.image_url.as_deref().unwrap_or_default())?,
            price: Amount::new(price)?,
            discount: Amount::new(discount)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CourseStatusForm {
    pub new_status: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub comment: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl CourseStatusForm {
    /// Rejecting a course requires a comment for the instructor.
    pub fn into_change(self, course_id: RecordId) -> Result<CourseStatusChange, FormError> {
        self.validate()?;
        let new_status: CourseStatus = self
            .new_status
            .parse()
            .map_err(|_| FormError::InvalidStatus)?;
        let comment = non_blank(self.comment);
        if new_status == CourseStatus::Reject && comment.is_none() {
            return Err(FormError::Invalid(
                "A reason is required to reject a course".to_string(),
            ));
        }
        Ok(CourseStatusChange {
            course_id,
            new_status,
            comment,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SessionForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_default")]
    pub position_order: u32,
}

impl SessionForm {
    pub fn into_payload(self, course_id: RecordId) -> Result<SessionPayload, FormError> {
        self.validate()?;
        Ok(SessionPayload {
            name: Title::new(self.name).map_err(|_| FormError::InvalidName)?,
            course_id,
            description: non_blank(self.description),
            position_order: self.position_order,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LessonForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub session_id: String,
    pub lesson_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Minutes.
    #[serde(default, deserialize_with = "blank_as_default")]
    pub full_time: u32,
    #[serde(default, deserialize_with = "blank_as_default")]
    pub position_order: u32,
}

impl LessonForm {
    /// A video lesson needs its video, an image lesson its image.
    pub fn into_payload(self, course_id: RecordId) -> Result<LessonPayload, FormError> {
        self.validate()?;
        let lesson_type: LessonType = self
            .lesson_type
            .parse()
            .map_err(|_| FormError::Invalid("unknown lesson type".to_string()))?;
        let video_url = MediaUrl::optional(self.video_url.as_deref().unwrap_or_default())?;
        let image_url = MediaUrl::optional(self.image_url.as_deref().unwrap_or_default())?;
        match lesson_type {
            LessonType::Video if video_url.is_none() => return Err(FormError::InvalidUrl),
            LessonType::Image if image_url.is_none() => return Err(FormError::InvalidUrl),
            _ => {}
        }
        Ok(LessonPayload {
            name: Title::new(self.name).map_err(|_| FormError::InvalidName)?,
            course_id,
            session_id: parse_id(&self.session_id)?,
            lesson_type,
            description: non_blank(self.description),
            video_url,
            image_url,
            full_time: self.full_time,
            position_order: self.position_order,
        })
    }
}
