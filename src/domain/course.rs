use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    Amount, Identified, MediaUrl, RecordId, RichText, Title, TypeConstraintError,
};

/// Publication workflow of a course.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    New,
    WaitingApprove,
    Approve,
    Reject,
    Active,
    Inactive,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseStatus::New => "new",
            CourseStatus::WaitingApprove => "waiting_approve",
            CourseStatus::Approve => "approve",
            CourseStatus::Reject => "reject",
            CourseStatus::Active => "active",
            CourseStatus::Inactive => "inactive",
        }
    }

    /// Statuses an instructor may move a course into from `self`.
    pub fn instructor_transitions(self) -> &'static [CourseStatus] {
        match self {
            CourseStatus::New | CourseStatus::Reject => &[CourseStatus::WaitingApprove],
            CourseStatus::Approve | CourseStatus::Inactive => &[CourseStatus::Active],
            CourseStatus::Active => &[CourseStatus::Inactive],
            CourseStatus::WaitingApprove => &[],
        }
    }

    /// Statuses an administrator may move a course into from `self`.
    pub fn admin_transitions(self) -> &'static [CourseStatus] {
        match self {
            CourseStatus::WaitingApprove => &[CourseStatus::Approve, CourseStatus::Reject],
            _ => &[],
        }
    }
}

impl Display for CourseStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(CourseStatus::New),
            "waiting_approve" => Ok(CourseStatus::WaitingApprove),
            "approve" => Ok(CourseStatus::Approve),
            "reject" => Ok(CourseStatus::Reject),
            "active" => Ok(CourseStatus::Active),
            "inactive" => Ok(CourseStatus::Inactive),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown course status {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub status: CourseStatus,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub price_paid: Option<f64>,
    #[serde(default)]
    pub full_time: u32,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub is_purchased: bool,
    #[serde(default)]
    pub is_in_cart: bool,
    #[serde(default)]
    pub session_list: Vec<CourseSession>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Course {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Body of `POST /api/course` and `PUT /api/course/{id}`.
#[derive(Clone, Debug, Serialize)]
pub struct CoursePayload {
    pub name: Title,
    pub category_id: RecordId,
    pub description: RichText,
    pub content: RichText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<MediaUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<MediaUrl>,
    pub price: Amount,
    pub discount: Amount,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CourseStatusChange {
    pub course_id: RecordId,
    pub new_status: CourseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A chapter of a course.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CourseSession {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position_order: u32,
    #[serde(default)]
    pub full_time: u32,
    #[serde(default)]
    pub lesson_list: Vec<Lesson>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for CourseSession {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionPayload {
    pub name: Title,
    pub course_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub position_order: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Video,
    Text,
    Image,
}

impl LessonType {
    pub fn as_str(self) -> &'static str {
        match self {
            LessonType::Video => "video",
            LessonType::Text => "text",
            LessonType::Image => "image",
        }
    }
}

impl FromStr for LessonType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "video" => Ok(LessonType::Video),
            "text" => Ok(LessonType::Text),
            "image" => Ok(LessonType::Image),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown lesson type {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lesson {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub lesson_type: LessonType,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub session_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub full_time: u32,
    #[serde(default)]
    pub position_order: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Lesson {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LessonPayload {
    pub name: Title,
    pub course_id: RecordId,
    pub session_id: RecordId,
    pub lesson_type: LessonType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<MediaUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<MediaUrl>,
    pub full_time: u32,
    pub position_order: u32,
}

/// Audit entry written by the backend on every course status change.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CourseLog {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub old_status: String,
    pub new_status: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for CourseLog {
    fn id(&self) -> &RecordId {
        &self.id
    }
}
