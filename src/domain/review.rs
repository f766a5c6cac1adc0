use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Identified, Rating, RecordId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for Review {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Body of `POST /api/review` and `PUT /api/review/{id}`.
#[derive(Clone, Debug, Serialize)]
pub struct ReviewPayload {
    pub course_id: RecordId,
    pub comment: String,
    pub rating: Rating,
}
