use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Identified, RecordId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub purchase_no: String,
    pub status: String,
    #[serde(default)]
    pub cart_no: Option<String>,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub price_paid: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Purchase {
    fn id(&self) -> &RecordId {
        &self.id
    }
}
