use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Identified, MediaUrl, RecordId, RichText, Title};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Blog {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BlogPayload {
    pub name: Title,
    pub category_id: RecordId,
    pub image_url: MediaUrl,
    pub description: String,
    pub content: RichText,
}
