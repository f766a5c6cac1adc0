use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Identified, RecordId, Title};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_category_id: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Category {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Body of `POST /api/category` and `PUT /api/category/{id}`.
#[derive(Clone, Debug, Serialize)]
pub struct CategoryPayload {
    pub name: Title,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_category_id: Option<RecordId>,
}
