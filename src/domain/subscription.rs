use serde::{Deserialize, Serialize};

use crate::domain::types::{Identified, RecordId};

/// Link between a subscriber and an instructor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub subscriber_id: Option<String>,
    #[serde(default)]
    pub subscriber_name: Option<String>,
    #[serde(default)]
    pub is_subscribed: bool,
}

impl Identified for Subscription {
    fn id(&self) -> &RecordId {
        &self.id
    }
}
