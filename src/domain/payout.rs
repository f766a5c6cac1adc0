use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Identified, RecordId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    New,
    RequestPayout,
    Completed,
    Rejected,
}

impl PayoutStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PayoutStatus::New => "new",
            PayoutStatus::RequestPayout => "request_payout",
            PayoutStatus::Completed => "completed",
            PayoutStatus::Rejected => "rejected",
        }
    }
}

/// Purchase settled by a payout.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PayoutTransaction {
    #[serde(rename = "_id", default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub purchase_id: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub price_paid: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payout {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub payout_no: String,
    pub status: PayoutStatus,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub instructor_email: Option<String>,
    #[serde(default)]
    pub transactions: Vec<PayoutTransaction>,
    #[serde(default)]
    pub balance_origin: f64,
    #[serde(default)]
    pub balance_instructor_paid: f64,
    #[serde(default)]
    pub balance_instructor_received: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Payout {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PayoutTransactionRef {
    pub purchase_id: RecordId,
}

/// Body of `POST /api/payout`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewPayout {
    pub transactions: Vec<PayoutTransactionRef>,
}

impl NewPayout {
    pub fn from_purchases(purchase_ids: Vec<RecordId>) -> Self {
        Self {
            transactions: purchase_ids
                .into_iter()
                .map(|purchase_id| PayoutTransactionRef { purchase_id })
                .collect(),
        }
    }
}

/// Body of `PUT /api/payout/update-status/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PayoutStatusChange {
    pub status: PayoutStatus,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_payout_wraps_purchase_ids() {
        let payout = NewPayout::from_purchases(vec![
            RecordId::new("p1").unwrap(),
            RecordId::new("p2").unwrap(),
        ]);
        assert_eq!(
            serde_json::to_value(&payout).unwrap(),
            serde_json::json!({"transactions": [{"purchase_id": "p1"}, {"purchase_id": "p2"}]})
        );
    }
}
