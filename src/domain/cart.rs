use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Identified, RecordId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    New,
    Cancel,
    WaitingPaid,
    Completed,
}

impl CartStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CartStatus::New => "new",
            CartStatus::Cancel => "cancel",
            CartStatus::WaitingPaid => "waiting_paid",
            CartStatus::Completed => "completed",
        }
    }

    /// Items still sitting in the cart and eligible for checkout.
    pub fn is_open(self) -> bool {
        matches!(self, CartStatus::New | CartStatus::Cancel)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub cart_no: String,
    pub status: CartStatus,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub course_image: Option<String>,
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

impl Identified for CartItem {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CartItemRef {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub cart_no: String,
}

/// Body of `PUT /api/cart/update-status`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CartStatusChange {
    pub status: CartStatus,
    pub items: Vec<CartItemRef>,
}

impl CartStatusChange {
    /// Moves every open item of `items` into `status`.
    pub fn for_open_items(status: CartStatus, items: &[CartItem]) -> Self {
        Self {
            status,
            items: items
                .iter()
                .filter(|item| item.status.is_open())
                .map(|item| CartItemRef {
                    id: item.id.clone(),
                    cart_no: item.cart_no.clone(),
                })
                .collect(),
        }
    }
}
