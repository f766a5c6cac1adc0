use serde::Deserialize;

use crate::domain::cart::{CartItemRef, CartStatus, CartStatusChange};
use crate::domain::types::RecordId;

/// "Add to cart" button of the catalog and the course page.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub course_id: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Status change of a single cart item (pay or cancel).
#[derive(Debug, Deserialize)]
pub struct CartItemStatusForm {
    pub cart_no: String,
    pub status: CartStatus,
    #[serde(default)]
    pub next: Option<String>,
}

impl CartItemStatusForm {
    pub fn into_change(self, id: RecordId) -> CartStatusChange {
        CartStatusChange {
            status: self.status,
            items: vec![CartItemRef {
                id,
                cart_no: self.cart_no.trim().to_string(),
            }],
        }
    }
}
