use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, ApiResult, CartReader, CartWriter, Resource};
use crate::domain::cart::{CartItem, CartStatus, CartStatusChange};
use crate::domain::types::RecordId;
use crate::pagination::{Page, PageRequest};

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CartSearch {
    pub status: String,
    pub is_deleted: bool,
}

impl CartSearch {
    pub fn status(mut self, status: Option<CartStatus>) -> Self {
        self.status = status.map(|s| s.as_str().to_string()).unwrap_or_default();
        self
    }
}

pub struct CartItems;

impl Resource for CartItems {
    type Record = CartItem;
    type Condition = CartSearch;
    const SEARCH_PATH: &'static str = "/api/cart/search";
}

#[derive(Serialize)]
struct AddToCartBody<'a> {
    course_id: &'a RecordId,
}

#[async_trait]
impl CartReader for ApiClient {
    async fn search_cart(
        &self,
        condition: &CartSearch,
        page: PageRequest,
    ) -> ApiResult<Page<CartItem>> {
        self.search::<CartItems>(condition, page).await
    }
}

#[async_trait]
impl CartWriter for ApiClient {
    async fn add_to_cart(&self, course_id: &RecordId) -> ApiResult<()> {
        self.post_ack("/api/cart", &AddToCartBody { course_id }).await
    }

    async fn remove_cart_item(&self, id: &RecordId) -> ApiResult<()> {
        self.delete(&format!("/api/cart/{id}")).await
    }

    async fn update_cart_status(&self, change: &CartStatusChange) -> ApiResult<()> {
        self.put_ack("/api/cart/update-status", change).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_condition_wire_shape() {
        assert_eq!(
            serde_json::to_value(CartSearch::default().status(Some(CartStatus::New))).unwrap(),
            serde_json::json!({"status": "new", "is_deleted": false})
        );
    }
}
