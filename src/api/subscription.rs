use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, ApiResult, Resource, SubscriptionReader, SubscriptionWriter};
use crate::domain::subscription::Subscription;
use crate::domain::types::RecordId;
use crate::pagination::{Page, PageRequest};

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct SubscriptionSearch {
    pub keyword: String,
    pub is_delete: bool,
}

impl SubscriptionSearch {
    pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.keyword = keyword.as_ref().trim().to_string();
        self
    }
}

pub struct Subscribers;

impl Resource for Subscribers {
    type Record = Subscription;
    type Condition = SubscriptionSearch;
    const SEARCH_PATH: &'static str = "/api/subscription/search-for-instructor";
}

pub struct Subscriptions;

impl Resource for Subscriptions {
    type Record = Subscription;
    type Condition = SubscriptionSearch;
    const SEARCH_PATH: &'static str = "/api/subscription/search-for-subscriber";
}

#[derive(Serialize)]
struct SubscribeBody<'a> {
    instructor_id: &'a RecordId,
}

#[async_trait]
impl SubscriptionReader for ApiClient {
    async fn search_subscribers(
        &self,
        condition: &SubscriptionSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Subscription>> {
        self.search::<Subscribers>(condition, page).await
    }

    async fn search_subscriptions(
        &self,
        condition: &SubscriptionSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Subscription>> {
        self.search::<Subscriptions>(condition, page).await
    }
}

#[async_trait]
impl SubscriptionWriter for ApiClient {
    async fn toggle_subscription(&self, instructor_id: &RecordId) -> ApiResult<()> {
        self.post_ack("/api/subscription", &SubscribeBody { instructor_id })
            .await
    }
}
