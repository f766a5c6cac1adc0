use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, ApiResult, PayoutReader, PayoutWriter, Resource};
use crate::domain::payout::{NewPayout, Payout, PayoutStatus, PayoutStatusChange};
use crate::domain::types::RecordId;
use crate::pagination::{Page, PageRequest};

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct PayoutSearch {
    pub payout_no: String,
    pub instructor_id: String,
    pub status: String,
    /// Restricts the search to the caller's own payouts.
    pub is_instructor: bool,
    pub is_delete: bool,
}

impl PayoutSearch {
    pub fn payout_no(mut self, payout_no: impl AsRef<str>) -> Self {
        self.payout_no = payout_no.as_ref().trim().to_string();
        self
    }

    pub fn status(mut self, status: Option<PayoutStatus>) -> Self {
        self.status = status.map(|s| s.as_str().to_string()).unwrap_or_default();
        self
    }

    pub fn own(mut self, is_instructor: bool) -> Self {
        self.is_instructor = is_instructor;
        self
    }
}

pub struct Payouts;

impl Resource for Payouts {
    type Record = Payout;
    type Condition = PayoutSearch;
    const SEARCH_PATH: &'static str = "/api/payout/search";
}

#[async_trait]
impl PayoutReader for ApiClient {
    async fn search_payouts(
        &self,
        condition: &PayoutSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Payout>> {
        self.search::<Payouts>(condition, page).await
    }
}

#[async_trait]
impl PayoutWriter for ApiClient {
    async fn create_payout(&self, payout: &NewPayout) -> ApiResult<Payout> {
        self.post_json("/api/payout", payout).await
    }

    async fn update_payout_status(
        &self,
        id: &RecordId,
        change: &PayoutStatusChange,
    ) -> ApiResult<()> {
        self.put_ack(&format!("/api/payout/update-status/{id}"), change)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructor_payout_condition() {
        let condition = PayoutSearch::default()
            .own(true)
            .status(Some(PayoutStatus::RequestPayout));
        assert_eq!(
            serde_json::to_value(&condition).unwrap(),
            serde_json::json!({
                "payout_no": "",
                "instructor_id": "",
                "status": "request_payout",
                "is_instructor": true,
                "is_delete": false
            })
        );
    }
}
