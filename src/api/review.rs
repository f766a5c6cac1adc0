use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, ApiResult, Resource, ReviewReader, ReviewWriter};
use crate::domain::review::{Review, ReviewPayload};
use crate::domain::types::RecordId;
use crate::pagination::{Page, PageRequest};

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ReviewSearch {
    pub course_id: String,
    /// `0` matches every rating.
    pub rating: u8,
    pub is_instructor: bool,
    pub is_rating_order: bool,
    pub is_deleted: bool,
}

impl ReviewSearch {
    /// Reviews left on the caller's own courses.
    pub fn for_instructor() -> Self {
        Self {
            is_instructor: true,
            ..Self::default()
        }
    }

    pub fn course(mut self, course_id: impl AsRef<str>) -> Self {
        self.course_id = course_id.as_ref().trim().to_string();
        self
    }

    pub fn rating(mut self, rating: Option<u8>) -> Self {
        self.rating = rating.filter(|r| (1..=5).contains(r)).unwrap_or(0);
        self
    }
}

pub struct Reviews;

impl Resource for Reviews {
    type Record = Review;
    type Condition = ReviewSearch;
    const SEARCH_PATH: &'static str = "/api/review/search";
}

#[async_trait]
impl ReviewReader for ApiClient {
    async fn search_reviews(
        &self,
        condition: &ReviewSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Review>> {
        self.search::<Reviews>(condition, page).await
    }
}

#[async_trait]
impl ReviewWriter for ApiClient {
    async fn create_review(&self, payload: &ReviewPayload) -> ApiResult<Review> {
        self.post_json("/api/review", payload).await
    }

    async fn update_review(&self, id: &RecordId, payload: &ReviewPayload) -> ApiResult<Review> {
        self.put_json(&format!("/api/review/{id}"), payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_rating_filter_means_any() {
        assert_eq!(ReviewSearch::default().rating(Some(9)).rating, 0);
        assert_eq!(ReviewSearch::default().rating(Some(4)).rating, 4);
        assert!(ReviewSearch::for_instructor().is_instructor);
    }
}
