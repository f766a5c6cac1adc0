use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, ApiResult, CategoryReader, CategoryWriter, Resource};
use crate::domain::category::{Category, CategoryPayload};
use crate::domain::types::RecordId;
use crate::pagination::{Page, PageRequest};

/// `searchCondition` of `/api/category/search`.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CategorySearch {
    pub keyword: String,
    /// Parent category id.
    pub category: String,
    pub status: String,
    pub is_deleted: bool,
}

impl CategorySearch {
    pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.keyword = keyword.as_ref().trim().to_string();
        self
    }

    pub fn parent(mut self, category: impl AsRef<str>) -> Self {
        self.category = category.as_ref().trim().to_string();
        self
    }

    pub fn deleted(mut self, is_deleted: bool) -> Self {
        self.is_deleted = is_deleted;
        self
    }
}

/// `searchCondition` of the public `/api/client/category/search`.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CatalogCategorySearch {
    pub keyword: String,
    pub is_delete: bool,
}

pub struct Categories;

impl Resource for Categories {
    type Record = Category;
    type Condition = CategorySearch;
    const SEARCH_PATH: &'static str = "/api/category/search";
}

pub struct CatalogCategories;

impl Resource for CatalogCategories {
    type Record = Category;
    type Condition = CatalogCategorySearch;
    const SEARCH_PATH: &'static str = "/api/client/category/search";
}

#[async_trait]
impl CategoryReader for ApiClient {
    async fn search_categories(
        &self,
        condition: &CategorySearch,
        page: PageRequest,
    ) -> ApiResult<Page<Category>> {
        self.search::<Categories>(condition, page).await
    }

    async fn search_catalog_categories(
        &self,
        condition: &CatalogCategorySearch,
        page: PageRequest,
    ) -> ApiResult<Page<Category>> {
        self.search::<CatalogCategories>(condition, page).await
    }
}

#[async_trait]
impl CategoryWriter for ApiClient {
    async fn create_category(&self, payload: &CategoryPayload) -> ApiResult<Category> {
        self.post_json("/api/category", payload).await
    }

    async fn update_category(
        &self,
        id: &RecordId,
        payload: &CategoryPayload,
    ) -> ApiResult<Category> {
        self.put_json(&format!("/api/category/{id}"), payload).await
    }

    async fn delete_category(&self, id: &RecordId) -> ApiResult<()> {
        self.delete(&format!("/api/category/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_condition_defaults() {
        assert_eq!(
            serde_json::to_value(CategorySearch::default().keyword(" web ")).unwrap(),
            serde_json::json!({"keyword": "web", "category": "", "status": "", "is_deleted": false})
        );
        assert_eq!(
            serde_json::to_value(CatalogCategorySearch::default()).unwrap(),
            serde_json::json!({"keyword": "", "is_delete": false})
        );
    }
}
