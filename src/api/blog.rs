use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, ApiResult, BlogReader, BlogWriter, Resource};
use crate::domain::blog::{Blog, BlogPayload};
use crate::domain::types::RecordId;
use crate::pagination::{Page, PageRequest};

/// Shared by the admin and the public blog searches.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct BlogSearch {
    pub category_id: String,
    pub is_deleted: bool,
}

impl BlogSearch {
    pub fn category(mut self, category_id: impl AsRef<str>) -> Self {
        self.category_id = category_id.as_ref().trim().to_string();
        self
    }
}

pub struct Blogs;

impl Resource for Blogs {
    type Record = Blog;
    type Condition = BlogSearch;
    const SEARCH_PATH: &'static str = "/api/blog/search";
}

pub struct CatalogBlogs;

impl Resource for CatalogBlogs {
    type Record = Blog;
    type Condition = BlogSearch;
    const SEARCH_PATH: &'static str = "/api/client/blog/search";
}

#[async_trait]
impl BlogReader for ApiClient {
    async fn search_blogs(
        &self,
        condition: &BlogSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Blog>> {
        self.search::<Blogs>(condition, page).await
    }

    async fn search_catalog_blogs(
        &self,
        condition: &BlogSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Blog>> {
        self.search::<CatalogBlogs>(condition, page).await
    }

    async fn get_catalog_blog(&self, id: &RecordId) -> ApiResult<Blog> {
        self.get_json(&format!("/api/client/blog/{id}")).await
    }
}

#[async_trait]
impl BlogWriter for ApiClient {
    async fn create_blog(&self, payload: &BlogPayload) -> ApiResult<Blog> {
        self.post_json("/api/blog", payload).await
    }

    async fn update_blog(&self, id: &RecordId, payload: &BlogPayload) -> ApiResult<Blog> {
        self.put_json(&format!("/api/blog/{id}"), payload).await
    }

    async fn delete_blog(&self, id: &RecordId) -> ApiResult<()> {
        self.delete(&format!("/api/blog/{id}")).await
    }
}
