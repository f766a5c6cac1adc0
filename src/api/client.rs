//! `reqwest` implementation of the remote fetch adapters.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::Resource;
use crate::api::errors::{ApiError, ApiResult};
use crate::pagination::{Page, PageRequest, SearchRequest};

/// Some deployments wrap payloads as `{ "data": ... }`, others return them
/// bare; both are accepted.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

/// HTTP client bound to the backend base url and, optionally, a bearer token.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Same connection pool, different credentials. `None` selects the
    /// anonymous variant used for public catalog reads.
    pub fn with_token(&self, token: Option<&str>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
        log::warn!("Backend answered {status}: {message:?}");
        Err(ApiError::from_status(status, message))
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
        let response = Self::check(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.into_inner())
    }

    async fn send_ack(builder: RequestBuilder) -> ApiResult<()> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    /// `POST <R::SEARCH_PATH> { searchCondition, pageInfo }`.
    pub async fn search<R: Resource>(
        &self,
        condition: &R::Condition,
        page: PageRequest,
    ) -> ApiResult<Page<R::Record>> {
        self.search_at(R::SEARCH_PATH, condition, page).await
    }

    /// Search against an endpoint picked at runtime, e.g. by role.
    pub async fn search_at<C, T>(
        &self,
        path: &str,
        condition: &C,
        page: PageRequest,
    ) -> ApiResult<Page<T>>
    where
        C: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = SearchRequest {
            search_condition: condition,
            page_info: page,
        };
        log::debug!(
            "search {path} page {} size {}",
            page.page_num(),
            page.page_size()
        );
        Self::send(self.request(Method::POST, path).json(&body)).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Self::send(self.request(Method::GET, path)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Self::send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Self::send(self.request(Method::PUT, path).json(body)).await
    }

    /// Mutation whose response body is irrelevant.
    pub async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        Self::send_ack(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        Self::send_ack(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn get_ack(&self, path: &str) -> ApiResult<()> {
        Self::send_ack(self.request(Method::GET, path)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        Self::send_ack(self.request(Method::DELETE, path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageInfo;

    #[test]
    fn envelope_accepts_wrapped_and_bare() {
        let wrapped: Envelope<Page<Value>> = serde_json::from_str(
            r#"{"success":true,"data":{"pageData":[],"pageInfo":{"pageNum":1,"pageSize":10,"totalItems":0,"totalPages":0}}}"#,
        )
        .unwrap();
        let bare: Envelope<Page<Value>> = serde_json::from_str(
            r#"{"pageData":[],"pageInfo":{"pageNum":1,"pageSize":10,"totalItems":0,"totalPages":0}}"#,
        )
        .unwrap();
        let expected = PageInfo {
            page_num: 1,
            page_size: 10,
            total_items: 0,
            total_pages: 0,
        };
        assert_eq!(wrapped.into_inner().page_info, expected);
        assert_eq!(bare.into_inner().page_info, expected);
    }

    #[test]
    fn with_token_ignores_blank_tokens() {
        let client = ApiClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert!(!client.with_token(Some("  ")).is_authenticated());
        assert!(client.with_token(Some("abc")).is_authenticated());
        assert!(!client.with_token(None).is_authenticated());
        assert_eq!(client.base_url, "http://localhost:5000");
    }
}
