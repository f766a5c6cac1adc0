//! Remote fetch adapters: one async call per resource/action pair.
//!
//! Services depend on the reader/writer traits below, never on
//! [`ApiClient`] directly, so they can be exercised against `MockApi`.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::blog::{Blog, BlogPayload};
use crate::domain::cart::{CartItem, CartStatusChange};
use crate::domain::category::{Category, CategoryPayload};
use crate::domain::course::{
    Course, CourseLog, CoursePayload, CourseSession, CourseStatusChange, Lesson, LessonPayload,
    SessionPayload,
};
use crate::domain::payout::{NewPayout, Payout, PayoutStatusChange};
use crate::domain::purchase::Purchase;
use crate::domain::review::{Review, ReviewPayload};
use crate::domain::session::SessionUser;
use crate::domain::subscription::Subscription;
use crate::domain::types::{Identified, RecordId};
use crate::domain::user::{
    InstructorReview, NewUser, PasswordChange, RoleChange, StatusChange, UpdateAccount, User,
};
use crate::pagination::{Page, PageRequest};

pub mod auth;
pub mod blog;
pub mod cart;
pub mod category;
pub mod client;
pub mod course;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod payout;
pub mod purchase;
pub mod review;
pub mod subscription;
pub mod user;

pub use client::ApiClient;
pub use errors::{ApiError, ApiResult};

use auth::Credentials;
use blog::BlogSearch;
use cart::CartSearch;
use category::{CatalogCategorySearch, CategorySearch};
use course::{CatalogCourseSearch, CourseLogSearch, CourseSearch, LessonSearch, SessionSearch};
use payout::PayoutSearch;
use purchase::{PurchaseScope, PurchaseSearch};
use review::ReviewSearch;
use subscription::SubscriptionSearch;
use user::UserSearch;

/// A searchable backend collection.
pub trait Resource {
    type Record: DeserializeOwned + Identified + Send;
    /// Filter payload; `Default` yields the full field set with neutral values.
    type Condition: Serialize + Clone + PartialEq + Default + Send + Sync;
    const SEARCH_PATH: &'static str;
}

#[async_trait]
pub trait UserReader {
    async fn search_users(&self, condition: &UserSearch, page: PageRequest)
    -> ApiResult<Page<User>>;
    async fn get_user(&self, id: &RecordId) -> ApiResult<User>;
}

#[async_trait]
pub trait UserWriter {
    async fn create_user(&self, new_user: &NewUser) -> ApiResult<User>;
    async fn update_account(&self, id: &RecordId, updates: &UpdateAccount) -> ApiResult<User>;
    async fn change_user_status(&self, change: &StatusChange) -> ApiResult<()>;
    async fn change_user_role(&self, change: &RoleChange) -> ApiResult<()>;
    async fn delete_user(&self, id: &RecordId) -> ApiResult<()>;
    async fn review_instructor(&self, review: &InstructorReview) -> ApiResult<()>;
    async fn change_password(&self, change: &PasswordChange) -> ApiResult<()>;
}

#[async_trait]
pub trait CategoryReader {
    async fn search_categories(
        &self,
        condition: &CategorySearch,
        page: PageRequest,
    ) -> ApiResult<Page<Category>>;
    async fn search_catalog_categories(
        &self,
        condition: &CatalogCategorySearch,
        page: PageRequest,
    ) -> ApiResult<Page<Category>>;
}

#[async_trait]
pub trait CategoryWriter {
    async fn create_category(&self, payload: &CategoryPayload) -> ApiResult<Category>;
    async fn update_category(
        &self,
        id: &RecordId,
        payload: &CategoryPayload,
    ) -> ApiResult<Category>;
    async fn delete_category(&self, id: &RecordId) -> ApiResult<()>;
}

#[async_trait]
pub trait CourseReader {
    async fn search_courses(
        &self,
        condition: &CourseSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Course>>;
    async fn get_course(&self, id: &RecordId) -> ApiResult<Course>;
    async fn search_catalog_courses(
        &self,
        condition: &CatalogCourseSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Course>>;
    async fn get_catalog_course(&self, id: &RecordId) -> ApiResult<Course>;
    async fn search_sessions(
        &self,
        condition: &SessionSearch,
        page: PageRequest,
    ) -> ApiResult<Page<CourseSession>>;
    async fn search_lessons(
        &self,
        condition: &LessonSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Lesson>>;
    async fn search_course_logs(
        &self,
        condition: &CourseLogSearch,
        page: PageRequest,
    ) -> ApiResult<Page<CourseLog>>;
}

#[async_trait]
pub trait CourseWriter {
    async fn create_course(&self, payload: &CoursePayload) -> ApiResult<Course>;
    async fn update_course(&self, id: &RecordId, payload: &CoursePayload) -> ApiResult<Course>;
    async fn delete_course(&self, id: &RecordId) -> ApiResult<()>;
    async fn change_course_status(&self, change: &CourseStatusChange) -> ApiResult<()>;
    async fn create_session(&self, payload: &SessionPayload) -> ApiResult<CourseSession>;
    async fn update_session(
        &self,
        id: &RecordId,
        payload: &SessionPayload,
    ) -> ApiResult<CourseSession>;
    async fn delete_session(&self, id: &RecordId) -> ApiResult<()>;
    async fn create_lesson(&self, payload: &LessonPayload) -> ApiResult<Lesson>;
    async fn update_lesson(&self, id: &RecordId, payload: &LessonPayload) -> ApiResult<Lesson>;
    async fn delete_lesson(&self, id: &RecordId) -> ApiResult<()>;
}

#[async_trait]
pub trait PayoutReader {
    async fn search_payouts(
        &self,
        condition: &PayoutSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Payout>>;
}

#[async_trait]
pub trait PayoutWriter {
    async fn create_payout(&self, payout: &NewPayout) -> ApiResult<Payout>;
    async fn update_payout_status(
        &self,
        id: &RecordId,
        change: &PayoutStatusChange,
    ) -> ApiResult<()>;
}

#[async_trait]
pub trait BlogReader {
    async fn search_blogs(&self, condition: &BlogSearch, page: PageRequest)
    -> ApiResult<Page<Blog>>;
    async fn search_catalog_blogs(
        &self,
        condition: &BlogSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Blog>>;
    async fn get_catalog_blog(&self, id: &RecordId) -> ApiResult<Blog>;
}

#[async_trait]
pub trait BlogWriter {
    async fn create_blog(&self, payload: &BlogPayload) -> ApiResult<Blog>;
    async fn update_blog(&self, id: &RecordId, payload: &BlogPayload) -> ApiResult<Blog>;
    async fn delete_blog(&self, id: &RecordId) -> ApiResult<()>;
}

#[async_trait]
pub trait PurchaseReader {
    async fn search_purchases(
        &self,
        scope: PurchaseScope,
        condition: &PurchaseSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Purchase>>;
}

#[async_trait]
pub trait ReviewReader {
    async fn search_reviews(
        &self,
        condition: &ReviewSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Review>>;
}

#[async_trait]
pub trait ReviewWriter {
    async fn create_review(&self, payload: &ReviewPayload) -> ApiResult<Review>;
    async fn update_review(&self, id: &RecordId, payload: &ReviewPayload) -> ApiResult<Review>;
}

#[async_trait]
pub trait SubscriptionReader {
    /// Subscribers of the logged-in instructor.
    async fn search_subscribers(
        &self,
        condition: &SubscriptionSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Subscription>>;
    /// Instructors the logged-in user follows.
    async fn search_subscriptions(
        &self,
        condition: &SubscriptionSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Subscription>>;
}

#[async_trait]
pub trait SubscriptionWriter {
    /// Subscribes to, or unsubscribes from, an instructor.
    async fn toggle_subscription(&self, instructor_id: &RecordId) -> ApiResult<()>;
}

#[async_trait]
pub trait CartReader {
    async fn search_cart(
        &self,
        condition: &CartSearch,
        page: PageRequest,
    ) -> ApiResult<Page<CartItem>>;
}

#[async_trait]
pub trait CartWriter {
    async fn add_to_cart(&self, course_id: &RecordId) -> ApiResult<()>;
    async fn remove_cart_item(&self, id: &RecordId) -> ApiResult<()>;
    async fn update_cart_status(&self, change: &CartStatusChange) -> ApiResult<()>;
}

#[async_trait]
pub trait AuthApi {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> ApiResult<String>;
    /// Profile behind `token`, which need not be the client's own.
    async fn current_user(&self, token: &str) -> ApiResult<SessionUser>;
    async fn logout(&self) -> ApiResult<()>;
}
