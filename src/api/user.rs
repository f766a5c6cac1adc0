use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, ApiResult, Resource, UserReader, UserWriter};
use crate::domain::role::Role;
use crate::domain::types::RecordId;
use crate::domain::user::{
    InstructorReview, NewUser, PasswordChange, RoleChange, StatusChange, UpdateAccount, User,
};
use crate::pagination::{Page, PageRequest};

/// `searchCondition` of `/api/users/search`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UserSearch {
    pub keyword: String,
    /// A role name or `"all"`.
    pub role: String,
    pub status: bool,
    pub is_deleted: bool,
    /// `"true"`, `"false"` or `""` for either.
    pub is_verified: String,
}

impl Default for UserSearch {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            role: "all".to_string(),
            status: true,
            is_deleted: false,
            is_verified: String::new(),
        }
    }
}

impl UserSearch {
    /// Verified accounts of every role, the default of the user list.
    pub fn accounts() -> Self {
        Self::default().verified(Some(true))
    }

    /// Instructor registrations still awaiting an admin decision.
    pub fn pending_instructors() -> Self {
        Self::default()
            .role(Some(Role::Instructor))
            .verified(Some(false))
    }

    pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.keyword = keyword.as_ref().trim().to_string();
        self
    }

    pub fn role(mut self, role: Option<Role>) -> Self {
        self.role = role.map_or_else(|| "all".to_string(), |role| role.as_str().to_string());
        self
    }

    pub fn status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }

    pub fn deleted(mut self, is_deleted: bool) -> Self {
        self.is_deleted = is_deleted;
        self
    }

    pub fn verified(mut self, is_verified: Option<bool>) -> Self {
        self.is_verified = is_verified.map(|v| v.to_string()).unwrap_or_default();
        self
    }
}

pub struct Users;

impl Resource for Users {
    type Record = User;
    type Condition = UserSearch;
    const SEARCH_PATH: &'static str = "/api/users/search";
}

#[async_trait]
impl UserReader for ApiClient {
    async fn search_users(
        &self,
        condition: &UserSearch,
        page: PageRequest,
    ) -> ApiResult<Page<User>> {
        self.search::<Users>(condition, page).await
    }

    async fn get_user(&self, id: &RecordId) -> ApiResult<User> {
        self.get_json(&format!("/api/users/{id}")).await
    }
}

#[async_trait]
impl UserWriter for ApiClient {
    async fn create_user(&self, new_user: &NewUser) -> ApiResult<User> {
        self.post_json("/api/users/create", new_user).await
    }

    async fn update_account(&self, id: &RecordId, updates: &UpdateAccount) -> ApiResult<User> {
        self.put_json(&format!("/api/users/{id}"), updates).await
    }

    async fn change_user_status(&self, change: &StatusChange) -> ApiResult<()> {
        self.put_ack("/api/users/change-status", change).await
    }

    async fn change_user_role(&self, change: &RoleChange) -> ApiResult<()> {
        self.put_ack("/api/users/change-role", change).await
    }

    async fn delete_user(&self, id: &RecordId) -> ApiResult<()> {
        self.delete(&format!("/api/users/{id}")).await
    }

    async fn review_instructor(&self, review: &InstructorReview) -> ApiResult<()> {
        self.put_ack("/api/users/review-profile-instructor", review)
            .await
    }

    async fn change_password(&self, change: &PasswordChange) -> ApiResult<()> {
        self.put_ack("/api/users/change-password", change).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_condition_serializes_every_field() {
        assert_eq!(
            serde_json::to_value(UserSearch::default()).unwrap(),
            serde_json::json!({
                "keyword": "",
                "role": "all",
                "status": true,
                "is_deleted": false,
                "is_verified": ""
            })
        );
    }

    #[test]
    fn pending_instructors_condition() {
        let condition = UserSearch::pending_instructors().keyword("  lan ");
        assert_eq!(condition.role, "instructor");
        assert_eq!(condition.is_verified, "false");
        assert_eq!(condition.keyword, "lan");
        assert!(condition.status);
    }
}
