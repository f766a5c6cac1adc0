use async_trait::async_trait;
use serde::Serialize;

use crate::api::{ApiClient, ApiResult, PurchaseReader, Resource};
use crate::domain::purchase::Purchase;
use crate::domain::role::Role;
use crate::pagination::{Page, PageRequest};

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct PurchaseSearch {
    pub purchase_no: String,
    pub cart_no: String,
    pub course_id: String,
    pub status: String,
    pub is_delete: bool,
}

impl PurchaseSearch {
    pub fn purchase_no(mut self, purchase_no: impl AsRef<str>) -> Self {
        self.purchase_no = purchase_no.as_ref().trim().to_string();
        self
    }

    pub fn status(mut self, status: impl AsRef<str>) -> Self {
        self.status = status.as_ref().trim().to_string();
        self
    }
}

/// Purchases as seen by the caller's role. The search path varies with
/// [`PurchaseScope`]; this one is the admin listing.
pub struct Purchases;

impl Resource for Purchases {
    type Record = Purchase;
    type Condition = PurchaseSearch;
    const SEARCH_PATH: &'static str = "/api/purchase/search";
}

/// Which purchase listing the caller is entitled to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseScope {
    Admin,
    Instructor,
    Student,
}

impl PurchaseScope {
    pub fn search_path(self) -> &'static str {
        match self {
            PurchaseScope::Admin => "/api/purchase/search",
            PurchaseScope::Instructor => "/api/purchase/search-for-instructor",
            PurchaseScope::Student => "/api/purchase/search-for-student",
        }
    }
}

impl From<Role> for PurchaseScope {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => PurchaseScope::Admin,
            Role::Instructor => PurchaseScope::Instructor,
            Role::Student => PurchaseScope::Student,
        }
    }
}

#[async_trait]
impl PurchaseReader for ApiClient {
    async fn search_purchases(
        &self,
        scope: PurchaseScope,
        condition: &PurchaseSearch,
        page: PageRequest,
    ) -> ApiResult<Page<Purchase>> {
        self.search_at(scope.search_path(), condition, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_follows_role() {
        assert_eq!(
            PurchaseScope::from(Role::Instructor).search_path(),
            "/api/purchase/search-for-instructor"
        );
        assert_eq!(
            PurchaseScope::from(Role::Student).search_path(),
            "/api/purchase/search-for-student"
        );
        assert_eq!(
            PurchaseScope::from(Role::Admin).search_path(),
            "/api/purchase/search"
        );
    }
}
