//! The paginated resource browser shared by every list screen.
//!
//! A [`PageCoordinator`] owns the search condition and the requested page and
//! stamps every fetch it issues with a generation number. A
//! [`ResourceBrowser`] pairs the coordinator with the latest page of records
//! and applies a response only if its generation is still the latest one.
//!
//! A browser lives for one request. Dropping it is the unmount, and the
//! re-fetch after a mutation is the page load that follows its redirect.

use std::future::Future;

use crate::api::{ApiError, ApiResult, Resource};
use crate::pagination::{Page, PageInfo, PageRequest, PaginationControl};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching,
}

/// A fetch issued by the coordinator. Carries a snapshot of what to fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchTicket<C> {
    generation: u64,
    condition: C,
    request: PageRequest,
}

impl<C> FetchTicket<C> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn condition(&self) -> &C {
        &self.condition
    }

    pub fn request(&self) -> PageRequest {
        self.request
    }
}

#[derive(Debug)]
pub struct PageCoordinator<C> {
    condition: C,
    request: PageRequest,
    generation: u64,
    state: FetchState,
}

impl<C: Clone + PartialEq> PageCoordinator<C> {
    pub fn new(condition: C, request: PageRequest) -> Self {
        Self {
            condition,
            request,
            generation: 0,
            state: FetchState::Idle,
        }
    }

    pub fn condition(&self) -> &C {
        &self.condition
    }

    pub fn request(&self) -> PageRequest {
        self.request
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    fn issue(&mut self) -> FetchTicket<C> {
        self.generation += 1;
        self.state = FetchState::Fetching;
        FetchTicket {
            generation: self.generation,
            condition: self.condition.clone(),
            request: self.request,
        }
    }

    /// Initial fetch with the defaults the browser was created with.
    pub fn mount(&mut self) -> FetchTicket<C> {
        self.issue()
    }

    /// A changed condition resets to page 1; an identical one is a no-op.
    pub fn set_condition(&mut self, condition: C) -> Option<FetchTicket<C>> {
        if condition == self.condition {
            return None;
        }
        self.condition = condition;
        self.request = self.request.with_page(1);
        Some(self.issue())
    }

    pub fn is_current(&self, ticket: &FetchTicket<C>) -> bool {
        ticket.generation == self.generation
    }

    /// Marks `ticket` as resolved. Returns `false` for a stale ticket, which
    /// leaves the state untouched.
    pub fn finish(&mut self, ticket: &FetchTicket<C>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = FetchState::Idle;
        true
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    Applied,
    Stale,
    Failed(ApiError),
}

pub struct ResourceBrowser<R: Resource> {
    coordinator: PageCoordinator<R::Condition>,
    records: Vec<R::Record>,
    page_info: PageInfo,
    notice: Option<String>,
}

impl<R: Resource> ResourceBrowser<R> {
    pub fn new(condition: R::Condition, request: PageRequest) -> Self {
        Self {
            coordinator: PageCoordinator::new(condition, request),
            records: Vec::new(),
            page_info: PageInfo::empty(request),
            notice: None,
        }
    }

    pub fn coordinator(&self) -> &PageCoordinator<R::Condition> {
        &self.coordinator
    }

    pub fn mount(&mut self) -> FetchTicket<R::Condition> {
        self.coordinator.mount()
    }

    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    /// Message of the last failed fetch, if the latest fetch failed.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn control(&self) -> PaginationControl {
        PaginationControl::new(&self.page_info)
    }

    /// Applies the result of `ticket` unless a newer fetch has been issued.
    /// A failure keeps the previous rows and page info.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket<R::Condition>,
        result: ApiResult<Page<R::Record>>,
    ) -> FetchOutcome {
        if !self.coordinator.finish(ticket) {
            log::debug!(
                "Discarding stale response for {} (generation {})",
                R::SEARCH_PATH,
                ticket.generation
            );
            return FetchOutcome::Stale;
        }
        match result {
            Ok(page) => {
                self.records = page.page_data;
                self.page_info = page.page_info;
                self.notice = None;
                FetchOutcome::Applied
            }
            Err(err) => {
                log::error!("Failed to fetch {}: {err}", R::SEARCH_PATH);
                self.notice = Some(err.to_string());
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Runs `fetch` for `ticket` and resolves the result.
    pub async fn load<F, Fut>(&mut self, ticket: FetchTicket<R::Condition>, fetch: F) -> FetchOutcome
    where
        F: FnOnce(R::Condition, PageRequest) -> Fut,
        Fut: Future<Output = ApiResult<Page<R::Record>>>,
    {
        let result = fetch(ticket.condition.clone(), ticket.request).await;
        self.resolve(&ticket, result)
    }
}

/// Boolean switch that shows the requested value while the mutation is in
/// flight and falls back to the confirmed value if it is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptimisticToggle {
    confirmed: bool,
    pending: Option<bool>,
}

impl OptimisticToggle {
    pub fn new(confirmed: bool) -> Self {
        Self {
            confirmed,
            pending: None,
        }
    }

    /// Value currently displayed.
    pub fn value(&self) -> bool {
        self.pending.unwrap_or(self.confirmed)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts a flip to `value` and returns the value to send.
    pub fn begin(&mut self, value: bool) -> bool {
        self.pending = Some(value);
        value
    }

    /// Settles the pending flip and returns the displayed value.
    pub fn settle(&mut self, accepted: bool) -> bool {
        if let (Some(value), true) = (self.pending.take(), accepted) {
            self.confirmed = value;
        }
        self.confirmed
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::api::user::{UserSearch, Users};
    use crate::domain::role::Role;
    use crate::domain::types::RecordId;
    use crate::domain::user::User;

    fn user(id: &str) -> User {
        User {
            id: RecordId::new(id).unwrap(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            role: Role::Student,
            status: true,
            is_verified: true,
            avatar: None,
            phone_number: None,
            description: None,
            video: None,
            is_deleted: false,
            created_at: None,
        }
    }

    fn page(ids: &[&str], page_num: usize, total_items: usize) -> Page<User> {
        Page {
            page_data: ids.iter().map(|id| user(id)).collect(),
            page_info: PageInfo {
                page_num,
                page_size: 10,
                total_items,
                total_pages: total_items.div_ceil(10),
            },
        }
    }

    fn browser() -> ResourceBrowser<Users> {
        ResourceBrowser::new(UserSearch::default(), PageRequest::first(10))
    }

    #[test]
    fn condition_change_resets_to_first_page() {
        let mut coordinator = PageCoordinator::new(
            UserSearch::default(),
            PageRequest::from_query(Some(3), Some(20), 10),
        );
        coordinator.mount();

        let ticket = coordinator
            .set_condition(UserSearch::default().keyword("lan"))
            .unwrap();
        assert_eq!(ticket.request().page_num(), 1);
        assert_eq!(ticket.request().page_size(), 20);
        assert_eq!(ticket.condition().keyword, "lan");
    }

    #[test]
    fn identical_condition_issues_no_fetch() {
        let mut coordinator = PageCoordinator::new(
            UserSearch::default(),
            PageRequest::from_query(Some(2), None, 10),
        );
        let mounted = coordinator.mount();
        assert!(coordinator.set_condition(UserSearch::default()).is_none());
        assert_eq!(coordinator.request().page_num(), 2);
        assert!(coordinator.is_current(&mounted));
    }

    #[test]
    fn generations_increase_monotonically() {
        let mut coordinator = PageCoordinator::new(UserSearch::default(), PageRequest::first(10));
        let first = coordinator.mount();
        let second = coordinator
            .set_condition(UserSearch::default().keyword("a"))
            .unwrap();
        let third = coordinator
            .set_condition(UserSearch::default().keyword("ab"))
            .unwrap();
        assert!(first.generation() < second.generation());
        assert!(second.generation() < third.generation());
        assert!(!coordinator.is_current(&second));
        assert_eq!(coordinator.state(), FetchState::Fetching);
    }

    #[test]
    fn stale_response_never_overwrites_newer_state() {
        let mut browser = browser();
        let old = browser.mount();
        let new = browser
            .coordinator
            .set_condition(UserSearch::default().keyword("algebra"))
            .unwrap();

        assert!(matches!(
            browser.resolve(&new, Ok(page(&["n1"], 1, 1))),
            FetchOutcome::Applied
        ));
        assert!(matches!(
            browser.resolve(&old, Ok(page(&["o1", "o2"], 1, 2))),
            FetchOutcome::Stale
        ));
        assert_eq!(browser.records().len(), 1);
        assert_eq!(browser.records()[0].id.as_str(), "n1");
        assert_eq!(browser.coordinator().state(), FetchState::Idle);
    }

    #[test]
    fn out_of_order_arrival_keeps_latest() {
        let mut browser = browser();
        let first = browser.mount();
        let second = browser
            .coordinator
            .set_condition(UserSearch::default().keyword("geo"))
            .unwrap();

        browser.resolve(&first, Ok(page(&["a"], 1, 11)));
        assert!(browser.records().is_empty());
        assert_eq!(browser.coordinator().state(), FetchState::Fetching);

        browser.resolve(&second, Ok(page(&["k"], 1, 1)));
        assert_eq!(browser.records()[0].id.as_str(), "k");
    }

    #[test]
    fn failure_keeps_previous_rows() {
        let mut browser = browser();
        let ticket = browser.mount();
        browser.resolve(&ticket, Ok(page(&["a", "b"], 1, 2)));

        let ticket = browser.mount();
        let outcome = browser.resolve(&ticket, Err(ApiError::Transport("timeout".into())));
        assert!(matches!(outcome, FetchOutcome::Failed(ApiError::Transport(_))));
        assert_eq!(browser.records().len(), 2);
        assert_eq!(browser.page_info().total_items, 2);
        assert_eq!(browser.notice(), Some("Backend unreachable: timeout"));
        assert_eq!(browser.coordinator().state(), FetchState::Idle);
    }

    #[actix_web::test]
    async fn algebra_search_shows_first_ten_of_twenty_three() {
        let mut browser = browser();
        browser.mount();
        let ticket = browser
            .coordinator
            .set_condition(UserSearch::default().keyword("algebra"))
            .unwrap();

        let seen = RefCell::new(None);
        let ids: Vec<String> = (0..10).map(|i| format!("u{i}")).collect();
        let outcome = browser
            .load(ticket, |condition, request| {
                let body = serde_json::to_value(crate::pagination::SearchRequest {
                    search_condition: &condition,
                    page_info: request,
                })
                .unwrap();
                seen.replace(Some(body));
                let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                let result = Ok(page(&refs, 1, 23));
                async move { result }
            })
            .await;

        assert!(matches!(outcome, FetchOutcome::Applied));
        assert_eq!(
            seen.into_inner().unwrap(),
            serde_json::json!({
                "searchCondition": {
                    "keyword": "algebra",
                    "role": "all",
                    "status": true,
                    "is_deleted": false,
                    "is_verified": ""
                },
                "pageInfo": {"pageNum": 1, "pageSize": 10}
            })
        );
        assert_eq!(browser.records().len(), 10);
        assert_eq!(browser.control().summary, "1-10 of 23");
        assert_eq!(browser.control().next_page, Some(2));
    }

    #[test]
    fn toggle_stays_on_success_and_reverts_on_rejection() {
        let mut toggle = OptimisticToggle::new(false);
        assert!(toggle.begin(true));
        assert!(toggle.value());
        assert!(toggle.is_pending());
        assert!(toggle.settle(true));
        assert!(!toggle.is_pending());

        let mut toggle = OptimisticToggle::new(false);
        toggle.begin(true);
        assert!(!toggle.settle(false));
        assert!(!toggle.value());
    }
}
