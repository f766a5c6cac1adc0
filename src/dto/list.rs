//! Query and view data shared by every list screen.

use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::browser::{PageCoordinator, ResourceBrowser};
use crate::domain::role::Role;
use crate::pagination::{PageRequest, PaginationControl};
use crate::render::table::{SelectOption, Table, TableSpec};

/// Query string of a list screen.
///
/// The search form sends the current `page` and `size` along with `prev`,
/// the filter query it was rendered for. A changed filter lands on page 1.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ListQuery {
    pub fn keyword(&self) -> &str {
        present(&self.keyword).unwrap_or_default()
    }

    pub fn status(&self) -> Option<&str> {
        present(&self.status)
    }

    pub fn role(&self) -> Option<&str> {
        present(&self.role)
    }

    pub fn category(&self) -> Option<&str> {
        present(&self.category)
    }

    pub fn session(&self) -> Option<&str> {
        present(&self.session)
    }

    pub fn tab(&self) -> Option<&str> {
        present(&self.tab)
    }

    /// The search condition alone: trimmed filters without blanks, paging
    /// or `prev`.
    pub fn condition(&self) -> ListQuery {
        let owned = |value: Option<&str>| value.map(str::to_string);
        ListQuery {
            keyword: owned(present(&self.keyword)),
            status: owned(self.status()),
            role: owned(self.role()),
            category: owned(self.category()),
            session: owned(self.session()),
            tab: owned(self.tab()),
            ..ListQuery::default()
        }
    }

    fn previous(&self) -> Option<ListQuery> {
        let prev = self.prev.as_deref()?;
        match serde_html_form::from_str(prev) {
            Ok(previous) => Some(previous),
            Err(err) => {
                log::debug!("Ignoring malformed previous query {prev:?}: {err}");
                None
            }
        }
    }

    /// Page to fetch. When the query names the condition it was submitted
    /// from, the coordinator decides: a changed condition resets to page 1,
    /// the same one keeps the requested page.
    pub fn page_request(&self, default_size: usize) -> PageRequest {
        let request = PageRequest::from_query(self.page, self.size, default_size);
        let Some(previous) = self.previous() else {
            return request;
        };
        let mut coordinator = PageCoordinator::new(previous.condition(), request);
        coordinator.set_condition(self.condition());
        coordinator.request()
    }

    /// The condition plus page size, for building pagination links.
    pub fn filter_query(&self) -> String {
        let filters = ListQuery {
            size: self.size,
            ..self.condition()
        };
        serde_html_form::to_string(&filters).unwrap_or_default()
    }
}

/// A search form input. No options renders a text box.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FilterField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub options: Vec<SelectOption>,
}

impl FilterField {
    pub fn keyword(query: &ListQuery, label: &'static str) -> Self {
        Self {
            name: "keyword",
            label,
            value: query.keyword().to_string(),
            options: Vec::new(),
        }
    }

    pub fn select(
        name: &'static str,
        label: &'static str,
        value: Option<&str>,
        options: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            name,
            label,
            value: value.unwrap_or_default().to_string(),
            options: options
                .into_iter()
                .map(|(value, label)| SelectOption { value, label })
                .collect(),
        }
    }
}

/// A tab above the table, e.g. active and inactive accounts.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Tab {
    pub key: &'static str,
    pub label: &'static str,
    pub active: bool,
}

impl Tab {
    pub fn set(current: &str, tabs: &[(&'static str, &'static str)]) -> Vec<Tab> {
        tabs.iter()
            .map(|&(key, label)| Tab {
                key,
                label,
                active: key == current,
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Textarea,
    Number,
    Email,
    Password,
    Url,
    Select,
    Checkbox,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub required: bool,
    pub options: Vec<SelectOption>,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: InputKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = (String, String)>) -> Self {
        self.kind = InputKind::Select;
        self.options = options
            .into_iter()
            .map(|(value, label)| SelectOption { value, label })
            .collect();
        self
    }
}

/// Collapsible create form shown above a list.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CreatePanel {
    pub title: &'static str,
    pub url: String,
    pub fields: Vec<FormField>,
}

impl CreatePanel {
    pub fn new(title: &'static str, url: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title,
            url: url.into(),
            fields,
        }
    }
}

/// Everything `list.html` needs to render one browser.
#[derive(Debug, Serialize)]
pub struct ListPageData {
    pub title: &'static str,
    /// Url of the list itself; forms and links are built relative to it.
    pub path: String,
    pub table: Table,
    pub pagination: PaginationControl,
    pub filters: Vec<FilterField>,
    pub tabs: Vec<Tab>,
    /// Tab named by the query, echoed by the search form.
    pub tab: Option<String>,
    pub filter_query: String,
    /// Failure of the latest fetch, shown above the stale table.
    pub notice: Option<String>,
    pub create: Option<CreatePanel>,
}

impl ListPageData {
    pub fn new<R: Resource>(
        title: &'static str,
        path: impl Into<String>,
        browser: &ResourceBrowser<R>,
        spec: &TableSpec<R::Record>,
        role: Option<Role>,
        query: &ListQuery,
    ) -> Self {
        Self {
            title,
            path: path.into(),
            table: spec.render(browser.records(), role),
            pagination: browser.control(),
            filters: Vec::new(),
            tabs: Vec::new(),
            tab: query.tab().map(str::to_string),
            filter_query: query.filter_query(),
            notice: browser.notice().map(str::to_string),
            create: None,
        }
    }

    pub fn filters(mut self, filters: Vec<FilterField>) -> Self {
        self.filters = filters;
        self
    }

    pub fn tabs(mut self, tabs: Vec<Tab>) -> Self {
        self.tabs = tabs;
        self
    }

    pub fn create(mut self, panel: CreatePanel) -> Self {
        self.create = Some(panel);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_query_drops_page_and_blanks() {
        let query = ListQuery {
            keyword: Some("algebra".into()),
            status: Some(String::new()),
            role: Some("  ".into()),
            page: Some(3),
            size: Some(20),
            prev: Some("keyword=geometry".into()),
            ..ListQuery::default()
        };
        assert_eq!(query.filter_query(), "keyword=algebra&size=20");
        assert_eq!(ListQuery::default().filter_query(), "");

        let blank = ListQuery {
            keyword: Some(String::new()),
            ..ListQuery::default()
        };
        assert_eq!(blank.filter_query(), "");
    }

    #[test]
    fn changed_filter_resets_to_first_page_keeping_size() {
        let query: ListQuery = serde_html_form::from_str(
            "keyword=algebra&page=3&size=20&prev=keyword%3Dgeometry%26size%3D20",
        )
        .unwrap();
        let request = query.page_request(10);
        assert_eq!((request.page_num(), request.page_size()), (1, 20));
    }

    #[test]
    fn resubmitted_filter_keeps_page() {
        let query: ListQuery = serde_html_form::from_str(
            "keyword=algebra&page=3&size=20&prev=keyword%3D%20algebra%20%26size%3D20",
        )
        .unwrap();
        let request = query.page_request(10);
        assert_eq!((request.page_num(), request.page_size()), (3, 20));
    }

    #[test]
    fn switching_tab_is_a_new_condition() {
        let query = ListQuery {
            tab: Some("inactive".into()),
            page: Some(4),
            prev: Some("tab=active".into()),
            ..ListQuery::default()
        };
        assert_eq!(query.page_request(10).page_num(), 1);
    }

    #[test]
    fn malformed_previous_query_is_ignored() {
        let query = ListQuery {
            page: Some(2),
            prev: Some("page=abc".into()),
            ..ListQuery::default()
        };
        assert_eq!(query.page_request(10).page_num(), 2);
    }

    #[test]
    fn blank_inputs_read_as_absent() {
        let query = ListQuery {
            keyword: Some("  ".into()),
            status: Some(String::new()),
            ..ListQuery::default()
        };
        assert_eq!(query.keyword(), "");
        assert_eq!(query.status(), None);
    }

    #[test]
    fn query_parses_from_url() {
        let query: ListQuery =
            serde_html_form::from_str("keyword=web&page=2&size=50&tab=inactive").unwrap();
        let request = query.page_request(10);
        assert_eq!((request.page_num(), request.page_size()), (2, 50));
        assert_eq!(query.tab(), Some("inactive"));
    }
}
