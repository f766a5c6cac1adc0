//! Column and action definitions turned into template-ready rows.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::role::{Capability, Role};
use crate::domain::types::Identified;
use crate::render::format::{
    badge_color, badge_label, format_currency, format_date, format_duration, sanitize,
};

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Text {
        value: String,
    },
    Badge {
        label: String,
        color: &'static str,
    },
    /// Switch posting `field=<new value>` to `url`.
    Toggle {
        checked: bool,
        url: String,
        field: &'static str,
    },
    /// Dropdown posting `field=<choice>` to `url`.
    Select {
        url: String,
        field: &'static str,
        selected: String,
        options: Vec<SelectOption>,
    },
    Image {
        src: String,
        alt: String,
    },
    /// Already sanitized markup.
    Html {
        html: String,
    },
    Link {
        label: String,
        href: String,
    },
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text {
            value: value.into(),
        }
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        Cell::text(value.unwrap_or_default())
    }

    pub fn badge(status: &str) -> Self {
        Cell::Badge {
            label: badge_label(status),
            color: badge_color(status),
        }
    }

    pub fn currency(amount: f64) -> Self {
        Cell::text(format_currency(amount))
    }

    pub fn date(date: Option<&DateTime<Utc>>) -> Self {
        Cell::text(format_date(date))
    }

    pub fn duration(minutes: u32) -> Self {
        Cell::text(format_duration(minutes))
    }

    pub fn html(raw: &str) -> Self {
        Cell::Html {
            html: sanitize(raw),
        }
    }

    pub fn image(src: Option<&str>, alt: &str) -> Self {
        match src.filter(|s| !s.is_empty()) {
            Some(src) => Cell::Image {
                src: src.to_string(),
                alt: alt.to_string(),
            },
            None => Cell::text(""),
        }
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Cell::Link {
            label: label.into(),
            href: href.into(),
        }
    }

    pub fn toggle(checked: bool, url: impl Into<String>, field: &'static str) -> Self {
        Cell::Toggle {
            checked,
            url: url.into(),
            field,
        }
    }

    pub fn select(
        url: impl Into<String>,
        field: &'static str,
        selected: impl Into<String>,
        options: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Cell::Select {
            url: url.into(),
            field,
            selected: selected.into(),
            options: options
                .into_iter()
                .map(|(value, label)| SelectOption { value, label })
                .collect(),
        }
    }

    /// Interactive cells degrade to plain text for roles that may not act.
    fn read_only(self) -> Self {
        match self {
            Cell::Toggle { checked, .. } => Cell::text(if checked { "Active" } else { "Inactive" }),
            Cell::Select { selected, .. } => Cell::text(selected),
            other => other,
        }
    }
}

pub struct Column<T> {
    pub title: &'static str,
    render: fn(&T) -> Cell,
    capability: Option<Capability>,
}

/// A row-level mutation offered as a small `POST` form.
pub struct ActionDef<T> {
    label: &'static str,
    style: &'static str,
    capability: Capability,
    url: fn(&T) -> String,
    when: fn(&T) -> bool,
    fields: fn(&T) -> Vec<(&'static str, String)>,
    input: Option<InputField>,
    confirm: Option<&'static str>,
}

impl<T> ActionDef<T> {
    pub fn new(label: &'static str, capability: Capability, url: fn(&T) -> String) -> Self {
        Self {
            label,
            style: "outline-primary",
            capability,
            url,
            when: |_| true,
            fields: |_| Vec::new(),
            input: None,
            confirm: None,
        }
    }

    pub fn style(mut self, style: &'static str) -> Self {
        self.style = style;
        self
    }

    /// Only offered for records matching `predicate`.
    pub fn when(mut self, predicate: fn(&T) -> bool) -> Self {
        self.when = predicate;
        self
    }

    /// Hidden form fields posted with the action.
    pub fn fields(mut self, fields: fn(&T) -> Vec<(&'static str, String)>) -> Self {
        self.fields = fields;
        self
    }

    /// Free-text input submitted with the action, e.g. a rejection reason.
    pub fn input(mut self, name: &'static str, placeholder: &'static str) -> Self {
        self.input = Some(InputField { name, placeholder });
        self
    }

    pub fn confirm(mut self, prompt: &'static str) -> Self {
        self.confirm = Some(prompt);
        self
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct InputField {
    pub name: &'static str,
    pub placeholder: &'static str,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct HiddenField {
    pub name: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RowAction {
    pub label: &'static str,
    pub style: &'static str,
    pub url: String,
    pub fields: Vec<HiddenField>,
    pub input: Option<InputField>,
    pub confirm: Option<&'static str>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Row {
    pub key: String,
    pub cells: Vec<Cell>,
    pub actions: Vec<RowAction>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub has_actions: bool,
    pub rows: Vec<Row>,
}

pub struct TableSpec<T> {
    columns: Vec<Column<T>>,
    actions: Vec<ActionDef<T>>,
}

impl<T> Default for TableSpec<T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            actions: Vec::new(),
        }
    }
}

impl<T: Identified> TableSpec<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, title: &'static str, render: fn(&T) -> Cell) -> Self {
        self.columns.push(Column {
            title,
            render,
            capability: None,
        });
        self
    }

    /// Column whose toggles and selects are only live for `capability`.
    pub fn editable_column(
        mut self,
        title: &'static str,
        capability: Capability,
        render: fn(&T) -> Cell,
    ) -> Self {
        self.columns.push(Column {
            title,
            render,
            capability: Some(capability),
        });
        self
    }

    pub fn action(mut self, action: ActionDef<T>) -> Self {
        self.actions.push(action);
        self
    }

    /// One row per record in server order. `None` is an anonymous visitor.
    pub fn render(&self, records: &[T], role: Option<Role>) -> Table {
        let allowed = |capability: Capability| role.is_some_and(|role| role.can(capability));
        let actions: Vec<&ActionDef<T>> = self
            .actions
            .iter()
            .filter(|action| allowed(action.capability))
            .collect();

        let rows = records
            .iter()
            .map(|record| Row {
                key: record.id().to_string(),
                cells: self
                    .columns
                    .iter()
                    .map(|column| {
                        let cell = (column.render)(record);
                        match column.capability {
                            Some(capability) if !allowed(capability) => cell.read_only(),
                            _ => cell,
                        }
                    })
                    .collect(),
                actions: actions
                    .iter()
                    .filter(|action| (action.when)(record))
                    .map(|action| RowAction {
                        label: action.label,
                        style: action.style,
                        url: (action.url)(record),
                        fields: (action.fields)(record)
                            .into_iter()
                            .map(|(name, value)| HiddenField { name, value })
                            .collect(),
                        input: action.input,
                        confirm: action.confirm,
                    })
                    .collect(),
            })
            .collect();

        Table {
            headers: self.columns.iter().map(|column| column.title).collect(),
            has_actions: !actions.is_empty(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RecordId;

    struct Item {
        id: RecordId,
        name: &'static str,
        active: bool,
    }

    impl Identified for Item {
        fn id(&self) -> &RecordId {
            &self.id
        }
    }

    fn items() -> Vec<Item> {
        ["z", "a", "m"]
            .into_iter()
            .enumerate()
            .map(|(i, id)| Item {
                id: RecordId::new(id).unwrap(),
                name: id,
                active: i % 2 == 0,
            })
            .collect()
    }

    fn spec() -> TableSpec<Item> {
        TableSpec::<Item>::new()
            .column("Name", |item| Cell::text(item.name))
            .editable_column("Status", Capability::ManageUsers, |item| {
                Cell::toggle(item.active, format!("/items/{}/status", item.id), "status")
            })
            .action(
                ActionDef::new("Delete", Capability::ManageUsers, |item: &Item| {
                    format!("/items/{}/delete", item.id)
                })
                .style("outline-danger")
                .when(|item| !item.active)
                .confirm("Delete this item?"),
            )
    }

    #[test]
    fn rows_keep_server_order_and_keys() {
        let table = spec().render(&items(), Some(Role::Admin));
        let keys: Vec<_> = table.rows.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(table.headers, vec!["Name", "Status"]);
    }

    #[test]
    fn actions_respect_predicate_and_capability() {
        let table = spec().render(&items(), Some(Role::Admin));
        assert!(table.has_actions);
        assert!(table.rows[0].actions.is_empty());
        assert_eq!(table.rows[1].actions[0].url, "/items/a/delete");

        let table = spec().render(&items(), Some(Role::Student));
        assert!(!table.has_actions);
        assert!(table.rows.iter().all(|row| row.actions.is_empty()));

        assert!(!spec().render(&items(), None).has_actions);
    }

    #[test]
    fn toggles_are_read_only_without_capability() {
        let table = spec().render(&items(), Some(Role::Student));
        assert_eq!(table.rows[0].cells[1], Cell::text("Active"));
        let table = spec().render(&items(), Some(Role::Admin));
        assert!(matches!(table.rows[0].cells[1], Cell::Toggle { checked: true, .. }));
    }

    #[test]
    fn cells_serialize_with_kind_tag() {
        assert_eq!(
            serde_json::to_value(Cell::badge("active")).unwrap(),
            serde_json::json!({"kind": "badge", "label": "ACTIVE", "color": "geekblue"})
        );
    }
}
