//! AI scriptless test trees: endpoints, filtering and paging.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const PAGE_SIZE: usize = 50;

pub(crate) const FILTER_TEST_NAME: &str = "test_name";
pub(crate) const FILTER_OWNER_LIST: &str = "owner_list";

const NODE_TEST: &str = "SIMPLE";
const NODE_FOLDER: &str = "CONTAINER";

/// The two scriptless products share a tree format but live under different APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScriptlessKind {
    Web,
    Mobile,
}

impl ScriptlessKind {
    pub(crate) fn manager_label(self) -> &'static str {
        match self {
            Self::Web => "AI Scriptless manager",
            Self::Mobile => "AI Scriptless Mobile manager",
        }
    }

    fn api_root(self, host: &str) -> String {
        match self {
            Self::Web => format!("https://{host}/scriptless-web/api/v1"),
            Self::Mobile => format!("https://{host}/scriptless/api/v1"),
        }
    }

    pub(crate) fn tree_url(self, host: &str) -> String {
        format!("{}/scripts/tree", self.api_root(host))
    }

    pub(crate) fn execution_url(self, host: &str) -> String {
        format!("{}/executions", self.api_root(host))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TestFilters {
    #[serde(default)]
    pub(crate) visibility: Option<String>,
    #[serde(default)]
    pub(crate) test_name: Option<String>,
    #[serde(default)]
    pub(crate) owner_list: Option<Vec<String>>,
}

impl TestFilters {
    fn accepts_group(&self, visibility: &str) -> bool {
        self.visibility
            .as_deref()
            .map_or(true, |wanted| wanted == visibility)
    }

    fn accepts_test(&self, test: &Value) -> bool {
        if let Some(name) = self.test_name.as_deref() {
            let actual = field_text(test, "name").to_lowercase();
            if !actual.contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(owners) = self.owner_list.as_deref() {
            let owner = field_text(test, "createdBy");
            if !owners.iter().any(|candidate| *candidate == owner) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TestPage {
    pub(crate) lines: Vec<String>,
    pub(crate) has_more: bool,
}

/// Render the matching tests in `[skip, skip + page_size)`, in tree order.
pub(crate) fn format_tests(
    tree: &Value,
    filters: &TestFilters,
    skip: usize,
    page_size: usize,
) -> TestPage {
    let end = skip.saturating_add(page_size);
    let mut matched = 0usize;
    let mut lines = Vec::new();
    let mut has_more = false;

    'groups: for group in groups(tree) {
        if !filters.accepts_group(&field_text(group, "visibility")) {
            continue;
        }
        for test in tests_in_order(group) {
            if !filters.accepts_test(test) {
                continue;
            }
            if matched >= end {
                has_more = true;
                break 'groups;
            }
            if matched >= skip {
                lines.push(format_test_line(test));
            }
            matched += 1;
        }
    }

    TestPage { lines, has_more }
}

fn format_test_line(test: &Value) -> String {
    format!(
        "id:{} name:{} created[user:{} date:{}] modified[user:{} date:{}]",
        field_text(test, "key"),
        display_name(&field_text(test, "name")),
        field_text(test, "createdBy"),
        formatted_time(test, "creationTime"),
        field_text(test, "modifiedBy"),
        formatted_time(test, "modificationTime"),
    )
}

/// Distinct values usable as `list_tests` filters, in tree order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct FilterValues {
    pub(crate) test_name: Vec<String>,
    pub(crate) owner_list: Vec<String>,
}

impl FilterValues {
    pub(crate) fn get(&self, filter_name: &str) -> Option<&[String]> {
        match filter_name {
            FILTER_TEST_NAME => Some(&self.test_name),
            FILTER_OWNER_LIST => Some(&self.owner_list),
            _ => None,
        }
    }
}

pub(crate) fn collect_filter_values(tree: &Value) -> FilterValues {
    let mut values = FilterValues::default();
    for group in groups(tree) {
        for test in tests_in_order(group) {
            push_distinct(&mut values.test_name, display_name(&field_text(test, "name")));
            push_distinct(&mut values.owner_list, field_text(test, "createdBy"));
            push_distinct(&mut values.owner_list, field_text(test, "modifiedBy"));
        }
    }
    values
}

fn push_distinct(values: &mut Vec<String>, value: String) {
    if !value.is_empty() && !values.contains(&value) {
        values.push(value);
    }
}

fn groups(tree: &Value) -> impl Iterator<Item = &Value> {
    children(tree).iter()
}

/// Every test under `node`, depth first, in document order.
fn tests_in_order(node: &Value) -> Vec<&Value> {
    let mut tests = Vec::new();
    let mut stack: Vec<&Value> = children(node).iter().rev().collect();
    while let Some(current) = stack.pop() {
        match current.get("type").and_then(Value::as_str) {
            Some(NODE_TEST) => tests.push(current),
            Some(NODE_FOLDER) => stack.extend(children(current).iter().rev()),
            _ => {}
        }
    }
    tests
}

fn children(node: &Value) -> &[Value] {
    node.get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn field_text(node: &Value, field: &str) -> String {
    match node.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn formatted_time(node: &Value, field: &str) -> String {
    node.get(field)
        .map(|time| field_text(time, "formatted"))
        .unwrap_or_default()
}

fn display_name(name: &str) -> String {
    name.strip_suffix(".xml").unwrap_or(name).to_string()
}
