use crate::tools::scriptless::TestFilters;
use serde::Deserialize;
use serde_json::{Map, Value};

fn first_page() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListTestsArgs {
    #[serde(flatten)]
    pub(crate) filters: TestFilters,
    #[serde(default = "first_page")]
    pub(crate) page_index: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FilterValuesArgs {
    #[serde(default)]
    pub(crate) filter_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecuteWebTestArgs {
    #[serde(default)]
    pub(crate) test_id: String,
    #[serde(default)]
    pub(crate) device_type: String,
    #[serde(default)]
    pub(crate) device_under_test: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecuteMobileTestArgs {
    #[serde(default)]
    pub(crate) test_id: String,
    #[serde(default)]
    pub(crate) device_id: String,
}
