use serde::Deserialize;

const DEFAULT_CATEGORY: &str = "home";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryContentArgs {
    #[serde(default = "default_category")]
    pub(crate) category_id: String,
    #[serde(default)]
    pub(crate) subcategory_id_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReadHelpArgs {
    #[serde(default = "default_category")]
    pub(crate) category_id: String,
    /// Empty means the category's own pages.
    #[serde(default)]
    pub(crate) subcategory_id: String,
    #[serde(default)]
    pub(crate) help_id_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtendedCommandArgs {
    pub(crate) command_id: String,
}
