use crate::cache::HelpTreeCache;
use crate::endpoints::HelpEndpoints;
use crate::error::Result;
use crate::loader::load_help_index;
use crate::page::{extract_command_links, format_help_page, ExtendedCommand, HelpPage};
use crate::source::HelpSource;
use crate::types::{BucketKey, ContentItem, HelpIndex, NodeEntry, SELF_SUBCATEGORY};
use serde::Serialize;
use std::sync::Arc;

pub const EXTENDED_COMMANDS_CATEGORY: &str = "perfecto";
pub const EXTENDED_COMMANDS_SUBCATEGORY: &str = "automation-testing";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub subcategories: Vec<String>,
}

/// Content of one requested subcategory, or the warning explaining why there is none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubcategoryContent {
    Items(Vec<ContentItem>),
    NotFound { warning: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HelpPageOutcome {
    Page(HelpPage),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpPageResult {
    pub help_id: String,
    /// Present only for table-of-contents pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_nodes: Option<Vec<NodeEntry>>,
    pub help_result: HelpPageOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpReadResult {
    pub category_id: String,
    pub subcategory_id: String,
    pub help_results: Vec<HelpPageResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdditionalHelpPages {
    pub category_id: String,
    pub subcategory_id: String,
    pub help_pages: Vec<SubcategoryContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendedCommandList {
    pub commands: Vec<ExtendedCommand>,
    pub additional_help_pages: AdditionalHelpPages,
}

/// Read side of the documentation site, backed by a lazily built index.
pub struct HelpCatalog {
    source: Arc<dyn HelpSource>,
    endpoints: HelpEndpoints,
    cache: HelpTreeCache,
}

impl HelpCatalog {
    pub fn new(source: Arc<dyn HelpSource>, endpoints: HelpEndpoints) -> Self {
        Self {
            source,
            endpoints,
            cache: HelpTreeCache::new(),
        }
    }

    pub fn endpoints(&self) -> &HelpEndpoints {
        &self.endpoints
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_populated()
    }

    /// Build the index on first use; later calls return the cached one.
    pub async fn ensure_loaded(&self) -> Result<&HelpIndex> {
        self.cache
            .get_or_load(|| load_help_index(self.source.as_ref(), &self.endpoints))
            .await
    }

    pub async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        let index = self.ensure_loaded().await?;
        Ok(index
            .tree
            .iter()
            .map(|(category, subs)| CategorySummary {
                category: category.clone(),
                subcategories: subs.keys().cloned().collect(),
            })
            .collect())
    }

    /// List the pages of each requested subcategory; an empty id means `self`.
    pub async fn list_category_content(
        &self,
        category_id: &str,
        subcategory_ids: &[String],
    ) -> Result<Vec<SubcategoryContent>> {
        let index = self.ensure_loaded().await?;
        Ok(subcategory_ids
            .iter()
            .map(|raw| {
                let subcategory_id = normalize_subcategory(raw);
                match index.subcategory(category_id, subcategory_id) {
                    Some(items) => SubcategoryContent::Items(items.to_vec()),
                    None => SubcategoryContent::NotFound {
                        warning: vec![format!(
                            "Category '{category_id}' and subcategory '{subcategory_id}' not found."
                        )],
                    },
                }
            })
            .collect())
    }

    /// Fetch and render each page. Page failures are reported per item.
    pub async fn read_help_info(
        &self,
        category_id: &str,
        subcategory_id: &str,
        help_ids: &[String],
    ) -> Result<HelpReadResult> {
        let index = self.ensure_loaded().await?;
        let subcategory_id = normalize_subcategory(subcategory_id);

        let mut help_results = Vec::with_capacity(help_ids.len());
        for help_id in help_ids {
            let url = self.endpoints.page_url(category_id, subcategory_id, help_id);
            let result = match self.source.fetch_text(&url).await {
                Ok(html) => {
                    let page = format_help_page(&html, &url);
                    let sub_nodes = page.is_table_of_contents().then(|| {
                        index
                            .child_entries(&BucketKey::new(category_id, subcategory_id, help_id))
                            .unwrap_or_default()
                    });
                    HelpPageResult {
                        help_id: help_id.clone(),
                        sub_nodes,
                        help_result: HelpPageOutcome::Page(page),
                    }
                }
                Err(err) => {
                    log::warn!("Failed to read help page {url}: {err}");
                    HelpPageResult {
                        help_id: help_id.clone(),
                        sub_nodes: None,
                        help_result: HelpPageOutcome::Error(format!("Error:{}", err.item_detail())),
                    }
                }
            };
            help_results.push(result);
        }

        Ok(HelpReadResult {
            category_id: category_id.to_string(),
            subcategory_id: subcategory_id.to_string(),
            help_results,
        })
    }

    /// List the RemoteWebDriver extended commands plus the automation-testing pages.
    pub async fn list_extended_commands(&self) -> Result<ExtendedCommandList> {
        let url = &self.endpoints.extended_commands_url;
        let html = self.source.fetch_text(url).await?;
        let commands = extract_command_links(&html, url)?;

        let help_pages = self
            .list_category_content(
                EXTENDED_COMMANDS_CATEGORY,
                &[EXTENDED_COMMANDS_SUBCATEGORY.to_string()],
            )
            .await?;

        Ok(ExtendedCommandList {
            commands,
            additional_help_pages: AdditionalHelpPages {
                category_id: EXTENDED_COMMANDS_CATEGORY.to_string(),
                subcategory_id: EXTENDED_COMMANDS_SUBCATEGORY.to_string(),
                help_pages,
            },
        })
    }

    pub async fn read_extended_command(&self, command_id: &str) -> Result<HelpPage> {
        let url = self.endpoints.extended_command_url(command_id);
        let html = self.source.fetch_text(&url).await?;
        Ok(format_help_page(&html, &url))
    }
}

fn normalize_subcategory(raw: &str) -> &str {
    if raw.is_empty() {
        SELF_SUBCATEGORY
    } else {
        raw
    }
}
