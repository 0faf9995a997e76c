/// Default root of the public documentation site.
pub const DEFAULT_HELP_BASE_URL: &str = "https://help.perfecto.io/perfecto-help/";

/// URLs of the documentation site the catalog reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEndpoints {
    /// Root TOC payload (chunk count, prefix, node tree).
    pub index_url: String,
    /// Directory holding the TOC chunk files.
    pub toc_base_url: String,
    /// Directory holding the pages, one `.htm` per help id.
    pub content_base_url: String,
    /// Page listing the RemoteWebDriver extended commands.
    pub extended_commands_url: String,
    /// Directory holding one page per extended command.
    pub extended_command_base_url: String,
}

impl Default for HelpEndpoints {
    fn default() -> Self {
        Self::with_base(DEFAULT_HELP_BASE_URL)
    }
}

impl HelpEndpoints {
    /// Derive every endpoint from the site root.
    pub fn with_base(base: &str) -> Self {
        let base = format!("{}/", base.trim_end_matches('/'));
        let content = format!("{base}content/");
        Self {
            index_url: format!("{base}Data/Tocs/perfecto_help.js"),
            toc_base_url: format!("{base}Data/Tocs/"),
            extended_commands_url: format!(
                "{content}perfecto/automation-testing/perfecto_extensions.htm"
            ),
            extended_command_base_url: format!("{content}perfecto/automation-testing/"),
            content_base_url: content,
        }
    }

    pub fn chunk_url(&self, prefix: &str, index: usize) -> String {
        format!("{}{prefix}{index}.js", self.toc_base_url)
    }

    /// Page URL for a bucketed help id; the `self` subcategory adds no path segment.
    pub fn page_url(&self, category: &str, subcategory: &str, help_id: &str) -> String {
        let mut url = format!("{}{category}/", self.content_base_url);
        if subcategory != crate::types::SELF_SUBCATEGORY {
            url.push_str(subcategory);
            url.push('/');
        }
        url.push_str(help_id);
        url.push_str(".htm");
        url
    }

    pub fn extended_command_url(&self, command_id: &str) -> String {
        format!("{}{command_id}.htm", self.extended_command_base_url)
    }
}
