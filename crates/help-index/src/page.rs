//! Help page rendering: HTML in, Markdown out.

use crate::error::Result;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Trailing text of pages that only list their child pages.
pub const TOC_MARKER: &str = "In this section:";

const CONTENT_SELECTORS: &[&str] = &["#mc-main-content", "[role=\"main\"]", "main", "body"];

/// A documentation page converted for agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpPage {
    pub help_url: String,
    pub help_content: String,
}

impl HelpPage {
    /// Whether the page body is only a pointer to its children.
    pub fn is_table_of_contents(&self) -> bool {
        self.help_content.trim_end().ends_with(TOC_MARKER)
    }
}

/// Convert the main content of a help page to Markdown.
pub fn format_help_page(html: &str, url: &str) -> HelpPage {
    let document = Html::parse_document(html);
    let content = main_content(&document)
        .map(|element| element.html())
        .unwrap_or_else(|| document.html());

    HelpPage {
        help_url: url.to_string(),
        help_content: tidy_markdown(&html2md::parse_html(&content)),
    }
}

fn main_content(document: &Html) -> Option<ElementRef<'_>> {
    CONTENT_SELECTORS.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        document.select(&selector).next()
    })
}

fn tidy_markdown(markdown: &str) -> String {
    let mut out = markdown
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    while out.contains("\n\n\n") {
        out = out.replace("\n\n\n", "\n\n");
    }
    out.trim().to_string()
}

/// One RemoteWebDriver extension listed on the extended commands page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedCommand {
    pub command_id: String,
    pub name: String,
    pub command_url: String,
}

/// Collect the relative `.htm` links of a command index page, in document order.
pub fn extract_command_links(html: &str, page_url: &str) -> Result<Vec<ExtendedCommand>> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);
    let Some(scope) = main_content(&document) else {
        return Ok(Vec::new());
    };
    let Ok(links) = Selector::parse("a[href]") else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::new();
    let mut commands = Vec::new();
    for link in scope.select(&links) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(command_id) = relative_page_stem(href) else {
            continue;
        };
        let name = link.text().collect::<Vec<_>>().join(" ");
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        if name.is_empty() || !seen.insert(command_id.to_string()) {
            continue;
        }
        commands.push(ExtendedCommand {
            command_id: command_id.to_string(),
            name,
            command_url: base.join(href)?.to_string(),
        });
    }
    Ok(commands)
}

fn relative_page_stem(href: &str) -> Option<&str> {
    // Anchors, absolute paths and anything with a scheme are not command pages.
    if href.starts_with('#') || href.starts_with('/') || href.contains(':') {
        return None;
    }
    let path = href.split(['#', '?']).next()?;
    let file = path.rsplit('/').next()?;
    file.strip_suffix(".htm").filter(|stem| !stem.is_empty())
}
