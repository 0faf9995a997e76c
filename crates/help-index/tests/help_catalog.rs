use async_trait::async_trait;
use perfecto_help_index::{
    HelpCatalog, HelpEndpoints, HelpIndexError, HelpPageOutcome, HelpSource, NodeEntry,
    SubcategoryContent,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const BASE: &str = "https://help.test/";

#[derive(Default)]
struct FakeSite {
    pages: Mutex<HashMap<String, String>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl FakeSite {
    fn with_pages(pages: &[(&str, &str)]) -> Arc<Self> {
        let site = Self::default();
        for (url, body) in pages {
            site.put(url, body);
        }
        Arc::new(site)
    }

    fn put(&self, url: &str, body: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl HelpSource for FakeSite {
    async fn fetch_text(&self, url: &str) -> perfecto_help_index::Result<String> {
        // Give concurrent callers a chance to interleave.
        tokio::task::yield_now().await;
        *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| HelpIndexError::Status {
                url: url.to_string(),
                status: 404,
                body: "Not found".to_string(),
            })
    }
}

fn endpoints() -> HelpEndpoints {
    HelpEndpoints::with_base(BASE)
}

fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

const ROOT: &str = "define({numchunks:2,prefix:'perfecto_help_Chunk',tree:{n:[{i:'t1',c:0},{i:'t2',c:0}]}});";
const CHUNK_0: &str =
    "define({'/content/perfecto/automation-testing/intro.htm':{i:['t1'],t:['Intro']}});";
const CHUNK_1: &str = "define({'/content/perfecto/automation-testing/intro.htm':{i:['t2'],t:['Intro again']},'/content/home/___.htm':{i:['t9'],t:['hidden']}});";

fn two_chunk_site() -> Arc<FakeSite> {
    FakeSite::with_pages(&[
        (&url("Data/Tocs/perfecto_help.js"), ROOT),
        (&url("Data/Tocs/perfecto_help_Chunk0.js"), CHUNK_0),
        (&url("Data/Tocs/perfecto_help_Chunk1.js"), CHUNK_1),
    ])
}

#[tokio::test]
async fn first_record_wins_in_indices_but_both_are_listed() {
    let site = two_chunk_site();
    let catalog = HelpCatalog::new(site.clone(), endpoints());

    let index = catalog.ensure_loaded().await.unwrap();

    let listed = index.subcategory("perfecto", "automation-testing").unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|item| item.help_id == "intro"));
    assert_eq!(listed[0].help_tree_id, "t1");
    assert_eq!(listed[1].help_tree_id, "t2");

    assert_eq!(index.items["perfecto:automation-testing:intro"], "t1");
    assert_eq!(index.nodes.keys().collect::<Vec<_>>(), vec!["t1"]);
    assert!(!index.tree.contains_key("home"));
}

#[tokio::test]
async fn build_runs_once_for_sequential_and_concurrent_callers() {
    let site = two_chunk_site();
    let catalog = HelpCatalog::new(site.clone(), endpoints());

    let wanted = ["automation-testing".to_string()];
    let (a, b, c) = tokio::join!(
        catalog.list_categories(),
        catalog.list_categories(),
        catalog.list_category_content("perfecto", &wanted)
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());

    let before = catalog.ensure_loaded().await.unwrap().clone();
    catalog.list_categories().await.unwrap();
    assert_eq!(catalog.ensure_loaded().await.unwrap(), &before);

    assert_eq!(site.hits(&url("Data/Tocs/perfecto_help.js")), 1);
    assert_eq!(site.hits(&url("Data/Tocs/perfecto_help_Chunk0.js")), 1);
    assert_eq!(site.hits(&url("Data/Tocs/perfecto_help_Chunk1.js")), 1);
}

#[tokio::test]
async fn failed_chunk_fails_the_call_and_a_later_call_retries() {
    let site = FakeSite::with_pages(&[
        (&url("Data/Tocs/perfecto_help.js"), ROOT),
        (&url("Data/Tocs/perfecto_help_Chunk0.js"), CHUNK_0),
    ]);
    let catalog = HelpCatalog::new(site.clone(), endpoints());

    let err = catalog.list_categories().await.unwrap_err();
    assert!(matches!(err, HelpIndexError::Status { status: 404, .. }));
    assert!(!catalog.is_loaded());

    site.put(&url("Data/Tocs/perfecto_help_Chunk1.js"), CHUNK_1);
    let categories = catalog.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].category, "perfecto");
    assert_eq!(categories[0].subcategories, vec!["automation-testing"]);
    assert_eq!(site.hits(&url("Data/Tocs/perfecto_help.js")), 2);
}

#[tokio::test]
async fn missing_category_is_a_warning_entry() {
    let site = two_chunk_site();
    let catalog = HelpCatalog::new(site, endpoints());
    let before = catalog.ensure_loaded().await.unwrap().clone();

    let content = catalog
        .list_category_content(
            "perfecto",
            &[
                "automation-testing".to_string(),
                String::new(),
                "nope".to_string(),
            ],
        )
        .await
        .unwrap();

    assert!(matches!(&content[0], SubcategoryContent::Items(items) if items.len() == 2));
    assert_eq!(
        content[1],
        SubcategoryContent::NotFound {
            warning: vec!["Category 'perfecto' and subcategory 'self' not found.".to_string()]
        }
    );
    assert_eq!(
        content[2],
        SubcategoryContent::NotFound {
            warning: vec!["Category 'perfecto' and subcategory 'nope' not found.".to_string()]
        }
    );
    assert_eq!(catalog.ensure_loaded().await.unwrap(), &before);
}

#[tokio::test]
async fn table_of_contents_pages_expand_to_their_children() {
    let root = "define({numchunks:1,tree:{n:[{i:1,c:0,n:[{i:2,c:0},{i:3,c:0}]}]}});";
    let chunk = "define({
        '/content/perfecto/automation-testing/intro.htm':{i:[1],t:['Intro']},
        '/content/perfecto/automation-testing/intro/setup.htm':{i:[2],t:['Setup']},
        '/content/perfecto/quick-start.htm':{i:[3],t:['Quick start']},
    });";
    let site = FakeSite::with_pages(&[
        (&url("Data/Tocs/perfecto_help.js"), root),
        (&url("Data/Tocs/perfecto_help_Chunk0.js"), chunk),
        (
            &url("content/perfecto/automation-testing/intro.htm"),
            "<html><body><div id=\"mc-main-content\"><h1>Intro</h1><p>In this section:</p></div></body></html>",
        ),
        (
            &url("content/perfecto/automation-testing/intro/setup.htm"),
            "<html><body><div id=\"mc-main-content\"><p>Install the agent.</p></div></body></html>",
        ),
    ]);
    let catalog = HelpCatalog::new(site, endpoints());

    let read = catalog
        .read_help_info(
            "perfecto",
            "automation-testing",
            &[
                "intro".to_string(),
                "intro/setup".to_string(),
                "missing".to_string(),
            ],
        )
        .await
        .unwrap();

    assert_eq!(read.category_id, "perfecto");
    assert_eq!(read.subcategory_id, "automation-testing");
    assert_eq!(read.help_results.len(), 3);

    let intro = &read.help_results[0];
    assert_eq!(
        intro.sub_nodes,
        Some(vec![
            NodeEntry {
                category: "perfecto".into(),
                subcategory: "automation-testing".into(),
                help_id: "intro/setup".into(),
                sub_nodes: Vec::new(),
            },
            NodeEntry {
                category: "perfecto".into(),
                subcategory: "self".into(),
                help_id: "quick-start".into(),
                sub_nodes: Vec::new(),
            },
        ])
    );

    let setup = &read.help_results[1];
    assert_eq!(setup.sub_nodes, None);
    match &setup.help_result {
        HelpPageOutcome::Page(page) => {
            assert!(page.help_content.contains("Install the agent."));
            assert_eq!(
                page.help_url,
                url("content/perfecto/automation-testing/intro/setup.htm")
            );
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(
        read.help_results[2].help_result,
        HelpPageOutcome::Error("Error:Not found".to_string())
    );
}

#[tokio::test]
async fn extended_commands_include_automation_testing_pages() {
    let site = two_chunk_site();
    let endpoints = endpoints();
    site.put(
        &endpoints.extended_commands_url,
        r#"<html><body><div id="mc-main-content">
            <a href="mobile_application_install.htm">mobile:application:install</a>
            <a href="mobile_touch_tap.htm">mobile:touch:tap</a>
        </div></body></html>"#,
    );
    site.put(
        &endpoints.extended_command_url("mobile_touch_tap"),
        "<html><body><main><p>Taps the screen.</p></main></body></html>",
    );
    let catalog = HelpCatalog::new(site, endpoints);

    let listed = catalog.list_extended_commands().await.unwrap();
    let ids: Vec<&str> = listed
        .commands
        .iter()
        .map(|c| c.command_id.as_str())
        .collect();
    assert_eq!(ids, vec!["mobile_application_install", "mobile_touch_tap"]);
    assert_eq!(listed.additional_help_pages.category_id, "perfecto");
    assert!(matches!(
        &listed.additional_help_pages.help_pages[0],
        SubcategoryContent::Items(items) if items.len() == 2
    ));

    let page = catalog.read_extended_command("mobile_touch_tap").await.unwrap();
    assert!(page.help_content.contains("Taps the screen."));
}

#[tokio::test]
async fn non_object_chunks_are_malformed() {
    let site = FakeSite::with_pages(&[
        (&url("Data/Tocs/perfecto_help.js"), "define({numchunks:1});"),
        (&url("Data/Tocs/perfecto_help_Chunk0.js"), "define([1, 2]);"),
    ]);
    let catalog = HelpCatalog::new(site, endpoints());

    let err = catalog.list_categories().await.unwrap_err();
    assert!(matches!(err, HelpIndexError::Malformed { .. }), "{err}");
    assert!(!err.is_http());
}
