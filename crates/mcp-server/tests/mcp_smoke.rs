use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use rmcp::model::{ReadResourceRequestParam, ResourceContents};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;

mod support;

fn write_skills(root: &std::path::Path) -> Result<()> {
    let skill = root.join("appium");
    std::fs::create_dir_all(skill.join("examples")).context("mkdir skill")?;
    std::fs::write(
        skill.join("SKILL.md"),
        "---\nname: appium\ndescription: Run Appium tests on Perfecto devices\n---\n# Appium on Perfecto\n",
    )
    .context("write SKILL.md")?;
    std::fs::write(skill.join("examples").join("caps.json"), "{\"platformName\":\"Android\"}")
        .context("write caps.json")?;
    Ok(())
}

#[tokio::test]
async fn mcp_exposes_the_perfecto_tools() -> Result<()> {
    let tmp = tempfile::tempdir().context("tempdir")?;
    let service = support::start_mcp_server(tmp.path()).await?;

    let tools = tokio::time::timeout(
        Duration::from_secs(10),
        service.list_tools(Default::default()),
    )
    .await
    .context("timeout listing tools")??;
    let tool_names: HashSet<&str> = tools.tools.iter().map(|t| t.name.as_ref()).collect();
    for expected in [
        "perfecto_help",
        "perfecto_ai_scriptless",
        "perfecto_ai_scriptless_mobile",
        "perfecto_skills",
    ] {
        assert!(
            tool_names.contains(expected),
            "missing tool '{expected}' (available: {tool_names:?})"
        );
    }

    service.cancel().await.context("shutdown mcp service")?;
    Ok(())
}

#[tokio::test]
async fn skills_are_listed_and_read_from_the_skills_dir() -> Result<()> {
    let tmp = tempfile::tempdir().context("tempdir")?;
    write_skills(tmp.path())?;
    let service = support::start_mcp_server(tmp.path()).await?;

    let listed = support::call_tool(&service, "perfecto_skills", json!({ "action": "list_skills" }))
        .await?;
    assert!(!listed.is_error);
    assert_eq!(
        listed.body,
        json!({
            "result": [{
                "name": "appium",
                "description": "Run Appium tests on Perfecto devices",
                "uri": "skills-appium://SKILL.md",
            }]
        })
    );

    let read = support::call_tool(
        &service,
        "perfecto_skills",
        json!({ "action": "read_skill", "args": { "skill_name": "appium" } }),
    )
    .await?;
    assert_eq!(read.body["result"]["path"], "SKILL.md");
    assert!(read.body["result"]["content"]
        .as_str()
        .unwrap_or_default()
        .contains("# Appium on Perfecto"));

    let resources = support::call_tool(
        &service,
        "perfecto_skills",
        json!({ "action": "list_skill_resources", "args": { "skill_name": "appium" } }),
    )
    .await?;
    assert_eq!(
        resources.body["result"]["resources"],
        json!(["skills-appium://SKILL.md", "skills-appium://examples/caps.json"])
    );

    let resource = support::call_tool(
        &service,
        "perfecto_skills",
        json!({
            "action": "read_skill_resource_uri",
            "args": { "skill_resource_uri": "skills-appium://examples/caps.json" },
        }),
    )
    .await?;
    assert_eq!(
        resource.body["result"]["content"],
        "{\"platformName\":\"Android\"}"
    );

    let escape = support::call_tool(
        &service,
        "perfecto_skills",
        json!({
            "action": "read_skill_resource_uri",
            "args": { "skill_resource_uri": "skills-appium://../../etc/passwd" },
        }),
    )
    .await?;
    assert!(escape.is_error);
    assert!(escape.body.get("result").is_none());

    service.cancel().await.context("shutdown mcp service")?;
    Ok(())
}

#[tokio::test]
async fn skill_files_are_readable_as_mcp_resources() -> Result<()> {
    let tmp = tempfile::tempdir().context("tempdir")?;
    write_skills(tmp.path())?;
    let service = support::start_mcp_server(tmp.path()).await?;

    let capabilities = &service.peer_info().context("server info")?.capabilities;
    assert!(capabilities.resources.is_some());

    let templates = tokio::time::timeout(
        Duration::from_secs(10),
        service.list_resource_templates(None),
    )
    .await
    .context("timeout listing resource templates")??;
    let uri_templates: Vec<&str> = templates
        .resource_templates
        .iter()
        .map(|t| t.raw.uri_template.as_str())
        .collect();
    assert_eq!(uri_templates, vec!["skills-{skill_name}://{path}"]);

    let read = tokio::time::timeout(
        Duration::from_secs(10),
        service.read_resource(ReadResourceRequestParam {
            uri: "skills-appium://examples/caps.json".to_string(),
        }),
    )
    .await
    .context("timeout reading resource")??;
    match read.contents.as_slice() {
        [ResourceContents::TextResourceContents { uri, text, .. }] => {
            assert_eq!(uri, "skills-appium://examples/caps.json");
            assert_eq!(text, "{\"platformName\":\"Android\"}");
        }
        other => panic!("unexpected resource contents: {other:?}"),
    }

    let missing = tokio::time::timeout(
        Duration::from_secs(10),
        service.read_resource(ReadResourceRequestParam {
            uri: "skills-appium://missing.md".to_string(),
        }),
    )
    .await
    .context("timeout reading missing resource")?;
    assert!(missing.is_err());

    service.cancel().await.context("shutdown mcp service")?;
    Ok(())
}

#[tokio::test]
async fn scriptless_without_token_explains_how_to_configure_one() -> Result<()> {
    let tmp = tempfile::tempdir().context("tempdir")?;
    let service = support::start_mcp_server(tmp.path()).await?;

    for tool in ["perfecto_ai_scriptless", "perfecto_ai_scriptless_mobile"] {
        let reply = support::call_tool(&service, tool, json!({ "action": "list_tests" })).await?;
        assert!(reply.is_error, "{tool} should fail without a token");
        assert_eq!(
            reply.body,
            json!({
                "error": "No API token. Set PERFECTO_SECURITY_TOKEN or PERFECTO_SECURITY_TOKEN_FILE env var with security token."
            })
        );
    }

    service.cancel().await.context("shutdown mcp service")?;
    Ok(())
}

#[tokio::test]
async fn unknown_actions_are_reported_per_tool() -> Result<()> {
    let tmp = tempfile::tempdir().context("tempdir")?;
    let service = support::start_mcp_server(tmp.path()).await?;

    let help = support::call_tool(&service, "perfecto_help", json!({ "action": "dance" })).await?;
    assert!(help.is_error);
    assert_eq!(
        help.body,
        json!({ "error": "Action dance not found in help manager tool" })
    );

    let mobile = support::call_tool(
        &service,
        "perfecto_ai_scriptless_mobile",
        json!({ "action": "dance" }),
    )
    .await?;
    assert_eq!(
        mobile.body["error"],
        "Action dance not found in AI Scriptless Mobile manager tool"
    );

    service.cancel().await.context("shutdown mcp service")?;
    Ok(())
}

#[tokio::test]
async fn unreachable_help_site_is_a_tool_error_not_a_crash() -> Result<()> {
    let tmp = tempfile::tempdir().context("tempdir")?;
    let service = support::start_mcp_server(tmp.path()).await?;

    let reply = support::call_tool(
        &service,
        "perfecto_help",
        json!({ "action": "list_help_categories" }),
    )
    .await?;
    assert!(reply.is_error);
    let error = reply.body["error"].as_str().unwrap_or_default();
    assert!(error.starts_with("Error: "), "{error}");

    // The server is still healthy after the failed build.
    let skills = support::call_tool(&service, "perfecto_skills", json!({ "action": "list_skills" }))
        .await?;
    assert!(!skills.is_error);

    service.cancel().await.context("shutdown mcp service")?;
    Ok(())
}
