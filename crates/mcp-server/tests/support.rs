#![allow(dead_code)]

use anyhow::{Context, Result};
use rmcp::{
    model::CallToolRequestParam,
    service::{RunningService, Service, ServiceExt},
    transport::TokioChildProcess,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

pub fn locate_perfecto_mcp_bin() -> Result<PathBuf> {
    if let Some(path) = option_env!("CARGO_BIN_EXE_perfecto-mcp") {
        return Ok(PathBuf::from(path));
    }

    // `.../target/{debug|release}/deps/<test>` → `.../target/{debug|release}/perfecto-mcp`
    if let Ok(exe) = std::env::current_exe() {
        if let Some(target_profile_dir) = exe.parent().and_then(|p| p.parent()) {
            let candidate = target_profile_dir.join("perfecto-mcp");
            if candidate.exists() {
                return Ok(candidate);
            }
        }
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir
        .ancestors()
        .nth(2)
        .context("failed to resolve repo root from CARGO_MANIFEST_DIR")?;
    for rel in ["target/debug/perfecto-mcp", "target/release/perfecto-mcp"] {
        let candidate = repo_root.join(rel);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    anyhow::bail!("failed to locate perfecto-mcp binary; build with: cargo build -p perfecto-mcp")
}

/// Start the server without credentials, with skills read from `skills_dir` and the help site
/// pointed at a port nothing listens on.
pub async fn start_mcp_server(
    skills_dir: &Path,
) -> Result<RunningService<rmcp::RoleClient, impl Service<rmcp::RoleClient>>> {
    let bin = locate_perfecto_mcp_bin()?;

    let mut cmd = Command::new(bin);
    cmd.env_remove("PERFECTO_SECURITY_TOKEN");
    cmd.env_remove("PERFECTO_SECURITY_TOKEN_FILE");
    cmd.env_remove("PERFECTO_CLOUD_NAME");
    cmd.env("PERFECTO_SKILLS_DIR", skills_dir);
    cmd.env("PERFECTO_HELP_BASE_URL", "http://127.0.0.1:9/perfecto-help/");
    cmd.env("RUST_LOG", "warn");

    let transport = TokioChildProcess::new(cmd).context("spawn mcp server")?;
    tokio::time::timeout(Duration::from_secs(10), ().serve(transport))
        .await
        .context("timeout starting MCP server")?
        .context("start MCP server")
}

pub struct ToolReply {
    pub is_error: bool,
    pub body: serde_json::Value,
}

pub async fn call_tool(
    service: &RunningService<rmcp::RoleClient, impl Service<rmcp::RoleClient>>,
    name: &str,
    args: serde_json::Value,
) -> Result<ToolReply> {
    let result = tokio::time::timeout(
        Duration::from_secs(30),
        service.call_tool(CallToolRequestParam {
            name: name.to_string().into(),
            arguments: args.as_object().cloned(),
        }),
    )
    .await
    .context("timeout calling tool")?
    .context("call tool")?;

    let text = result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.as_str())
        .context("tool did not return text content")?;
    Ok(ToolReply {
        is_error: result.is_error == Some(true),
        body: serde_json::from_str(text).context("tool text is not JSON")?,
    })
}
