//! Perfecto MCP Server
//!
//! Exposes Perfecto documentation, AI Scriptless tests and skills to AI agents via MCP.
//!
//! ## Tools
//!
//! - `perfecto_help` - Browse the documentation tree and read pages
//! - `perfecto_ai_scriptless` - List and run AI Scriptless web tests
//! - `perfecto_ai_scriptless_mobile` - List and run AI Scriptless mobile tests
//! - `perfecto_skills` - Read skills and their resources
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "perfecto": {
//!       "command": "perfecto-mcp",
//!       "env": {
//!         "PERFECTO_CLOUD_NAME": "<cloud>",
//!         "PERFECTO_SECURITY_TOKEN": "<token>"
//!       }
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use rmcp::transport::stdio;
use rmcp::ServiceExt;

mod config;
mod http;
mod tools;

use config::ServerConfig;
use tools::PerfectoService;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure logging to stderr only (stdout is for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .filter_module("html5ever", log::LevelFilter::Off)
        .init();

    log::info!("Starting Perfecto MCP server");

    let config = ServerConfig::from_env();
    if config.token.is_none() {
        log::warn!("No Perfecto security token configured; only help and skills tools will work");
    }

    // Create and start the MCP server
    let service = PerfectoService::new(config).context("Failed to initialise Perfecto service")?;
    let server = service.serve(stdio()).await?;

    // Wait for shutdown
    server.waiting().await?;

    log::info!("Perfecto MCP server stopped");
    Ok(())
}
