//! MCP tool dispatch for the Perfecto server.

use super::catalog::server_instructions;
use super::schemas::action::ActionRequest;
use super::scriptless::ScriptlessKind;
use super::skills_store::SkillsStore;
use crate::config::ServerConfig;
use crate::http::HttpClient;
use anyhow::Result;
use perfecto_help_index::{HelpCatalog, HelpEndpoints};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ListResourceTemplatesResult, PaginatedRequestParam,
    ReadResourceRequestParam, ReadResourceResult, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler};
use std::sync::Arc;

mod router;

/// Perfecto MCP Service
#[derive(Clone)]
pub struct PerfectoService {
    /// Tool router
    tool_router: ToolRouter<Self>,
    /// Process-wide state shared by every connection
    state: Arc<ServiceState>,
}

struct ServiceState {
    config: ServerConfig,
    http: HttpClient,
    /// Documentation index, built on first use
    help: HelpCatalog,
    skills: SkillsStore,
}

impl PerfectoService {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let http = HttpClient::new()?;
        let help = HelpCatalog::new(
            Arc::new(http.clone()),
            HelpEndpoints::with_base(&config.help_base_url),
        );
        let skills = SkillsStore::new(config.skills_dir.clone());
        log::debug!(
            "Help site {}, skills dir {}, token configured: {}",
            config.help_base_url,
            config.skills_dir.display(),
            config.token.is_some()
        );

        Ok(Self {
            tool_router: Self::tool_router(),
            state: Arc::new(ServiceState {
                config,
                http,
                help,
                skills,
            }),
        })
    }
}

#[tool_router]
impl PerfectoService {
    /// Perfecto documentation browser.
    #[tool(
        description = "Operations on documentation and help information.
Actions:
- list_help_categories: List all category_ids and for each of them list their subcategory_ids.
- list_help_category_content: List all help_id list related with a category_id and subcategory_id.
    args(dict): Dictionary with the following required parameters:
        category_id (str, default='home'): The category id.
        subcategory_id_list (list[str]): The subcategory id list.
- read_help_info: Read the content of a help_id providing category_id, subcategory_id and help_id.
    args(dict): Dictionary with the following required parameters:
        category_id (str, default='home'): The category id.
        subcategory_id (str, default=''): The sub-category id.
        help_id_list (list[str]): The help id list to read.
- list_real_devices_extended_commands: Perfecto provides support for extended RemoteWebDriver commands. You can use these commands as extensions to the default SDK. Perfecto extensions are also known as function references (FR).
- read_real_devices_extended_command_info: Read the detailed command information.
    args(dict): Dictionary with the following required parameters:
        command_id (str): The command id.
Hints:
- Pages ending with 'In this section:' list their children in sub_nodes; read those next.
- Always render url attributes (like command_url) as markdown links."
    )]
    pub async fn perfecto_help(
        &self,
        Parameters(request): Parameters<ActionRequest>,
    ) -> Result<CallToolResult, McpError> {
        router::help::help(self, request).await
    }

    /// AI Scriptless web tests.
    #[tool(
        description = "Operations on AI Scriptless web tests.
Actions:
- list_tests: List the AI Scriptless tests available in Perfecto, 50 per page.
    args(dict): Dictionary with the following optional filter parameters:
        test_name (str): The test name to filter (case-insensitive substring).
        visibility (str, values=['PUBLIC', 'PRIVATE']): PUBLIC=all public tests, PRIVATE=my private tests.
        owner_list (list[str]): Owners to keep, use list_filter_values with 'owner_list' first.
        page_index (int, default=1): The page number. When has_more is true, ask the user before reading the next page.
- list_filter_values: List the values accepted by the list_tests filters.
    args(dict): Dictionary with the following required parameters:
        filter_names (list[str], values=['test_name', 'owner_list']): The filter names.
- execute_test: Execute a configured AI Scriptless test.
    args(dict): Dictionary with the following required parameters:
        test_id (str): The test id to start.
        device_type (str, values=['real', 'virtual', 'desktop']): The device type.
        device_under_test (dict): The device under test (DUT).
            real: {device_id}
            virtual: {platformName, manufacturer, model, platformVersion}
            desktop: {platformName, platformVersion, browserName, browserVersion, resolution, location}
Hints:
- Call list_filter_values before using filters in list_tests.
- Check that the device is available and not in use before executing a test."
    )]
    pub async fn perfecto_ai_scriptless(
        &self,
        Parameters(request): Parameters<ActionRequest>,
    ) -> Result<CallToolResult, McpError> {
        router::ai_scriptless::ai_scriptless(self, request, ScriptlessKind::Web).await
    }

    /// AI Scriptless mobile tests.
    #[tool(
        description = "Operations on AI Scriptless mobile tests.
Actions:
- list_tests: List the AI Scriptless mobile tests available in Perfecto, 50 per page.
    args(dict): Dictionary with the following optional filter parameters:
        test_name (str): The test name to filter (case-insensitive substring).
        visibility (str, values=['PUBLIC', 'PRIVATE']): PUBLIC=all public tests, PRIVATE=my private tests.
        owner_list (list[str]): Owners to keep, use list_filter_values with 'owner_list' first.
        page_index (int, default=1): The page number. When has_more is true, ask the user before reading the next page.
- list_filter_values: List the values accepted by the list_tests filters.
    args(dict): Dictionary with the following required parameters:
        filter_names (list[str], values=['test_name', 'owner_list']): The filter names.
- execute_test: Execute a configured AI Scriptless mobile test on a real device.
    args(dict): Dictionary with the following required parameters:
        test_id (str): The test id to start.
        device_id (str): The real device id to run the test on.
Hints:
- Call list_filter_values before using filters in list_tests.
- Check that the device is available and not in use before executing a test."
    )]
    pub async fn perfecto_ai_scriptless_mobile(
        &self,
        Parameters(request): Parameters<ActionRequest>,
    ) -> Result<CallToolResult, McpError> {
        router::ai_scriptless::ai_scriptless(self, request, ScriptlessKind::Mobile).await
    }

    /// Perfecto skills.
    #[tool(
        description = "Operations to obtain Skills around Perfecto.
Actions:
- list_skills: List all the Skills available to learn.
- read_skill: Read the SKILL.md of a skill.
    args(dict): Dictionary with the following required parameters:
        skill_name (str): The skill name.
- list_skill_resources: List every resource of a skill as a skill resource URI.
    args(dict): Dictionary with the following required parameters:
        skill_name (str): The skill name.
- read_skill_resource_uri: Read a file from a skill resource URI (skills-{skill_name}://{resource_path}).
    args(dict): Dictionary with the following required parameters:
        skill_resource_uri (str): The skill resource URI."
    )]
    pub async fn perfecto_skills(
        &self,
        Parameters(request): Parameters<ActionRequest>,
    ) -> Result<CallToolResult, McpError> {
        router::skills::skills(self, request).await
    }
}

#[tool_handler]
impl ServerHandler for PerfectoService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(server_instructions()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(router::resources::templates())
    }

    /// Skill files, addressed as `skills-<skill_name>://<path>`.
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        router::resources::read(&self.state.skills, &request.uri)
    }
}
