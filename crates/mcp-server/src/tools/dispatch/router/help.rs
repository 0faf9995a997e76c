use super::super::{CallToolResult, McpError, PerfectoService};
use super::envelope::{finish, success, unknown_action};
use crate::tools::schemas::action::ActionRequest;
use crate::tools::schemas::help::{CategoryContentArgs, ExtendedCommandArgs, ReadHelpArgs};
use perfecto_help_index::HelpCatalog;
use perfecto_protocol::ToolResult;

const MANAGER: &str = "help manager";
const CATEGORIES_INFO: &str = "A list of subcategories is provided for each category";

/// Browse the documentation catalog. The index is built on the first call that needs it.
pub(in crate::tools::dispatch) async fn help(
    service: &PerfectoService,
    request: ActionRequest,
) -> Result<CallToolResult, McpError> {
    finish(run(&service.state.help, &request).await)
}

async fn run(catalog: &HelpCatalog, request: &ActionRequest) -> anyhow::Result<ToolResult> {
    match request.action.as_str() {
        "list_help_categories" => {
            Ok(success(&catalog.list_categories().await?)?.with_info(CATEGORIES_INFO))
        }
        "list_help_category_content" => {
            let args: CategoryContentArgs = request.parse_args()?;
            let content = catalog
                .list_category_content(&args.category_id, &args.subcategory_id_list)
                .await?;
            success(&content)
        }
        "read_help_info" => {
            let args: ReadHelpArgs = request.parse_args()?;
            let read = catalog
                .read_help_info(&args.category_id, &args.subcategory_id, &args.help_id_list)
                .await?;
            success(&read)
        }
        "list_real_devices_extended_commands" => success(&catalog.list_extended_commands().await?),
        "read_real_devices_extended_command_info" => {
            let args: ExtendedCommandArgs = request.parse_args()?;
            success(&catalog.read_extended_command(&args.command_id).await?)
        }
        other => Ok(unknown_action(other, MANAGER)),
    }
}
