use super::super::{CallToolResult, McpError, PerfectoService};
use super::envelope::{finish, success, unknown_action};
use crate::tools::schemas::action::ActionRequest;
use crate::tools::schemas::skills::{SkillArgs, SkillResourceArgs};
use crate::tools::skills_store::{parse_skill_uri, SkillsStore, SKILL_FILE};
use perfecto_protocol::ToolResult;
use serde_json::json;

const MANAGER: &str = "skills manager";

pub(in crate::tools::dispatch) async fn skills(
    service: &PerfectoService,
    request: ActionRequest,
) -> Result<CallToolResult, McpError> {
    finish(run(&service.state.skills, &request))
}

fn run(store: &SkillsStore, request: &ActionRequest) -> anyhow::Result<ToolResult> {
    match request.action.as_str() {
        "list_skills" => {
            let listing = store.listing();
            let mut result = success(&listing.skills)?;
            result.error = listing.first_error.clone();
            Ok(result)
        }
        "read_skill" => {
            let args: SkillArgs = request.parse_args()?;
            let content = store.read_skill(&args.skill_name)?;
            Ok(file_result(&args.skill_name, SKILL_FILE, content))
        }
        "list_skill_resources" => {
            let args: SkillArgs = request.parse_args()?;
            let resources = store.list_resources(&args.skill_name)?;
            Ok(ToolResult::ok(json!({
                "skill_name": args.skill_name,
                "resources": resources,
            })))
        }
        "read_skill_resource_uri" => {
            let args: SkillResourceArgs = request.parse_args()?;
            let Some((skill_name, path)) = parse_skill_uri(&args.skill_resource_uri) else {
                return Ok(ToolResult::error(format!(
                    "Invalid Skill URI: {}",
                    args.skill_resource_uri
                )));
            };
            let content = store.read_file(skill_name, path)?;
            Ok(file_result(skill_name, path, content))
        }
        other => Ok(unknown_action(other, MANAGER)),
    }
}

fn file_result(skill_name: &str, path: &str, content: String) -> ToolResult {
    ToolResult::ok(json!({
        "skill_name": skill_name,
        "path": path,
        "content": content,
    }))
}
