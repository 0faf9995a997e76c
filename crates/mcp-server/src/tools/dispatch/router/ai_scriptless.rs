use super::super::{CallToolResult, McpError, PerfectoService, ServiceState};
use super::envelope::{finish, success, unknown_action};
use crate::config::PerfectoToken;
use crate::http::ApiError;
use crate::tools::schemas::action::ActionRequest;
use crate::tools::schemas::ai_scriptless::{
    ExecuteMobileTestArgs, ExecuteWebTestArgs, FilterValuesArgs, ListTestsArgs,
};
use crate::tools::scriptless::{
    collect_filter_values, format_tests, ScriptlessKind, FILTER_OWNER_LIST, FILTER_TEST_NAME,
    PAGE_SIZE,
};
use perfecto_protocol::{PaginationResult, ToolResult};
use reqwest::Method;
use serde_json::{json, Map, Value};

const INVALID_DUT_MESSAGE: &str = "Invalid device_type or device_under_test value.";
const INVALID_DEVICE_ID_MESSAGE: &str = "Invalid device_id value.";

/// AI scriptless tests of either product; both share one tree format and one flow.
pub(in crate::tools::dispatch) async fn ai_scriptless(
    service: &PerfectoService,
    request: ActionRequest,
    kind: ScriptlessKind,
) -> Result<CallToolResult, McpError> {
    finish(run(&service.state, &request, kind).await)
}

async fn run(
    state: &ServiceState,
    request: &ActionRequest,
    kind: ScriptlessKind,
) -> anyhow::Result<ToolResult> {
    match request.action.as_str() {
        "list_tests" => {
            let args: ListTestsArgs = request.parse_args()?;
            let (token, host) = credentials(state)?;
            let tree = state
                .http
                .api_request(Some(token), Method::GET, &kind.tree_url(&host), None)
                .await?;

            let page_index = args.page_index.max(1);
            let skip = PAGE_SIZE * (page_index - 1);
            let page = format_tests(&tree, &args.filters, skip, PAGE_SIZE);
            success(&PaginationResult::for_page(
                page.lines,
                page_index,
                PAGE_SIZE,
                page.has_more,
            ))
        }
        "list_filter_values" => {
            let args: FilterValuesArgs = request.parse_args()?;
            let (token, host) = credentials(state)?;
            let tree = state
                .http
                .api_request(Some(token), Method::GET, &kind.tree_url(&host), None)
                .await?;

            let values = collect_filter_values(&tree);
            let mut selected = Map::new();
            let mut warnings = Vec::new();
            for name in &args.filter_names {
                match values.get(name) {
                    Some(found) => {
                        selected.insert(name.clone(), json!(found));
                    }
                    None => warnings.push(format!(
                        "Unknown filter name '{name}'. Valid values: {FILTER_TEST_NAME}, {FILTER_OWNER_LIST}"
                    )),
                }
            }
            let mut result = ToolResult::ok(Value::Object(selected));
            if !warnings.is_empty() {
                result.append_warnings(warnings);
            }
            Ok(result)
        }
        "execute_test" => {
            let (token, host) = credentials(state)?;
            let (test_id, dut) = match kind {
                ScriptlessKind::Web => {
                    let args: ExecuteWebTestArgs = request.parse_args()?;
                    let Some(dut) = web_device_under_test(&args.device_type, &args.device_under_test)
                    else {
                        return Ok(ToolResult::error(INVALID_DUT_MESSAGE));
                    };
                    (args.test_id, dut)
                }
                ScriptlessKind::Mobile => {
                    let args: ExecuteMobileTestArgs = request.parse_args()?;
                    if args.device_id.trim().is_empty() {
                        return Ok(ToolResult::error(INVALID_DEVICE_ID_MESSAGE));
                    }
                    (args.test_id, args.device_id)
                }
            };

            let body = execution_body(&test_id, &dut);
            log::info!("Starting scriptless test {test_id} on {dut}");
            let started = state
                .http
                .api_request(Some(token), Method::POST, &kind.execution_url(&host), Some(&body))
                .await?;
            Ok(ToolResult::ok(started))
        }
        other => Ok(unknown_action(other, kind.manager_label())),
    }
}

fn credentials(state: &ServiceState) -> Result<(&PerfectoToken, String), ApiError> {
    let token = state.config.token.as_ref().ok_or(ApiError::MissingToken)?;
    let host = token.cloud_host().ok_or(ApiError::MissingCloudName)?;
    Ok((token, host))
}

/// Real devices are addressed by id, virtual and desktop ones by their compact JSON description.
fn web_device_under_test(device_type: &str, device: &Map<String, Value>) -> Option<String> {
    let dut = match device_type {
        "real" => device.get("device_id")?.as_str()?.to_string(),
        "virtual" | "desktop" if !device.is_empty() => {
            serde_json::to_string(&Value::Object(device.clone())).ok()?
        }
        _ => return None,
    };
    (!dut.trim().is_empty()).then_some(dut)
}

fn execution_body(test_id: &str, dut: &str) -> Value {
    json!({
        "params": { "DUT": dut },
        "testKey": test_id,
        "triggerType": "Manual",
    })
}
