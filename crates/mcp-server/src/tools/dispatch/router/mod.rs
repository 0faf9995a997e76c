// Per-tool dispatch functions used by the MCP tool router.

pub(super) mod ai_scriptless;
pub(super) mod envelope;
pub(super) mod help;
pub(super) mod resources;
pub(super) mod skills;
