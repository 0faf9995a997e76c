pub(crate) mod action;
pub(crate) mod ai_scriptless;
pub(crate) mod help;
pub(crate) mod skills;
