use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct SkillArgs {
    #[serde(default)]
    pub(crate) skill_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SkillResourceArgs {
    #[serde(default)]
    pub(crate) skill_resource_uri: String,
}
