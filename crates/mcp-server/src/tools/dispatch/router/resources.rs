use super::super::McpError;
use crate::tools::skills_store::{parse_skill_uri, SkillError, SkillsStore};
use rmcp::model::{
    AnnotateAble, ListResourceTemplatesResult, RawResourceTemplate, ReadResourceResult,
    ResourceContents,
};

const SKILL_URI_TEMPLATE: &str = "skills-{skill_name}://{path}";

/// The only resource family: files inside a skill directory.
pub(in crate::tools::dispatch) fn templates() -> ListResourceTemplatesResult {
    let template = RawResourceTemplate {
        uri_template: SKILL_URI_TEMPLATE.to_string(),
        name: "perfecto_skill_file".to_string(),
        title: Some("Perfecto skill file".to_string()),
        description: Some(
            "A file of a Perfecto skill, as listed by perfecto_skills list_skill_resources."
                .to_string(),
        ),
        mime_type: None,
    };
    ListResourceTemplatesResult::with_all_items(vec![template.no_annotation()])
}

pub(in crate::tools::dispatch) fn read(
    store: &SkillsStore,
    uri: &str,
) -> Result<ReadResourceResult, McpError> {
    let Some((skill_name, path)) = parse_skill_uri(uri) else {
        return Err(McpError::invalid_params(
            format!("Invalid Skill URI: {uri}"),
            None,
        ));
    };
    let text = store.read_file(skill_name, path).map_err(resource_error)?;
    Ok(ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(mime_type(path).to_string()),
            text,
            meta: None,
        }],
    })
}

fn resource_error(err: SkillError) -> McpError {
    match err {
        SkillError::NotFound(_) | SkillError::FileNotFound { .. } => {
            McpError::resource_not_found(err.to_string(), None)
        }
        SkillError::InvalidName(_) | SkillError::InvalidPath { .. } => {
            McpError::invalid_params(err.to_string(), None)
        }
        SkillError::Io { .. } | SkillError::FrontMatter { .. } => {
            log::error!("Failed to read skill resource: {err}");
            McpError::internal_error(err.to_string(), None)
        }
    }
}

fn mime_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("md") => "text/markdown",
        Some("json") => "application/json",
        Some("yaml" | "yml") => "application/yaml",
        _ => "text/plain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rmcp::model::ErrorCode;

    fn store() -> (tempfile::TempDir, SkillsStore) {
        let tmp = tempfile::tempdir().unwrap();
        let skill = tmp.path().join("appium");
        std::fs::create_dir_all(skill.join("examples")).unwrap();
        std::fs::write(skill.join("SKILL.md"), "---\nname: Appium\n---\n# Appium\n").unwrap();
        std::fs::write(skill.join("examples/caps.json"), "{}").unwrap();
        let store = SkillsStore::new(tmp.path());
        (tmp, store)
    }

    #[test]
    fn template_matches_the_listed_uris() {
        let listed = templates();
        assert_eq!(listed.resource_templates.len(), 1);
        assert_eq!(listed.resource_templates[0].raw.uri_template, SKILL_URI_TEMPLATE);
    }

    #[test]
    fn reads_skill_files_by_uri() {
        let (_tmp, store) = store();
        let read = read(&store, "skills-appium://examples/caps.json").unwrap();
        assert_eq!(
            read.contents,
            vec![ResourceContents::TextResourceContents {
                uri: "skills-appium://examples/caps.json".to_string(),
                mime_type: Some("application/json".to_string()),
                text: "{}".to_string(),
                meta: None,
            }]
        );
    }

    #[test]
    fn bad_uris_map_to_protocol_errors() {
        let (_tmp, store) = store();
        let err = read(&store, "file:///etc/passwd").unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let err = read(&store, "skills-appium://../secret.md").unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let err = read(&store, "skills-appium://missing.md").unwrap_err();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
    }
}
