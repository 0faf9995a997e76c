//! Skills: markdown playbooks shipped next to the server, one directory per skill.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

pub(crate) const SKILL_FILE: &str = "SKILL.md";
const URI_PREFIX: &str = "skills-";
const URI_SEPARATOR: &str = "://";

#[derive(Debug, thiserror::Error)]
pub(crate) enum SkillError {
    #[error("Invalid skill name '{0}'")]
    InvalidName(String),
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },
    #[error("Skill '{0}' not found")]
    NotFound(String),
    #[error("File '{path}' not found in skill '{skill}'")]
    FileNotFound { skill: String, path: String },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid front matter in {path}: {message}")]
    FrontMatter { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SkillSummary {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) uri: String,
}

/// Result of scanning the skills directory once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SkillListing {
    pub(crate) skills: Vec<SkillSummary>,
    pub(crate) first_error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub(crate) struct SkillsStore {
    root: PathBuf,
    listing: OnceLock<SkillListing>,
}

impl SkillsStore {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            listing: OnceLock::new(),
        }
    }

    /// Every skill with a readable `SKILL.md`, sorted by directory name. Scanned once.
    pub(crate) fn listing(&self) -> &SkillListing {
        self.listing.get_or_init(|| self.scan())
    }

    fn scan(&self) -> SkillListing {
        let mut listing = SkillListing::default();
        let mut errors = Vec::new();

        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Skills directory {} unavailable: {err}", self.root.display());
                listing.first_error = Some(format!(
                    "Failed to read skills directory {}: {err}",
                    self.root.display()
                ));
                return listing;
            }
        };

        let mut dirs: Vec<(String, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.join(SKILL_FILE).is_file())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                Some((name, path))
            })
            .collect();
        dirs.sort();

        for (dir_name, dir) in dirs {
            match read_summary(&dir_name, &dir.join(SKILL_FILE)) {
                Ok(summary) => listing.skills.push(summary),
                Err(err) => {
                    log::warn!("Skipping skill '{dir_name}': {err}");
                    errors.push(err.to_string());
                }
            }
        }

        log::info!("Loaded {} skills from {}", listing.skills.len(), self.root.display());
        listing.first_error = errors.into_iter().next();
        listing
    }

    pub(crate) fn read_skill(&self, skill_name: &str) -> Result<String, SkillError> {
        self.read_file(skill_name, SKILL_FILE)
    }

    pub(crate) fn read_file(&self, skill_name: &str, file_path: &str) -> Result<String, SkillError> {
        let dir = self.skill_dir(skill_name)?;
        let path = safe_join(&dir, file_path)?;
        if !path.is_file() {
            return Err(SkillError::FileNotFound {
                skill: skill_name.to_string(),
                path: file_path.to_string(),
            });
        }
        std::fs::read_to_string(&path).map_err(|source| SkillError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// URIs of every file of a skill, sorted.
    pub(crate) fn list_resources(&self, skill_name: &str) -> Result<Vec<String>, SkillError> {
        let dir = self.skill_dir(skill_name)?;
        let mut resources = Vec::new();
        for entry in WalkDir::new(&dir).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|err| SkillError::Io {
                path: dir.display().to_string(),
                source: err.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&dir) else {
                continue;
            };
            let relative = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect::<Vec<_>>()
                .join("/");
            resources.push(skill_uri(skill_name, &relative));
        }
        Ok(resources)
    }

    fn skill_dir(&self, skill_name: &str) -> Result<PathBuf, SkillError> {
        let mut components = Path::new(skill_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(SkillError::InvalidName(skill_name.to_string())),
        }
        let dir = self.root.join(skill_name);
        if !dir.join(SKILL_FILE).is_file() {
            return Err(SkillError::NotFound(skill_name.to_string()));
        }
        Ok(dir)
    }
}

fn read_summary(dir_name: &str, skill_file: &Path) -> Result<SkillSummary, SkillError> {
    let display = skill_file.display().to_string();
    let content = std::fs::read_to_string(skill_file).map_err(|source| SkillError::Io {
        path: display.clone(),
        source,
    })?;
    let front = parse_front_matter(&content).map_err(|message| SkillError::FrontMatter {
        path: display,
        message,
    })?;
    Ok(SkillSummary {
        name: front.name.unwrap_or_else(|| dir_name.to_string()),
        description: front.description.unwrap_or_default(),
        uri: skill_uri(dir_name, SKILL_FILE),
    })
}

fn parse_front_matter(content: &str) -> Result<FrontMatter, String> {
    let content = content.trim_start_matches('\u{feff}');
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return Err("missing '---' header".to_string());
    };
    let end = rest
        .find("\n---")
        .ok_or_else(|| "unterminated header".to_string())?;
    serde_yaml::from_str(&rest[..end]).map_err(|err| err.to_string())
}

/// Join a caller supplied relative path onto `base`, refusing anything that could escape it.
fn safe_join(base: &Path, relative: &str) -> Result<PathBuf, SkillError> {
    let invalid = |reason| SkillError::InvalidPath {
        path: relative.to_string(),
        reason,
    };
    let rel = Path::new(relative);
    let mut has_component = false;
    for component in rel.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return Err(invalid("must be relative")),
            Component::ParentDir => return Err(invalid("must not contain '..'")),
            Component::CurDir => {}
            Component::Normal(_) => has_component = true,
        }
    }
    if !has_component {
        return Err(invalid("is empty"));
    }
    Ok(base.join(rel))
}

pub(crate) fn skill_uri(skill_name: &str, path: &str) -> String {
    format!("{URI_PREFIX}{skill_name}{URI_SEPARATOR}{path}")
}

/// Split `skills-<name>://<path>` into its name and path.
pub(crate) fn parse_skill_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix(URI_PREFIX)?;
    let (name, path) = rest.split_once(URI_SEPARATOR)?;
    if name.is_empty() || path.is_empty() {
        return None;
    }
    Some((name, path))
}
