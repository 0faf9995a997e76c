//! Process configuration, read once at startup.

use perfecto_help_index::DEFAULT_HELP_BASE_URL;
use std::env;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "PERFECTO_SECURITY_TOKEN";
pub const TOKEN_FILE_ENV: &str = "PERFECTO_SECURITY_TOKEN_FILE";
pub const CLOUD_NAME_ENV: &str = "PERFECTO_CLOUD_NAME";
pub const HELP_BASE_URL_ENV: &str = "PERFECTO_HELP_BASE_URL";
pub const SKILLS_DIR_ENV: &str = "PERFECTO_SKILLS_DIR";

const DEFAULT_CLOUD_DOMAIN: &str = "app.perfectomobile.com";
const SKILLS_RELATIVE_DIR: &str = "resources/skills";

/// Credentials for the Perfecto cloud REST API.
#[derive(Clone, PartialEq, Eq)]
pub struct PerfectoToken {
    pub token: String,
    pub cloud_name: Option<String>,
}

impl std::fmt::Debug for PerfectoToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfectoToken")
            .field("token", &"<redacted>")
            .field("cloud_name", &self.cloud_name)
            .finish()
    }
}

impl PerfectoToken {
    /// Host of the tenant cloud. A bare cloud name expands to the public SaaS domain.
    pub fn cloud_host(&self) -> Option<String> {
        let name = self.cloud_name.as_deref()?;
        if name.contains('.') {
            Some(name.to_string())
        } else {
            Some(format!("{name}.{DEFAULT_CLOUD_DOMAIN}"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub token: Option<PerfectoToken>,
    pub help_base_url: String,
    pub skills_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = value(TOKEN_ENV)
            .or_else(|| value(TOKEN_FILE_ENV).and_then(|path| read_token_file(Path::new(&path))))
            .map(|token| PerfectoToken {
                token,
                cloud_name: value(CLOUD_NAME_ENV),
            });

        let help_base_url =
            value(HELP_BASE_URL_ENV).unwrap_or_else(|| DEFAULT_HELP_BASE_URL.to_string());
        let skills_dir = value(SKILLS_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_skills_dir);

        Self {
            token,
            help_base_url,
            skills_dir,
        }
    }
}

fn read_token_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Some(raw.trim().to_string()).filter(|token| !token.is_empty()),
        Err(err) => {
            log::warn!("Failed to read token file {}: {err}", path.display());
            None
        }
    }
}

fn default_skills_dir() -> PathBuf {
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SKILLS_RELATIVE_DIR)))
        .filter(|dir| dir.is_dir());
    if let Some(dir) = beside_exe {
        return dir;
    }
    env::current_dir()
        .map(|cwd| cwd.join(SKILLS_RELATIVE_DIR))
        .unwrap_or_else(|_| PathBuf::from(SKILLS_RELATIVE_DIR))
}
