use thiserror::Error;

/// Result type for help index operations
pub type Result<T> = std::result::Result<T, HelpIndexError>;

/// Errors raised while fetching or indexing the help site
#[derive(Error, Debug)]
pub enum HelpIndexError {
    /// The object-notation payload could not be parsed
    #[error("Notation parse error at byte {offset}: {message}")]
    Notation { offset: usize, message: String },

    /// The request never produced a response
    #[error("Fetch failed: GET {url}: {message}")]
    Fetch { url: String, message: String },

    /// The server answered with a non-success status
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16, body: String },

    /// The server rejected the request as unauthenticated (401/403)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The payload parsed but does not have the expected shape
    #[error("Malformed payload from {source_name}: {message}")]
    Malformed { source_name: String, message: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl HelpIndexError {
    pub fn notation(offset: usize, message: impl Into<String>) -> Self {
        Self::Notation {
            offset,
            message: message.into(),
        }
    }

    pub fn malformed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Transport-level failures, as opposed to bad payloads.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Status { .. })
    }

    /// Short text suitable for an item-level error field.
    pub fn item_detail(&self) -> String {
        match self {
            Self::Status { body, .. } if !body.trim().is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}
