use crate::streaming::StreamingError;

#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    /// Required configuration, usually the API key, is absent
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Non-success HTTP status or a network failure
    #[error("Transport error: {message}")]
    Transport { status: Option<u16>, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Streaming(#[from] StreamingError),
}

impl LLMError {
    pub(crate) fn network(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|status| status.as_u16()),
            message: format_provider_error(&format!("Network error: {err}")),
        }
    }

    /// HTTP status carried by a transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Text the caller has already received when the failure happened
    pub fn partial_content(&self) -> Option<&str> {
        match self {
            Self::Streaming(err) => err.partial_content(),
            _ => None,
        }
    }
}

pub(crate) fn format_provider_error(message: &str) -> String {
    format!("OpenRouter API error: {message}")
}
