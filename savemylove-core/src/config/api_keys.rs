//! API key lookup from environment variables, `.env` files and configuration.
//!
//! Environment variables win over the configuration file so a key never has
//! to be written into `savemylove.toml`.

use crate::config::constants::env;
use anyhow::Result;
use tracing::{debug, warn};

/// Where to look for the OpenRouter API key
#[derive(Debug, Clone)]
pub struct ApiKeySources {
    /// Environment variable holding the key
    pub env_var: String,
    /// Key from the configuration file, if any
    pub config_value: Option<String>,
}

impl Default for ApiKeySources {
    fn default() -> Self {
        Self {
            env_var: env::API_KEY.to_string(),
            config_value: None,
        }
    }
}

impl ApiKeySources {
    pub fn with_config_value(config_value: Option<String>) -> Self {
        Self {
            config_value,
            ..Self::default()
        }
    }
}

/// Load environment variables from a `.env` file in the current directory.
///
/// A missing file is not an error; a malformed one is logged and ignored.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded environment variables");
            Ok(())
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            warn!("failed to load .env file: {e}");
            Ok(())
        }
    }
}

/// Resolve the API key, preferring the environment over configuration.
///
/// `lookup` reads a variable by name; pass `|k| std::env::var(k).ok()` in
/// production. Blank values count as absent.
pub fn resolve_api_key<F>(sources: &ApiKeySources, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&sources.env_var)
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            sources
                .config_value
                .clone()
                .filter(|key| !key.trim().is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_beats_config_file() {
        let sources = ApiKeySources::with_config_value(Some("from-file".to_string()));
        let key = resolve_api_key(&sources, |name| {
            (name == env::API_KEY).then(|| "from-env".to_string())
        });
        assert_eq!(key.as_deref(), Some("from-env"));
    }

    #[test]
    fn falls_back_to_config_value() {
        let sources = ApiKeySources::with_config_value(Some("from-file".to_string()));
        assert_eq!(
            resolve_api_key(&sources, |_| None).as_deref(),
            Some("from-file")
        );
    }

    #[test]
    fn blank_values_are_ignored() {
        let sources = ApiKeySources::with_config_value(Some("   ".to_string()));
        assert!(resolve_api_key(&sources, |_| Some(String::new())).is_none());
    }
}
