//! Configuration for the completion pipeline.
//!
//! Values come from built-in defaults, an optional `savemylove.toml`, a `.env`
//! file and finally the process environment. The resulting [`AppConfig`] is
//! built once at startup and passed into the client; nothing in the pipeline
//! reads the environment on its own.

pub mod api_keys;
pub mod constants;
pub mod loader;

pub use api_keys::{ApiKeySources, load_dotenv, resolve_api_key};
pub use loader::{AppConfig, DisplayConfig, ProviderConfig, StreamingConfig};
