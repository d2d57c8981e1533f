/// Model ID constants used when configuration does not name a model
pub mod models {
    pub const DEFAULT_MODEL: &str = "anthropic/claude-3.7-sonnet";
    pub const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-pro-exp-03-25";
    pub const DEFAULT_UNLIMITED_MODEL: &str = "google/gemini-2.5-pro-exp-03-25";
}

pub mod urls {
    pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
    pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
}

/// Service-identifying headers sent with every completion request
pub mod headers {
    pub const REFERER: &str = "HTTP-Referer";
    pub const TITLE: &str = "X-Title";
    pub const DEFAULT_REFERER: &str = "https://savemy.love";
    pub const DEFAULT_TITLE: &str = "SaveMyLove";
}

/// Environment variable names read on startup
pub mod env {
    pub const API_URL: &str = "OPENROUTER_API_URL";
    pub const API_KEY: &str = "OPENROUTER_API_KEY";
    pub const DEFAULT_MODEL: &str = "OPENROUTER_DEFAULT_MODEL";
    pub const IMAGE_MODEL: &str = "OPENROUTER_DEFAULT_IMG_MODEL";
    pub const UNLIMITED_MODEL: &str = "OPENROUTER_DEFAULT_UNLIMITED_MODEL";
}

pub mod message_roles {
    pub const USER: &str = "user";
}

/// Server-sent-events framing and delivery defaults
pub mod streaming {
    pub const DATA_PREFIX: &str = "data:";
    pub const COMMENT_PREFIX: char = ':';
    pub const DONE_MARKER: &str = "[DONE]";
    pub const MAX_DELIVERY_ATTEMPTS: u32 = 3;
    pub const DELIVERY_BACKOFF_MS: u64 = 100;
    /// Error code a sink reports when its receiving side is gone
    pub const INVALID_STATE_CODE: &str = "ERR_INVALID_STATE";
}

pub mod display {
    pub const SCROLL_TOLERANCE_PX: f64 = 10.0;
}

pub mod defaults {
    pub const CONFIG_FILE_NAME: &str = "savemylove.toml";
    pub const DOT_DIR: &str = ".savemylove";
}
