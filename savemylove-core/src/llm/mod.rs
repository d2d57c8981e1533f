//! Completion endpoint access: request types, errors and the HTTP client

pub mod client;
pub mod error;
pub mod types;

pub use client::{CompletionClient, DeltaStream};
pub use error::LLMError;
pub use types::{
    CompletionRequest, ContentPart, ImageUrl, Message, MessageContent, MessageRole, ModelTier,
    UserPrompt,
};
