//! # savemylove-core - Runtime for SaveMyLove
//!
//! `savemylove-core` powers the SaveMyLove consultation front ends. It turns
//! the fields a user types into a form into a bilingual prompt, sends it to an
//! OpenRouter-compatible chat completion endpoint and hands the streamed reply
//! back as Markdown that renders cleanly even while it is still arriving.
//!
//! ## Architecture Overview
//!
//! - `config/`: configuration object, defaults, API key lookup and TOML loader.
//! - `prompts/`: bilingual prompt templates and placeholder substitution.
//! - `llm/`: request types, errors and the HTTP completion client.
//! - `streaming/`: server-sent-events decoding and sink delivery with retry.
//! - `markdown/`: Markdown repair for partial output and auto-scroll bookkeeping.
//! - `consult/`: one typed entry point per consultation feature.
//!
//! ## Quickstart
//!
//! ```rust,ignore
//! use savemylove_core::{AppConfig, Consultant, Language, NameCompatibility};
//! use savemylove_core::streaming::AccumulatingSink;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), anyhow::Error> {
//!     let config = AppConfig::load()?;
//!     let consultant = Consultant::from_config(&config)?;
//!
//!     let input = NameCompatibility {
//!         name1: "Alice".into(),
//!         name2: "Bob".into(),
//!         language: Language::English,
//!     };
//!     let mut sink = AccumulatingSink::new();
//!     let text = consultant.name_compatibility(&input, Some(&mut sink)).await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod consult;
pub mod i18n;
pub mod llm;
pub mod markdown;
pub mod prompts;
pub mod streaming;

pub use config::AppConfig;
pub use consult::{
    BreakupRecovery, ChatAnalysis, CommunicationGuidance, ConsultationForm, Consultant,
    EmotionalHealing, EmotionalHealthAssessment, MonthlyCalendar, NameCompatibility,
    PursuitStrategy, ReconciliationAssessment, RelationshipAnxiety, UnrequitedLove, ZodiacMatch,
};
pub use i18n::Language;
pub use llm::{CompletionClient, CompletionRequest, LLMError, Message};
pub use markdown::{AccumulatedResult, DisplayBuffer, normalize_markdown};
pub use prompts::{PromptTemplate, TemplateId};
pub use streaming::{DeliveryPolicy, DeltaSink, SinkError, StreamProcessor};
