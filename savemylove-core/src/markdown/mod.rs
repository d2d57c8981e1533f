//! Display-side handling of streamed responses

pub mod accumulated;
pub mod display;
pub mod normalize;

pub use accumulated::AccumulatedResult;
pub use display::{DisplayBuffer, ScrollMetrics};
pub use normalize::normalize_markdown;
