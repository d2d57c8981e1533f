//! Streaming delivery of completion deltas
//!
//! The processor reads an event-stream body line by line, decodes each
//! `data:` payload and hands the text delta to a [`DeltaSink`]. Sinks are
//! either push style (a closure, an accumulating display buffer) or pull
//! style through [`channel_sink`].

pub mod decoder;
pub mod errors;
pub mod processor;
pub mod retry;
pub mod sink;

pub use decoder::{DecodedPayload, SseLine, SseLineDecoder, classify_line, decode_payload};
pub use errors::StreamingError;
pub use processor::{StreamOutcome, StreamProcessor, StreamTermination, StreamingMetrics};
pub use retry::{DeliveryPolicy, ExhaustedAction, looks_disconnected};
pub use sink::{AccumulatingSink, ChannelSink, DeltaSink, FnSink, SinkError, channel_sink};
