//! Streaming processor for chat completion responses
//!
//! Reads a body framed as `data: <json>` lines, extracts each content delta
//! and hands it to a [`DeltaSink`] in arrival order. Failures inside the loop
//! are contained: a malformed line is skipped, a read error ends the stream
//! with whatever was already received, and a disconnected sink stops delivery
//! without raising.

use crate::streaming::decoder::{DecodedPayload, SseLine, SseLineDecoder, classify_line, decode_payload};
use crate::streaming::errors::StreamingError;
use crate::streaming::retry::{DeliveryPolicy, ExhaustedAction};
use crate::streaming::sink::{DeltaSink, SinkError};
use futures::stream::{Stream, StreamExt};
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Counters collected while processing one stream
#[derive(Debug, Clone, Default)]
pub struct StreamingMetrics {
    pub request_start_time: Option<Instant>,
    pub first_chunk_time: Option<Instant>,
    pub total_chunks: usize,
    pub total_bytes: usize,
    pub deltas_delivered: usize,
    pub malformed_lines: usize,
    pub heartbeats: usize,
    pub retry_count: usize,
    pub skipped_deltas: usize,
}

/// Why the read loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamTermination {
    /// The transport reported end of body
    Completed,
    /// A `data: [DONE]` line arrived
    DoneMarker,
    /// The sink's receiving side went away
    SinkDisconnected,
    /// Reading the body failed; the content is partial
    ReadFailed(String),
}

/// Result of a processed stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Concatenation of every non-empty delta received
    pub content: String,
    pub termination: StreamTermination,
}

impl StreamOutcome {
    pub fn is_partial(&self) -> bool {
        matches!(
            self.termination,
            StreamTermination::SinkDisconnected | StreamTermination::ReadFailed(_)
        )
    }
}

enum Delivery {
    Delivered,
    Disconnected,
    Skipped,
    Failed { attempts: u32, error: SinkError },
}

enum LineFlow {
    Continue,
    Stop(StreamTermination),
}

pub struct StreamProcessor {
    policy: DeliveryPolicy,
    metrics: StreamingMetrics,
}

impl StreamProcessor {
    pub fn new() -> Self {
        Self::with_policy(DeliveryPolicy::default())
    }

    pub fn with_policy(policy: DeliveryPolicy) -> Self {
        Self {
            policy,
            metrics: StreamingMetrics::default(),
        }
    }

    pub fn policy(&self) -> &DeliveryPolicy {
        &self.policy
    }

    pub fn metrics(&self) -> &StreamingMetrics {
        &self.metrics
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = StreamingMetrics::default();
    }

    /// Drain `body`, delivering each non-empty delta to `sink` exactly once.
    ///
    /// Returns the accumulated content whether the stream completed, hit the
    /// termination marker, lost its reader or failed mid-read. The only error
    /// is a sink that keeps failing for a non-disconnect reason under the
    /// opt-in [`ExhaustedAction::Escalate`].
    pub async fn process_stream<S, B, E>(
        &mut self,
        mut body: S,
        sink: &mut dyn DeltaSink,
    ) -> Result<StreamOutcome, StreamingError>
    where
        S: Stream<Item = Result<B, E>> + Unpin,
        B: AsRef<[u8]>,
        E: Display,
    {
        self.metrics.request_start_time = Some(Instant::now());
        let mut decoder = SseLineDecoder::new();
        let mut content = String::new();

        debug!("starting stream read");
        loop {
            let chunk = match body.next().await {
                Some(Ok(chunk)) => chunk,
                Some(Err(err)) => {
                    warn!(
                        received = content.len(),
                        "stream read failed, keeping partial content: {err}"
                    );
                    return Ok(StreamOutcome {
                        content,
                        termination: StreamTermination::ReadFailed(err.to_string()),
                    });
                }
                None => break,
            };

            let bytes = chunk.as_ref();
            if self.metrics.first_chunk_time.is_none() {
                self.metrics.first_chunk_time = Some(Instant::now());
            }
            self.metrics.total_chunks += 1;
            self.metrics.total_bytes += bytes.len();

            for line in decoder.push(bytes) {
                if let LineFlow::Stop(termination) =
                    self.handle_line(&line, &mut content, sink).await?
                {
                    return Ok(self.finish(content, termination));
                }
            }
        }

        if let Some(line) = decoder.finish() {
            if let LineFlow::Stop(termination) =
                self.handle_line(&line, &mut content, sink).await?
            {
                return Ok(self.finish(content, termination));
            }
        }

        Ok(self.finish(content, StreamTermination::Completed))
    }

    fn finish(&self, content: String, termination: StreamTermination) -> StreamOutcome {
        info!(
            chars = content.chars().count(),
            deltas = self.metrics.deltas_delivered,
            malformed = self.metrics.malformed_lines,
            termination = ?termination,
            "stream finished"
        );
        StreamOutcome {
            content,
            termination,
        }
    }

    async fn handle_line(
        &mut self,
        line: &str,
        content: &mut String,
        sink: &mut dyn DeltaSink,
    ) -> Result<LineFlow, StreamingError> {
        let data = match classify_line(line) {
            SseLine::Data(data) => data,
            SseLine::Done => {
                debug!("received end marker");
                return Ok(LineFlow::Stop(StreamTermination::DoneMarker));
            }
            SseLine::Comment => {
                self.metrics.heartbeats += 1;
                return Ok(LineFlow::Continue);
            }
            SseLine::Blank | SseLine::Other => return Ok(LineFlow::Continue),
        };

        let delta = match decode_payload(data) {
            Ok(DecodedPayload::Delta(delta)) => delta,
            Ok(DecodedPayload::ProviderError(message)) => {
                warn!("provider reported an error mid-stream: {message}");
                return Ok(LineFlow::Continue);
            }
            Err(err) => {
                self.metrics.malformed_lines += 1;
                warn!(line = %data, "skipping malformed stream line: {err}");
                return Ok(LineFlow::Continue);
            }
        };

        if delta.is_empty() {
            return Ok(LineFlow::Continue);
        }

        content.push_str(&delta);
        match self.deliver(&delta, sink).await {
            Delivery::Delivered => {
                self.metrics.deltas_delivered += 1;
                Ok(LineFlow::Continue)
            }
            Delivery::Skipped => {
                self.metrics.skipped_deltas += 1;
                Ok(LineFlow::Continue)
            }
            Delivery::Disconnected => {
                info!("sink disconnected, stopping stream");
                Ok(LineFlow::Stop(StreamTermination::SinkDisconnected))
            }
            Delivery::Failed { attempts, error } => Err(StreamingError::SinkDelivery {
                attempts,
                error,
                partial_content: std::mem::take(content),
            }),
        }
    }

    async fn deliver(&mut self, delta: &str, sink: &mut dyn DeltaSink) -> Delivery {
        let attempts = self.policy.attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            match sink.deliver(delta).await {
                Ok(()) => return Delivery::Delivered,
                Err(err) => {
                    if self.policy.is_disconnect(&err) {
                        return Delivery::Disconnected;
                    }
                    warn!(
                        attempt,
                        remaining = attempts - attempt,
                        "stream write failed: {err}"
                    );
                    if attempt < attempts {
                        self.metrics.retry_count += 1;
                        tokio::time::sleep(self.policy.backoff).await;
                    }
                    last_error = Some(err);
                }
            }
        }

        let error = last_error.unwrap_or_else(|| SinkError::new("delivery failed"));
        match self.policy.on_exhausted {
            ExhaustedAction::Skip => {
                warn!("dropping delta after {attempts} attempts: {error}");
                Delivery::Skipped
            }
            ExhaustedAction::Escalate => Delivery::Failed { attempts, error },
        }
    }
}

impl Default for StreamProcessor {
    fn default() -> Self {
        Self::new()
    }
}
