//! Receivers for streamed text deltas.

use crate::config::constants::streaming::INVALID_STATE_CODE;
use crate::markdown::{AccumulatedResult, DisplayBuffer};
use async_trait::async_trait;
use std::fmt;
use tokio::sync::mpsc;

/// Failure reported by a sink while accepting a delta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    pub message: String,
    pub code: Option<String>,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The receiving side is gone and will never accept another delta
    pub fn disconnected() -> Self {
        Self::new("receiver disconnected").with_code(INVALID_STATE_CODE)
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for SinkError {}

/// Caller-supplied receiver of text deltas, invoked once per delta in
/// arrival order
#[async_trait]
pub trait DeltaSink: Send {
    async fn deliver(&mut self, delta: &str) -> Result<(), SinkError>;
}

/// Adapts a closure into a [`DeltaSink`]
pub struct FnSink<F> {
    callback: F,
}

impl<F> FnSink<F>
where
    F: FnMut(&str) -> Result<(), SinkError> + Send,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F> DeltaSink for FnSink<F>
where
    F: FnMut(&str) -> Result<(), SinkError> + Send,
{
    async fn deliver(&mut self, delta: &str) -> Result<(), SinkError> {
        (self.callback)(delta)
    }
}

/// Pushes deltas into a bounded channel. A dropped receiver surfaces as
/// [`SinkError::disconnected`], which stops the stream.
pub struct ChannelSink {
    sender: mpsc::Sender<String>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl DeltaSink for ChannelSink {
    async fn deliver(&mut self, delta: &str) -> Result<(), SinkError> {
        self.sender
            .send(delta.to_string())
            .await
            .map_err(|_| SinkError::disconnected())
    }
}

/// Create a channel whose sending half is a sink
pub fn channel_sink(capacity: usize) -> (ChannelSink, mpsc::Receiver<String>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (ChannelSink::new(sender), receiver)
}

/// Caller-side sink: appends every delta to an [`AccumulatedResult`] and
/// refreshes the normalized [`DisplayBuffer`] after each one.
#[derive(Debug, Default)]
pub struct AccumulatingSink {
    result: AccumulatedResult,
    display: DisplayBuffer,
    scroll_requests: usize,
}

impl AccumulatingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display(display: DisplayBuffer) -> Self {
        Self {
            display,
            ..Self::default()
        }
    }

    pub fn result(&self) -> &AccumulatedResult {
        &self.result
    }

    pub fn display(&self) -> &DisplayBuffer {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayBuffer {
        &mut self.display
    }

    /// How many updates asked the display to follow the bottom
    pub fn scroll_requests(&self) -> usize {
        self.scroll_requests
    }

    /// Start a new submission
    pub fn reset(&mut self) {
        self.result.reset();
        self.display.reset();
        self.scroll_requests = 0;
    }
}

#[async_trait]
impl DeltaSink for AccumulatingSink {
    async fn deliver(&mut self, delta: &str) -> Result<(), SinkError> {
        self.result.push(delta);
        if self.display.update(self.result.as_str()) {
            self.scroll_requests += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_sink_sees_each_delta() {
        let mut seen = Vec::new();
        {
            let mut sink = FnSink::new(|delta: &str| {
                seen.push(delta.to_string());
                Ok(())
            });
            sink.deliver("a").await.unwrap();
            sink.deliver("b").await.unwrap();
        }
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn channel_sink_reports_dropped_receiver_as_disconnect() {
        let (mut sink, receiver) = channel_sink(4);
        drop(receiver);
        let err = sink.deliver("lost").await.unwrap_err();
        assert_eq!(err, SinkError::disconnected());
    }

    #[tokio::test]
    async fn accumulating_sink_grows_and_requests_scroll() {
        let mut sink = AccumulatingSink::new();
        sink.deliver("# Ti").await.unwrap();
        sink.deliver("tle\n• item").await.unwrap();

        assert_eq!(sink.result().as_str(), "# Title\n• item");
        assert_eq!(sink.display().content(), "\n# Title\n- item");
        assert_eq!(sink.scroll_requests(), 2);

        sink.reset();
        assert!(sink.result().is_empty());
        assert_eq!(sink.display().content(), "");
    }
}
