use crate::config::StreamingConfig;
use crate::config::constants::streaming::{
    DELIVERY_BACKOFF_MS, INVALID_STATE_CODE, MAX_DELIVERY_ATTEMPTS,
};
use crate::streaming::sink::SinkError;
use std::time::Duration;

/// What to do with a delta the sink still refuses after the last attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExhaustedAction {
    /// Drop the delta, log it and keep streaming
    #[default]
    Skip,
    /// Stop the stream and report the failure with the partial content
    Escalate,
}

/// Retry policy for handing deltas to a sink
#[derive(Debug, Clone)]
pub struct DeliveryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    /// Decides whether a failure means the receiver is gone for good.
    /// Best effort: it pattern-matches messages and codes.
    pub is_disconnect: fn(&SinkError) -> bool,
    pub on_exhausted: ExhaustedAction,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_DELIVERY_ATTEMPTS,
            backoff: Duration::from_millis(DELIVERY_BACKOFF_MS),
            is_disconnect: looks_disconnected,
            on_exhausted: ExhaustedAction::default(),
        }
    }
}

impl DeliveryPolicy {
    pub fn from_config(config: &StreamingConfig) -> Self {
        Self {
            max_attempts: config.max_delivery_attempts,
            backoff: config.delivery_backoff(),
            ..Self::default()
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_exhausted_action(mut self, action: ExhaustedAction) -> Self {
        self.on_exhausted = action;
        self
    }

    /// Attempts actually made per delta; never less than one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn is_disconnect(&self, error: &SinkError) -> bool {
        (self.is_disconnect)(error)
    }
}

/// Default disconnect signature: an invalid-state code, or a message that
/// mentions the connection going away.
pub fn looks_disconnected(error: &SinkError) -> bool {
    if error.code.as_deref() == Some(INVALID_STATE_CODE) {
        return true;
    }
    let message = error.message.to_ascii_lowercase();
    message.contains("connection") || message.contains("disconnected")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_uses_three_attempts_and_short_backoff() {
        let policy = DeliveryPolicy::default();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.backoff, Duration::from_millis(100));
        assert_eq!(policy.on_exhausted, ExhaustedAction::Skip);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        assert_eq!(DeliveryPolicy::default().with_max_attempts(0).attempts(), 1);
    }

    #[test]
    fn disconnect_signatures() {
        assert!(looks_disconnected(&SinkError::disconnected()));
        assert!(looks_disconnected(&SinkError::new("Connection reset by peer")));
        assert!(looks_disconnected(&SinkError::new("client disconnected")));
        assert!(!looks_disconnected(&SinkError::new("buffer full")));
        assert!(!looks_disconnected(
            &SinkError::new("busy").with_code("EAGAIN")
        ));
    }

    #[test]
    fn custom_predicate_is_honoured() {
        let policy = DeliveryPolicy {
            is_disconnect: |err| err.message == "gone",
            ..DeliveryPolicy::default()
        };
        assert!(policy.is_disconnect(&SinkError::new("gone")));
        assert!(!policy.is_disconnect(&SinkError::disconnected()));
    }
}
