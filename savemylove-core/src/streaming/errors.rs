use crate::streaming::sink::SinkError;

/// Failures the stream processor reports instead of swallowing
#[derive(Debug, thiserror::Error)]
pub enum StreamingError {
    /// The sink kept failing for a reason other than disconnection
    #[error("Failed to deliver delta after {attempts} attempts: {error}")]
    SinkDelivery {
        attempts: u32,
        #[source]
        error: SinkError,
        partial_content: String,
    },
}

impl StreamingError {
    pub fn partial_content(&self) -> Option<&str> {
        match self {
            Self::SinkDelivery {
                partial_content, ..
            } => Some(partial_content.as_str()),
        }
    }
}
