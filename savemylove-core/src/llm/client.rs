//! HTTP client for OpenRouter-compatible chat completion endpoints.

use crate::config::constants::{headers, urls};
use crate::config::{AppConfig, ProviderConfig};
use crate::llm::error::{LLMError, format_provider_error};
use crate::llm::types::{CompletionRequest, CompletionResponse, ModelTier, UserPrompt};
use crate::streaming::{
    DeliveryPolicy, DeltaSink, StreamOutcome, StreamProcessor, channel_sink,
};
use async_stream::stream;
use futures::Stream;
use reqwest::Client as HttpClient;
use reqwest::Response;
use reqwest::header::CONTENT_TYPE;
use std::pin::Pin;
use tracing::{debug, info, warn};

/// Pull-based sequence of text deltas
pub type DeltaStream = Pin<Box<dyn Stream<Item = String> + Send>>;

const DELTA_CHANNEL_CAPACITY: usize = 64;

/// Sends prompts to the completion endpoint.
///
/// Built once from an [`AppConfig`]; every request reuses the same settings
/// and connection pool.
#[derive(Clone)]
pub struct CompletionClient {
    http_client: HttpClient,
    provider: ProviderConfig,
    api_key: String,
    policy: DeliveryPolicy,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("base_url", &self.provider.base_url)
            .field("default_model", &self.provider.default_model)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    pub fn new(config: &AppConfig) -> Result<Self, LLMError> {
        Self::with_http_client(config, HttpClient::new())
    }

    pub fn with_http_client(config: &AppConfig, http_client: HttpClient) -> Result<Self, LLMError> {
        let api_key = config
            .provider
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LLMError::Configuration("OpenRouter API key is not configured".to_string())
            })?;

        Ok(Self {
            http_client,
            provider: config.provider.clone(),
            api_key,
            policy: DeliveryPolicy::from_config(&config.streaming),
        })
    }

    pub fn with_delivery_policy(mut self, policy: DeliveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Standard => &self.provider.default_model,
            ModelTier::Image => &self.provider.image_model,
            ModelTier::Unlimited => &self.provider.unlimited_model,
        }
    }

    /// Build the request body. An explicit `model` wins; otherwise a prompt
    /// with an image goes to the image model and everything else to the
    /// default one.
    pub fn build_request(
        &self,
        prompt: UserPrompt,
        model: Option<&str>,
        stream: bool,
    ) -> CompletionRequest {
        let tier = if prompt.image_url.is_some() {
            ModelTier::Image
        } else {
            ModelTier::Standard
        };
        let model = model
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.model_for(tier));
        CompletionRequest::new(model, vec![prompt.into_message()], stream)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.provider.base_url.trim_end_matches('/'),
            urls::CHAT_COMPLETIONS_PATH
        )
    }

    async fn send(&self, request: &CompletionRequest) -> Result<Response, LLMError> {
        if request.messages.is_empty() {
            return Err(LLMError::InvalidRequest(format_provider_error(
                "Messages cannot be empty",
            )));
        }

        debug!(
            model = %request.model,
            stream = request.stream,
            image = request.has_image(),
            "sending completion request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .header(headers::REFERER, &self.provider.referer)
            .header(headers::TITLE, &self.provider.title)
            .json(request)
            .send()
            .await
            .map_err(LLMError::network)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let reason = status.canonical_reason().unwrap_or("request failed");
            let detail = if error_text.trim().is_empty() {
                format!("HTTP {}: {reason}", status.as_u16())
            } else {
                format!("HTTP {}: {reason}: {}", status.as_u16(), error_text.trim())
            };
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(LLMError::Transport {
                status: Some(status.as_u16()),
                message: format_provider_error(&detail),
            });
        }

        Ok(response)
    }

    /// Non-streaming call; returns `choices[0].message.content`
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, LLMError> {
        let response = self.send(request).await?;
        let body: CompletionResponse = response.json().await.map_err(|e| {
            LLMError::InvalidResponse(format_provider_error(&format!(
                "Failed to parse response: {e}"
            )))
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                LLMError::InvalidResponse(format_provider_error("Response contained no message"))
            })
    }

    /// Open a streaming call and hand the raw response back
    pub async fn open_stream(&self, request: &CompletionRequest) -> Result<Response, LLMError> {
        let mut request = request.clone();
        request.stream = true;
        self.send(&request).await
    }

    /// Stream a completion into `sink`, returning the full outcome
    pub async fn stream_to_sink(
        &self,
        request: &CompletionRequest,
        sink: &mut dyn DeltaSink,
    ) -> Result<StreamOutcome, LLMError> {
        let response = self.open_stream(request).await?;
        let mut processor = StreamProcessor::with_policy(self.policy.clone());
        let outcome = processor
            .process_stream(response.bytes_stream(), sink)
            .await?;

        let metrics = processor.metrics();
        info!(
            chunks = metrics.total_chunks,
            bytes = metrics.total_bytes,
            retries = metrics.retry_count,
            "completion stream closed"
        );
        Ok(outcome)
    }

    /// Stream a completion as a pull-based sequence of deltas.
    ///
    /// Dropping the returned stream disconnects the reader, which stops the
    /// background read at the next delta.
    pub async fn stream_deltas(&self, request: &CompletionRequest) -> Result<DeltaStream, LLMError> {
        let response = self.open_stream(request).await?;
        let (mut sink, mut receiver) = channel_sink(DELTA_CHANNEL_CAPACITY);
        let mut processor = StreamProcessor::with_policy(self.policy.clone());

        tokio::spawn(async move {
            match processor
                .process_stream(response.bytes_stream(), &mut sink)
                .await
            {
                Ok(outcome) => debug!(termination = ?outcome.termination, "delta stream finished"),
                Err(err) => warn!("delta stream failed: {err}"),
            }
        });

        Ok(Box::pin(stream! {
            while let Some(delta) = receiver.recv().await {
                yield delta;
            }
        }))
    }

    /// Send a prompt, streaming iff a sink is supplied.
    ///
    /// With a sink the accumulated text is returned once the stream ends,
    /// including when it ended early on a read error or a disconnected
    /// receiver.
    pub async fn analyze(
        &self,
        prompt: UserPrompt,
        model: Option<&str>,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        match sink {
            Some(sink) => {
                let request = self.build_request(prompt, model, true);
                let outcome = self.stream_to_sink(&request, sink).await?;
                if outcome.is_partial() {
                    warn!(termination = ?outcome.termination, "returning partial response");
                }
                Ok(outcome.content)
            }
            None => {
                let request = self.build_request(prompt, model, false);
                self.complete(&request).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> AppConfig {
        let mut config = AppConfig::default();
        config.provider.api_key = key.map(str::to_string);
        config
    }

    #[test]
    fn missing_or_blank_key_is_a_configuration_error() {
        for key in [None, Some("  ")] {
            let err = CompletionClient::new(&config_with_key(key)).unwrap_err();
            assert!(matches!(err, LLMError::Configuration(_)));
        }
    }

    #[test]
    fn model_selection_follows_prompt_and_override() {
        let client = CompletionClient::new(&config_with_key(Some("k"))).unwrap();
        let provider = client.provider().clone();

        let plain = client.build_request(UserPrompt::text("hi"), None, true);
        assert_eq!(plain.model, provider.default_model);
        assert!(plain.stream);

        let image = client.build_request(
            UserPrompt::text("look").with_image("https://x/a.png"),
            None,
            false,
        );
        assert_eq!(image.model, provider.image_model);

        let explicit = client.build_request(UserPrompt::text("hi"), Some("openai/gpt-4o"), false);
        assert_eq!(explicit.model, "openai/gpt-4o");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let mut config = config_with_key(Some("k"));
        config.provider.base_url = "http://localhost:9/api/v1/".to_string();
        let client = CompletionClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/api/v1/chat/completions");
    }
}
