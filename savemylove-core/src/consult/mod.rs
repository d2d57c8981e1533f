//! UI-facing consultation API.
//!
//! Every feature goes through the same pipeline: validate the form, render
//! its template, pick a model, then send it with [`CompletionClient::analyze`].
//! Passing a sink streams the reply into it; passing `None` waits for the
//! whole body.

pub mod forms;

pub use forms::{
    BreakupRecovery, ChatAnalysis, CommunicationGuidance, ConsultationForm, EmotionalHealing,
    EmotionalHealthAssessment, MonthlyCalendar, NameCompatibility, PursuitStrategy,
    ReconciliationAssessment, RelationshipAnxiety, UnrequitedLove, ZodiacMatch,
};

use crate::config::AppConfig;
use crate::llm::{CompletionClient, LLMError, ModelTier, UserPrompt};
use crate::streaming::DeltaSink;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Consultant {
    client: CompletionClient,
}

impl Consultant {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, LLMError> {
        Ok(Self::new(CompletionClient::new(config)?))
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }

    /// Model a form is sent to when the caller does not override it
    pub fn model_for<F>(&self, form: &F) -> &str
    where
        F: ConsultationForm + ?Sized,
    {
        let tier = if form.image_url().is_some() {
            ModelTier::Image
        } else {
            form.model_tier()
        };
        self.client.model_for(tier)
    }

    /// Validate, render and send any form
    pub async fn run<F>(
        &self,
        form: &F,
        model: Option<&str>,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError>
    where
        F: ConsultationForm + ?Sized,
    {
        form.validate()?;

        let model = model
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.model_for(form))
            .to_string();
        let mut prompt = UserPrompt::text(form.render_prompt());
        if let Some(url) = form.image_url() {
            prompt = prompt.with_image(url);
        }

        info!(
            template = %form.template(),
            model = %model,
            streaming = sink.is_some(),
            "starting consultation"
        );
        self.client.analyze(prompt, Some(&model), sink).await
    }

    pub async fn name_compatibility(
        &self,
        input: &NameCompatibility,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn zodiac_match(
        &self,
        input: &ZodiacMatch,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn monthly_calendar(
        &self,
        input: &MonthlyCalendar,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn chat_analysis(
        &self,
        input: &ChatAnalysis,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn communication_guidance(
        &self,
        input: &CommunicationGuidance,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn pursuit_strategy(
        &self,
        input: &PursuitStrategy,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn reconciliation_assessment(
        &self,
        input: &ReconciliationAssessment,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn emotional_health_assessment(
        &self,
        input: &EmotionalHealthAssessment,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn unrequited_love(
        &self,
        input: &UnrequitedLove,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn relationship_anxiety(
        &self,
        input: &RelationshipAnxiety,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn breakup_recovery(
        &self,
        input: &BreakupRecovery,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }

    pub async fn emotional_healing(
        &self,
        input: &EmotionalHealing,
        sink: Option<&mut dyn DeltaSink>,
    ) -> Result<String, LLMError> {
        self.run(input, None, sink).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consultant() -> Consultant {
        let mut config = AppConfig::default();
        config.provider.api_key = Some("test-key".to_string());
        Consultant::from_config(&config).unwrap()
    }

    #[test]
    fn model_follows_form_tier_and_image() {
        let consultant = consultant();
        let provider = consultant.client().provider().clone();

        let zodiac = ZodiacMatch {
            sign1: "Leo".into(),
            sign2: "Aries".into(),
        };
        assert_eq!(consultant.model_for(&zodiac), provider.default_model);

        let mut chat = ChatAnalysis {
            chat_history: "A: hi".into(),
            screenshot_url: None,
        };
        assert_eq!(consultant.model_for(&chat), provider.unlimited_model);

        chat.screenshot_url = Some("https://x/chat.png".into());
        assert_eq!(consultant.model_for(&chat), provider.image_model);
    }

    #[tokio::test]
    async fn invalid_form_fails_before_any_request() {
        let err = consultant()
            .name_compatibility(&NameCompatibility::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::InvalidRequest(_)));
    }
}
