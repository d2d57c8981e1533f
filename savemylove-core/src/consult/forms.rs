//! Typed inputs for each consultation feature.

use crate::i18n::Language;
use crate::llm::{LLMError, ModelTier};
use crate::prompts::TemplateId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Fields a user filled in for one feature
pub trait ConsultationForm {
    fn template(&self) -> TemplateId;

    /// Placeholder values keyed by template variable name
    fn variables(&self) -> HashMap<String, String>;

    fn model_tier(&self) -> ModelTier {
        ModelTier::Standard
    }

    /// Line prepended to the rendered prompt
    fn language_tag(&self) -> Option<&'static str> {
        None
    }

    fn image_url(&self) -> Option<&str> {
        None
    }

    /// Reject a submission with any required field left blank
    fn validate(&self) -> Result<(), LLMError> {
        let variables = self.variables();
        for name in self.template().template().variables {
            let filled = variables
                .get(*name)
                .is_some_and(|value| !value.trim().is_empty());
            if !filled {
                return Err(LLMError::InvalidRequest(format!(
                    "field '{name}' is required for {}",
                    self.template()
                )));
            }
        }
        Ok(())
    }

    fn render_prompt(&self) -> String {
        let template = self.template().template();
        let variables = self.variables();

        let missing = template.missing_variables(&variables);
        if !missing.is_empty() {
            warn!(template = template.key, ?missing, "rendering with unresolved placeholders");
        }

        let body = template.render(&variables);
        match self.language_tag() {
            Some(tag) => format!("{tag}{body}"),
            None => body,
        }
    }
}

fn to_map<const N: usize>(pairs: [(&str, String); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCompatibility {
    pub name1: String,
    pub name2: String,
    /// Language the report is written in
    #[serde(default)]
    pub language: Language,
}

impl ConsultationForm for NameCompatibility {
    fn template(&self) -> TemplateId {
        TemplateId::NameCompatibility
    }

    fn variables(&self) -> HashMap<String, String> {
        to_map([
            ("name1", self.name1.clone()),
            ("name2", self.name2.clone()),
            ("lang", self.language.prompt_name().to_string()),
        ])
    }
}

/// Personal fortune calendar for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCalendar {
    pub zodiac_sign: String,
    pub birth_date: String,
    /// 1 to 12
    pub month: u32,
    pub year: i32,
}

impl ConsultationForm for MonthlyCalendar {
    fn template(&self) -> TemplateId {
        TemplateId::MonthlyCalendar
    }

    fn variables(&self) -> HashMap<String, String> {
        to_map([
            ("zodiac_sign", self.zodiac_sign.clone()),
            ("birth_date", self.birth_date.clone()),
            ("month", self.month.to_string()),
            ("year", self.year.to_string()),
        ])
    }

    fn validate(&self) -> Result<(), LLMError> {
        if !(1..=12).contains(&self.month) {
            return Err(LLMError::InvalidRequest(format!(
                "month must be between 1 and 12, got {}",
                self.month
            )));
        }
        if self.zodiac_sign.trim().is_empty() || self.birth_date.trim().is_empty() {
            return Err(LLMError::InvalidRequest(
                "zodiac sign and birth date are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Analysis of an exported chat log, optionally with a screenshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnalysis {
    pub chat_history: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
}

impl ConsultationForm for ChatAnalysis {
    fn template(&self) -> TemplateId {
        TemplateId::ChatAnalysis
    }

    fn variables(&self) -> HashMap<String, String> {
        to_map([("chat_history", self.chat_history.clone())])
    }

    fn model_tier(&self) -> ModelTier {
        ModelTier::Unlimited
    }

    fn image_url(&self) -> Option<&str> {
        self.screenshot_url.as_deref()
    }
}

/// Free-form question for the AI chat page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationGuidance {
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl ConsultationForm for CommunicationGuidance {
    fn template(&self) -> TemplateId {
        TemplateId::CommunicationGuidance
    }

    fn variables(&self) -> HashMap<String, String> {
        to_map([("context", self.context.clone())])
    }

    fn language_tag(&self) -> Option<&'static str> {
        self.language.map(Language::prompt_tag)
    }
}

/// Forms made only of free-text answers, one per template variable
macro_rules! text_form {
    (
        $(#[$meta:meta])*
        $name:ident => $template:ident { $($field:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $(pub $field: String,)+
        }

        impl ConsultationForm for $name {
            fn template(&self) -> TemplateId {
                TemplateId::$template
            }

            fn variables(&self) -> HashMap<String, String> {
                to_map([$((stringify!($field), self.$field.clone()),)+])
            }
        }
    };
}

text_form! {
    ZodiacMatch => ZodiacMatch { sign1, sign2 }
}

text_form! {
    PursuitStrategy => PursuitStrategy {
        target_personality,
        relationship_status,
        interaction_frequency,
        common_interests,
        challenges,
    }
}

text_form! {
    /// Chances of getting back together after a breakup
    ReconciliationAssessment => ReconciliationAssessment {
        breakup_reason,
        breakup_time,
        current_contact,
        mutual_friends,
        past_issues,
        changes_made,
    }
}

text_form! {
    EmotionalHealthAssessment => EmotionalHealthAssessment {
        relationship_patterns,
        emotional_triggers,
        attachment_style,
        self_esteem,
        communication_style,
        coping_mechanisms,
    }
}

text_form! {
    UnrequitedLove => UnrequitedLove {
        target_info,
        current_status,
        interaction_history,
        personal_strengths,
        challenges,
        expectations,
    }
}

text_form! {
    RelationshipAnxiety => RelationshipAnxiety {
        relationship_status,
        anxiety_triggers,
        communication_patterns,
        trust_issues,
        personal_history,
        coping_methods,
    }
}

text_form! {
    /// Plan for winning a partner back
    BreakupRecovery => BreakupRecovery {
        breakup_reason,
        current_situation,
        contact_status,
        personal_growth,
        reconciliation_attempts,
        future_plans,
    }
}

text_form! {
    EmotionalHealing => EmotionalHealing {
        emotional_wounds,
        trust_issues,
        communication_problems,
        personal_growth,
        relationship_goals,
        healing_progress,
    }
}
