//! Bilingual prompt templates and placeholder substitution.
//!
//! Template bodies live in `prompts/*.md` and are embedded at compile time.
//! Placeholders are written `{name}`; [`fill_placeholders`] replaces every
//! occurrence of every known name and leaves unknown ones untouched so a
//! missing field shows up as a visible token instead of an error.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const COMMON_PREAMBLE: &str = include_str!("../../prompts/common.md");

/// Identifier of a consultation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    MonthlyCalendar,
    NameCompatibility,
    ZodiacMatch,
    ChatAnalysis,
    CommunicationGuidance,
    PursuitStrategy,
    ReconciliationAssessment,
    EmotionalHealthAssessment,
    UnrequitedLove,
    RelationshipAnxiety,
    BreakupRecovery,
    EmotionalHealing,
}

impl TemplateId {
    pub const ALL: [TemplateId; 12] = [
        Self::MonthlyCalendar,
        Self::NameCompatibility,
        Self::ZodiacMatch,
        Self::ChatAnalysis,
        Self::CommunicationGuidance,
        Self::PursuitStrategy,
        Self::ReconciliationAssessment,
        Self::EmotionalHealthAssessment,
        Self::UnrequitedLove,
        Self::RelationshipAnxiety,
        Self::BreakupRecovery,
        Self::EmotionalHealing,
    ];

    pub fn as_str(self) -> &'static str {
        self.template().key
    }

    /// Look up the static template for this identifier
    pub fn template(self) -> &'static PromptTemplate {
        match self {
            Self::MonthlyCalendar => &TEMPLATES[0],
            Self::NameCompatibility => &TEMPLATES[1],
            Self::ZodiacMatch => &TEMPLATES[2],
            Self::ChatAnalysis => &TEMPLATES[3],
            Self::CommunicationGuidance => &TEMPLATES[4],
            Self::PursuitStrategy => &TEMPLATES[5],
            Self::ReconciliationAssessment => &TEMPLATES[6],
            Self::EmotionalHealthAssessment => &TEMPLATES[7],
            Self::UnrequitedLove => &TEMPLATES[8],
            Self::RelationshipAnxiety => &TEMPLATES[9],
            Self::BreakupRecovery => &TEMPLATES[10],
            Self::EmotionalHealing => &TEMPLATES[11],
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown prompt template '{s}'"))
    }
}

/// Immutable prompt template
#[derive(Debug)]
pub struct PromptTemplate {
    pub id: TemplateId,
    pub key: &'static str,
    pub description: &'static str,
    /// Shared instructions placed before the body, if the template uses them
    pub preamble: Option<&'static str>,
    pub body: &'static str,
    pub variables: &'static [&'static str],
}

impl PromptTemplate {
    /// Produce the final prompt text
    pub fn render(&self, variables: &HashMap<String, String>) -> String {
        let body = fill_placeholders(self.body, variables);
        match self.preamble {
            Some(preamble) => format!("{preamble}\n{body}"),
            None => body,
        }
    }

    /// Declared variables that `variables` does not provide
    pub fn missing_variables(&self, variables: &HashMap<String, String>) -> Vec<&'static str> {
        self.variables
            .iter()
            .copied()
            .filter(|name| !variables.contains_key(*name))
            .collect()
    }
}

/// Replace every `{name}` in `template` whose name is a key of `variables`.
///
/// The scan is a single left-to-right pass, so substituted values are never
/// themselves searched for placeholders. Unknown names, unmatched braces and
/// braces around anything that is not an identifier are copied through.
pub fn fill_placeholders(template: &str, variables: &HashMap<String, String>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let replaced = after_open.find('}').and_then(|close| {
            let name = &after_open[..close];
            if is_placeholder_name(name) {
                variables
                    .get(name)
                    .map(|value| (value.as_str(), close))
            } else {
                None
            }
        });

        match replaced {
            Some((value, close)) => {
                output.push_str(value);
                rest = &after_open[close + 1..];
            }
            None => {
                output.push('{');
                rest = after_open;
            }
        }
    }

    output.push_str(rest);
    output
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

static TEMPLATES: [PromptTemplate; 12] = [
    PromptTemplate {
        id: TemplateId::MonthlyCalendar,
        key: "monthly_calendar",
        description: "Monthly love fortune for a zodiac sign",
        preamble: Some(COMMON_PREAMBLE),
        body: include_str!("../../prompts/monthly_calendar.md"),
        variables: &["zodiac_sign", "birth_date", "month", "year"],
    },
    PromptTemplate {
        id: TemplateId::NameCompatibility,
        key: "name_compatibility",
        description: "Compatibility reading of two names",
        preamble: Some(COMMON_PREAMBLE),
        body: include_str!("../../prompts/name_compatibility.md"),
        variables: &["name1", "name2", "lang"],
    },
    PromptTemplate {
        id: TemplateId::ZodiacMatch,
        key: "zodiac_match",
        description: "Compatibility of two zodiac signs",
        preamble: Some(COMMON_PREAMBLE),
        body: include_str!("../../prompts/zodiac_match.md"),
        variables: &["sign1", "sign2"],
    },
    PromptTemplate {
        id: TemplateId::ChatAnalysis,
        key: "chat_analysis",
        description: "Communication patterns in a chat history",
        preamble: None,
        body: include_str!("../../prompts/chat_analysis.md"),
        variables: &["chat_history"],
    },
    PromptTemplate {
        id: TemplateId::CommunicationGuidance,
        key: "communication_guidance",
        description: "Free-form communication advice",
        preamble: None,
        body: include_str!("../../prompts/communication_guidance.md"),
        variables: &["context"],
    },
    PromptTemplate {
        id: TemplateId::PursuitStrategy,
        key: "pursuit_strategy",
        description: "Personalised pursuit strategy",
        preamble: None,
        body: include_str!("../../prompts/pursuit_strategy.md"),
        variables: &[
            "target_personality",
            "relationship_status",
            "interaction_frequency",
            "common_interests",
            "challenges",
        ],
    },
    PromptTemplate {
        id: TemplateId::ReconciliationAssessment,
        key: "reconciliation_assessment",
        description: "Likelihood of getting back together",
        preamble: None,
        body: include_str!("../../prompts/reconciliation_assessment.md"),
        variables: &[
            "breakup_reason",
            "breakup_time",
            "current_contact",
            "mutual_friends",
            "past_issues",
            "changes_made",
        ],
    },
    PromptTemplate {
        id: TemplateId::EmotionalHealthAssessment,
        key: "emotional_health_assessment",
        description: "Attachment style and emotional health review",
        preamble: None,
        body: include_str!("../../prompts/emotional_health_assessment.md"),
        variables: &[
            "relationship_patterns",
            "emotional_triggers",
            "attachment_style",
            "self_esteem",
            "communication_style",
            "coping_mechanisms",
        ],
    },
    PromptTemplate {
        id: TemplateId::UnrequitedLove,
        key: "unrequited_love",
        description: "Analysis of an unrequited crush",
        preamble: Some(COMMON_PREAMBLE),
        body: include_str!("../../prompts/unrequited_love.md"),
        variables: &[
            "target_info",
            "current_status",
            "interaction_history",
            "personal_strengths",
            "challenges",
            "expectations",
        ],
    },
    PromptTemplate {
        id: TemplateId::RelationshipAnxiety,
        key: "relationship_anxiety",
        description: "Sources of anxiety inside a relationship",
        preamble: Some(COMMON_PREAMBLE),
        body: include_str!("../../prompts/relationship_anxiety.md"),
        variables: &[
            "relationship_status",
            "anxiety_triggers",
            "communication_patterns",
            "trust_issues",
            "personal_history",
            "coping_methods",
        ],
    },
    PromptTemplate {
        id: TemplateId::BreakupRecovery,
        key: "breakup_recovery",
        description: "Plan for recovering a relationship after a breakup",
        preamble: Some(COMMON_PREAMBLE),
        body: include_str!("../../prompts/breakup_recovery.md"),
        variables: &[
            "breakup_reason",
            "current_situation",
            "contact_status",
            "personal_growth",
            "reconciliation_attempts",
            "future_plans",
        ],
    },
    PromptTemplate {
        id: TemplateId::EmotionalHealing,
        key: "emotional_healing",
        description: "Healing plan after emotional harm",
        preamble: Some(COMMON_PREAMBLE),
        body: include_str!("../../prompts/emotional_healing.md"),
        variables: &[
            "emotional_wounds",
            "trust_issues",
            "communication_problems",
            "personal_growth",
            "relationship_goals",
            "healing_progress",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_placeholder_is_replaced_everywhere() {
        let out = fill_placeholders("{lang}: A {lang} B", &vars(&[("lang", "EN")]));
        assert_eq!(out, "EN: A EN B");
    }

    #[test]
    fn unresolved_placeholder_is_left_verbatim() {
        let out = fill_placeholders("hello {missing} {name}", &vars(&[("name", "Ann")]));
        assert_eq!(out, "hello {missing} Ann");
    }

    #[test]
    fn values_are_not_rescanned() {
        let out = fill_placeholders(
            "{a} and {b}",
            &vars(&[("a", "{b}"), ("b", "second")]),
        );
        assert_eq!(out, "{b} and second");
    }

    #[test]
    fn stray_braces_pass_through() {
        let out = fill_placeholders("{ not a key } {x", &vars(&[("x", "1")]));
        assert_eq!(out, "{ not a key } {x");
        assert_eq!(fill_placeholders("}{}{", &HashMap::new()), "}{}{");
    }

    #[test]
    fn every_template_declares_exactly_its_placeholders() {
        for id in TemplateId::ALL {
            let template = id.template();
            assert_eq!(template.id, id);
            for name in template.variables {
                assert!(
                    template.body.contains(&format!("{{{name}}}")),
                    "{id} does not use {{{name}}}"
                );
            }
            let filled: HashMap<String, String> = template
                .variables
                .iter()
                .map(|name| (name.to_string(), "X".to_string()))
                .collect();
            let rendered = template.render(&filled);
            for name in template.variables {
                assert!(!rendered.contains(&format!("{{{name}}}")));
            }
        }
    }

    #[test]
    fn preamble_precedes_body() {
        let template = TemplateId::NameCompatibility.template();
        let rendered = template.render(&vars(&[
            ("name1", "Alice"),
            ("name2", "Bob"),
            ("lang", "English"),
        ]));
        assert!(rendered.starts_with(COMMON_PREAMBLE));
        assert!(rendered.contains("# Alice & Bob"));
        assert!(template.missing_variables(&HashMap::new()).contains(&"lang"));
    }

    #[test]
    fn template_ids_parse_from_keys() {
        for id in TemplateId::ALL {
            assert_eq!(id.as_str().parse::<TemplateId>(), Ok(id));
        }
        assert!("nope".parse::<TemplateId>().is_err());
    }
}
