//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use savemylove_core::{
    BreakupRecovery, EmotionalHealing, EmotionalHealthAssessment, Language, PursuitStrategy,
    ReconciliationAssessment, RelationshipAnxiety, UnrequitedLove,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "savemylove",
    version,
    about = "Relationship consultations streamed from an LLM, rendered as Markdown in your terminal"
)]
pub struct Cli {
    /// Configuration file; defaults to ./savemylove.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Interface language (zh or en)
    #[arg(long, global = true, default_value = "en")]
    pub lang: Language,

    /// Model ID overriding the configured one, e.g. openai/gpt-4o
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Wait for the whole reply instead of streaming it
    #[arg(long, global = true)]
    pub no_stream: bool,

    /// Print the reply exactly as received, without Markdown rendering
    #[arg(long, global = true)]
    pub raw: bool,

    /// Print the rendered prompt and exit without sending it
    #[arg(long, global = true)]
    pub print_prompt: bool,

    /// Debug logging for this run when RUST_LOG is unset
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable color output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Name compatibility reading for two people
    NameCompatibility { name1: String, name2: String },

    /// Compatibility of two zodiac signs
    ZodiacMatch { sign1: String, sign2: String },

    /// Love fortune calendar for one month
    MonthlyCalendar {
        #[arg(long)]
        sign: String,
        /// Birth date, e.g. 1995-06-18
        #[arg(long)]
        birth_date: String,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        #[arg(long)]
        year: i32,
    },

    /// Analyze an exported chat log
    ChatAnalysis {
        /// File holding the chat log; reads stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
        /// Screenshot URL sent along with the log
        #[arg(long)]
        screenshot: Option<String>,
    },

    /// Ask for communication advice about a situation
    Guidance {
        /// Describe the situation
        #[arg(required = true)]
        context: Vec<String>,
    },

    PursuitStrategy(PursuitArgs),
    Reconciliation(ReconciliationArgs),
    EmotionalHealth(EmotionalHealthArgs),
    UnrequitedLove(UnrequitedLoveArgs),
    RelationshipAnxiety(RelationshipAnxietyArgs),
    BreakupRecovery(BreakupRecoveryArgs),
    EmotionalHealing(EmotionalHealingArgs),

    /// List every consultation template
    Templates,

    /// Write a sample savemylove.toml
    InitConfig {
        #[arg(long, default_value = "savemylove.toml")]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Personalised strategy for winning someone over
#[derive(Args, Debug, Clone)]
pub struct PursuitArgs {
    #[arg(long)]
    pub target_personality: String,
    #[arg(long)]
    pub relationship_status: String,
    #[arg(long)]
    pub interaction_frequency: String,
    #[arg(long)]
    pub common_interests: String,
    #[arg(long)]
    pub challenges: String,
}

impl From<PursuitArgs> for PursuitStrategy {
    fn from(args: PursuitArgs) -> Self {
        Self {
            target_personality: args.target_personality,
            relationship_status: args.relationship_status,
            interaction_frequency: args.interaction_frequency,
            common_interests: args.common_interests,
            challenges: args.challenges,
        }
    }
}

/// Chances of getting back together
#[derive(Args, Debug, Clone)]
pub struct ReconciliationArgs {
    #[arg(long)]
    pub breakup_reason: String,
    #[arg(long)]
    pub breakup_time: String,
    #[arg(long)]
    pub current_contact: String,
    #[arg(long)]
    pub mutual_friends: String,
    #[arg(long)]
    pub past_issues: String,
    #[arg(long)]
    pub changes_made: String,
}

impl From<ReconciliationArgs> for ReconciliationAssessment {
    fn from(args: ReconciliationArgs) -> Self {
        Self {
            breakup_reason: args.breakup_reason,
            breakup_time: args.breakup_time,
            current_contact: args.current_contact,
            mutual_friends: args.mutual_friends,
            past_issues: args.past_issues,
            changes_made: args.changes_made,
        }
    }
}

/// Attachment style and emotional health review
#[derive(Args, Debug, Clone)]
pub struct EmotionalHealthArgs {
    #[arg(long)]
    pub relationship_patterns: String,
    #[arg(long)]
    pub emotional_triggers: String,
    #[arg(long)]
    pub attachment_style: String,
    #[arg(long)]
    pub self_esteem: String,
    #[arg(long)]
    pub communication_style: String,
    #[arg(long)]
    pub coping_mechanisms: String,
}

impl From<EmotionalHealthArgs> for EmotionalHealthAssessment {
    fn from(args: EmotionalHealthArgs) -> Self {
        Self {
            relationship_patterns: args.relationship_patterns,
            emotional_triggers: args.emotional_triggers,
            attachment_style: args.attachment_style,
            self_esteem: args.self_esteem,
            communication_style: args.communication_style,
            coping_mechanisms: args.coping_mechanisms,
        }
    }
}

/// Making sense of an unrequited crush
#[derive(Args, Debug, Clone)]
pub struct UnrequitedLoveArgs {
    #[arg(long)]
    pub target_info: String,
    #[arg(long)]
    pub current_status: String,
    #[arg(long)]
    pub interaction_history: String,
    #[arg(long)]
    pub personal_strengths: String,
    #[arg(long)]
    pub challenges: String,
    #[arg(long)]
    pub expectations: String,
}

impl From<UnrequitedLoveArgs> for UnrequitedLove {
    fn from(args: UnrequitedLoveArgs) -> Self {
        Self {
            target_info: args.target_info,
            current_status: args.current_status,
            interaction_history: args.interaction_history,
            personal_strengths: args.personal_strengths,
            challenges: args.challenges,
            expectations: args.expectations,
        }
    }
}

/// Where anxiety in a relationship comes from
#[derive(Args, Debug, Clone)]
pub struct RelationshipAnxietyArgs {
    #[arg(long)]
    pub relationship_status: String,
    #[arg(long)]
    pub anxiety_triggers: String,
    #[arg(long)]
    pub communication_patterns: String,
    #[arg(long)]
    pub trust_issues: String,
    #[arg(long)]
    pub personal_history: String,
    #[arg(long)]
    pub coping_methods: String,
}

impl From<RelationshipAnxietyArgs> for RelationshipAnxiety {
    fn from(args: RelationshipAnxietyArgs) -> Self {
        Self {
            relationship_status: args.relationship_status,
            anxiety_triggers: args.anxiety_triggers,
            communication_patterns: args.communication_patterns,
            trust_issues: args.trust_issues,
            personal_history: args.personal_history,
            coping_methods: args.coping_methods,
        }
    }
}

/// Plan for winning a partner back after a breakup
#[derive(Args, Debug, Clone)]
pub struct BreakupRecoveryArgs {
    #[arg(long)]
    pub breakup_reason: String,
    #[arg(long)]
    pub current_situation: String,
    #[arg(long)]
    pub contact_status: String,
    #[arg(long)]
    pub personal_growth: String,
    #[arg(long)]
    pub reconciliation_attempts: String,
    #[arg(long)]
    pub future_plans: String,
}

impl From<BreakupRecoveryArgs> for BreakupRecovery {
    fn from(args: BreakupRecoveryArgs) -> Self {
        Self {
            breakup_reason: args.breakup_reason,
            current_situation: args.current_situation,
            contact_status: args.contact_status,
            personal_growth: args.personal_growth,
            reconciliation_attempts: args.reconciliation_attempts,
            future_plans: args.future_plans,
        }
    }
}

/// Healing plan after emotional harm
#[derive(Args, Debug, Clone)]
pub struct EmotionalHealingArgs {
    #[arg(long)]
    pub emotional_wounds: String,
    #[arg(long)]
    pub trust_issues: String,
    #[arg(long)]
    pub communication_problems: String,
    #[arg(long)]
    pub personal_growth: String,
    #[arg(long)]
    pub relationship_goals: String,
    #[arg(long)]
    pub healing_progress: String,
}

impl From<EmotionalHealingArgs> for EmotionalHealing {
    fn from(args: EmotionalHealingArgs) -> Self {
        Self {
            emotional_wounds: args.emotional_wounds,
            trust_issues: args.trust_issues,
            communication_problems: args.communication_problems,
            personal_growth: args.personal_growth,
            relationship_goals: args.relationship_goals,
            healing_progress: args.healing_progress,
        }
    }
}
