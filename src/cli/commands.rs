//! Command handlers

use crate::cli::args::{Cli, Commands};
use crate::cli::output::{TerminalSink, print_heading, print_markdown};
use anyhow::{Context, Result, bail};
use console::{Term, style};
use savemylove_core::config::load_dotenv;
use savemylove_core::consult::{
    BreakupRecovery, ChatAnalysis, CommunicationGuidance, EmotionalHealing,
    EmotionalHealthAssessment, MonthlyCalendar, NameCompatibility, PursuitStrategy,
    ReconciliationAssessment, RelationshipAnxiety, UnrequitedLove, ZodiacMatch,
};
use savemylove_core::{
    AppConfig, ConsultationForm, Consultant, DeltaSink, DisplayBuffer, TemplateId, normalize_markdown,
};
use std::io::Read;
use std::path::Path;
use tracing::{debug, error};

/// Options shared by every consultation command
struct RunOptions<'a> {
    cli: &'a Cli,
    config: AppConfig,
}

pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match &cli.command {
        Commands::Templates => {
            list_templates();
            return Ok(());
        }
        Commands::InitConfig { output, force } => return init_config(output, *force),
        _ => {}
    }

    let config = load_config(cli.config.as_deref())?;
    let options = RunOptions { cli: &cli, config };

    match &cli.command {
        Commands::NameCompatibility { name1, name2 } => {
            let form = NameCompatibility {
                name1: name1.clone(),
                name2: name2.clone(),
                language: cli.lang,
            };
            consult(&options, &form).await
        }
        Commands::ZodiacMatch { sign1, sign2 } => {
            let form = ZodiacMatch {
                sign1: sign1.clone(),
                sign2: sign2.clone(),
            };
            consult(&options, &form).await
        }
        Commands::MonthlyCalendar {
            sign,
            birth_date,
            month,
            year,
        } => {
            let form = MonthlyCalendar {
                zodiac_sign: sign.clone(),
                birth_date: birth_date.clone(),
                month: *month,
                year: *year,
            };
            consult(&options, &form).await
        }
        Commands::ChatAnalysis { file, screenshot } => {
            let form = ChatAnalysis {
                chat_history: read_chat_history(file.as_deref())?,
                screenshot_url: screenshot.clone(),
            };
            consult(&options, &form).await
        }
        Commands::Guidance { context } => {
            let form = CommunicationGuidance {
                context: context.join(" "),
                language: Some(cli.lang),
            };
            consult(&options, &form).await
        }
        Commands::PursuitStrategy(args) => {
            consult(&options, &PursuitStrategy::from(args.clone())).await
        }
        Commands::Reconciliation(args) => {
            consult(&options, &ReconciliationAssessment::from(args.clone())).await
        }
        Commands::EmotionalHealth(args) => {
            consult(&options, &EmotionalHealthAssessment::from(args.clone())).await
        }
        Commands::UnrequitedLove(args) => {
            consult(&options, &UnrequitedLove::from(args.clone())).await
        }
        Commands::RelationshipAnxiety(args) => {
            consult(&options, &RelationshipAnxiety::from(args.clone())).await
        }
        Commands::BreakupRecovery(args) => {
            consult(&options, &BreakupRecovery::from(args.clone())).await
        }
        Commands::EmotionalHealing(args) => {
            consult(&options, &EmotionalHealing::from(args.clone())).await
        }
        Commands::Templates | Commands::InitConfig { .. } => Ok(()),
    }
}

/// Defaults, then the config file, then `.env` and the process environment
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            load_dotenv()?;
            let mut config = AppConfig::load_from_file(path)?;
            config.apply_env_overrides(|key| std::env::var(key).ok());
            Ok(config)
        }
        None => AppConfig::load(),
    }
}

fn read_chat_history(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chat log: {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read chat log from stdin")?;
            Ok(buffer)
        }
    }
}

async fn consult<F>(options: &RunOptions<'_>, form: &F) -> Result<()>
where
    F: ConsultationForm,
{
    let cli = options.cli;
    let language = cli.lang;

    if cli.print_prompt {
        println!("{}", form.render_prompt());
        return Ok(());
    }

    let consultant = Consultant::from_config(&options.config)
        .context("Failed to initialize completion client")?;
    let model = cli.model.as_deref();
    debug!(template = %form.template(), "dispatching consultation");

    let stdout = Term::stdout();
    let streaming = !cli.no_stream;
    let mut sink = TerminalSink::new(
        stdout.clone(),
        streaming && (cli.raw || stdout.is_term()),
        DisplayBuffer::with_config(&options.config.display),
    );
    let live = sink.is_live();

    if !live {
        eprintln!("{}", style(language.analyzing()).dim());
    }

    let result = if streaming {
        consultant
            .run(form, model, Some(&mut sink as &mut dyn DeltaSink))
            .await
    } else {
        consultant.run(form, model, None).await
    };

    match result {
        Ok(text) => show_reply(cli, &sink, &text),
        Err(err) => {
            error!("consultation failed: {err}");
            if let Some(partial) = err.partial_content().filter(|text| !text.is_empty()) {
                show_reply(cli, &sink, partial)?;
            }
            Err(anyhow::Error::new(err).context(language.error_occurred()))
        }
    }
}

/// Replace any live echo with the final reply
fn show_reply(cli: &Cli, sink: &TerminalSink, text: &str) -> Result<()> {
    if cli.raw {
        if !sink.is_live() {
            print!("{text}");
        }
        println!();
        return Ok(());
    }

    sink.clear_live_output()
        .context("Failed to clear streamed output")?;
    let rendered = if sink.raw() == text {
        sink.normalized().to_string()
    } else {
        normalize_markdown(text)
    };
    print_heading(cli.lang);
    print_markdown(&rendered);
    Ok(())
}

fn list_templates() {
    for id in TemplateId::ALL {
        let template = id.template();
        println!(
            "{:<28} {}",
            style(template.key).cyan().bold(),
            template.description
        );
        println!("{:<28} {}", "", style(template.variables.join(", ")).dim());
    }
}

fn init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            output.display()
        );
    }
    AppConfig::create_sample_config(output)?;
    println!(
        "{} {}",
        style("Wrote").green().bold(),
        output.display()
    );
    Ok(())
}
