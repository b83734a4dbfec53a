use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use vita_assistant::Assistant;
use vita_core::store::UserStore;
use vita_core::{
    assessment, catalog, recommend, ActivityKind, ActivityLevel, ActivityLog, Assessment,
    BmiCategory, PainArea, PainSeverity, StressLog, UserProfile, WeightLog,
};
use vita_providers::OpenAIProvider;
use vita_store::SqliteStore;

mod chat;
mod config;

use config::Config;

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser)]
#[command(name = "vita")]
#[command(author, version, about = "Vita: wellness tracking with an AI assistant", long_about = None)]
struct Cli {
    /// API key for the completion service (overrides config and environment)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Take a wellness assessment
    Assess(AssessArgs),
    /// Log a single metric
    Log {
        #[arg(long)]
        email: String,
        #[command(subcommand)]
        entry: LogCommand,
    },
    /// Manage wellness challenges
    Challenge {
        #[arg(long)]
        email: String,
        #[command(subcommand)]
        action: ChallengeCommand,
    },
    /// Show daily wellness tips
    Tip {
        /// Category name; omit to list all categories
        category: Option<String>,
    },
    /// Print the latest assessment, recommendations, and recent logs
    Report {
        #[arg(long)]
        email: String,
    },
    /// Chat with the wellness assistant
    Chat {
        #[arg(long)]
        email: String,
    },
}

#[derive(Args)]
struct AssessArgs {
    #[arg(long)]
    email: String,

    /// How stressful is work right now? (0-10)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    work_stress: u8,

    /// How well are you sleeping? (0 = badly, 10 = great)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    sleep_quality: u8,

    /// How anxious do you feel? (0-10)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    anxiety: u8,

    /// How balanced are work and life? (0 = not at all, 10 = fully)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    balance: u8,

    #[arg(long)]
    weight_kg: f64,

    #[arg(long)]
    height_m: f64,

    /// Typical daily activity level
    #[arg(long, default_value = "sedentary")]
    activity_level: ActivityLevel,

    #[arg(long, default_value = "none")]
    neck: PainSeverity,

    #[arg(long, default_value = "none")]
    shoulders: PainSeverity,

    #[arg(long, default_value = "none")]
    back: PainSeverity,

    #[arg(long, default_value = "none")]
    wrists: PainSeverity,

    #[arg(long, default_value = "none")]
    head: PainSeverity,
}

#[derive(Subcommand)]
enum LogCommand {
    /// Log body weight in kilograms
    Weight { value: f64 },
    /// Log a stress score (0-10)
    Stress {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=10))]
        score: u8,
    },
    /// Log an activity session
    Activity { kind: ActivityKind, minutes: u32 },
}

#[derive(Subcommand)]
enum ChallengeCommand {
    /// List available challenges and your active ones
    List,
    /// Start a challenge from the catalog
    Start { name: String },
    /// Mark a task done for an active challenge
    Done { id: i64, task: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_level.as_filter()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    let db_path = config.database_path()?;
    let store = SqliteStore::new(&db_path).context("Failed to open the vita database")?;
    tracing::debug!(path = %db_path.display(), "database opened");

    match cli.command {
        Commands::Signup { name, email } => signup(&store, &name, &email),
        Commands::Assess(args) => assess(&store, &args),
        Commands::Log { email, entry } => log_metric(&store, &email, entry),
        Commands::Challenge { email, action } => challenge(&store, &email, action),
        Commands::Tip { category } => tips(category.as_deref()),
        Commands::Report { email } => report(&store, &email),
        Commands::Chat { email } => {
            let api_key = config.resolve_api_key(cli.api_key.as_deref())?;
            let mut provider = OpenAIProvider::new(api_key);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url);
            }
            if let Some(model) = &config.model {
                provider = provider.with_default_model(model);
            }

            let user = resolve_user(&store, &email)?;
            let assistant = Assistant::new(Arc::new(provider), Arc::new(store));
            chat::run(&assistant, user.id, &user.name).await
        }
    }
}

fn resolve_user(store: &SqliteStore, email: &str) -> Result<UserProfile> {
    store
        .user_by_email(email)?
        .ok_or_else(|| anyhow::anyhow!("No account for {email}. Run `vita signup` first."))
}

fn signup(store: &SqliteStore, name: &str, email: &str) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Name must not be empty");
    }
    let id = store.create_user(name.trim(), email.trim())?;
    println!("Welcome, {name}! Your account is ready (user #{id}).");
    Ok(())
}

fn assess(store: &SqliteStore, args: &AssessArgs) -> Result<()> {
    let user = resolve_user(store, &args.email)?;

    // High sleep quality and good balance mean low stress, so those two
    // answers are inverted before normalizing.
    let responses = assessment::StressResponses {
        work_stress: args.work_stress as f64 / 10.0,
        sleep_quality: (10 - args.sleep_quality) as f64 / 10.0,
        anxiety_level: args.anxiety as f64 / 10.0,
        work_life_balance: (10 - args.balance) as f64 / 10.0,
    };
    let stress_score = assessment::stress_score(&responses);
    let bmi = assessment::bmi(args.weight_kg, args.height_m);

    let mut pain_points = BTreeMap::new();
    for (area, severity) in [
        (PainArea::Neck, args.neck),
        (PainArea::Shoulders, args.shoulders),
        (PainArea::Back, args.back),
        (PainArea::Wrists, args.wrists),
        (PainArea::Head, args.head),
    ] {
        pain_points.insert(area, severity);
    }
    let physical_score = assessment::physical_score(&pain_points);

    let result = Assessment {
        timestamp: Utc::now(),
        stress_score,
        bmi,
        activity_level: args.activity_level,
        physical_score,
        pain_points,
    };
    store.save_assessment(user.id, &result)?;

    println!("Assessment saved for {}.", user.name);
    println!();
    print_assessment(&result);
    print_recommendations(&result);
    Ok(())
}

fn print_assessment(result: &Assessment) {
    println!("Stress score:    {}/10", result.stress_score);
    println!(
        "BMI:             {:.1} ({})",
        result.bmi,
        BmiCategory::from_bmi(result.bmi)
    );
    println!(
        "Physical risk:   {}",
        assessment::discomfort_risk(result.physical_score)
    );
    println!("Activity level:  {}", result.activity_level);
}

fn print_recommendations(result: &Assessment) {
    println!("\nStress recommendations:");
    for item in recommend::stress_recommendations(result.stress_score) {
        println!("  - {item}");
    }

    let ergonomic = recommend::ergonomic_recommendations(&result.pain_points);
    if !ergonomic.is_empty() {
        println!("\nErgonomic recommendations:");
        for item in ergonomic {
            println!("  - {item}");
        }
    }

    println!("\nActivity recommendations:");
    for item in recommend::activity_recommendations(result.bmi, result.activity_level) {
        println!("  - {item}");
    }
}

fn log_metric(store: &SqliteStore, email: &str, entry: LogCommand) -> Result<()> {
    let user = resolve_user(store, email)?;
    let timestamp = Utc::now();

    match entry {
        LogCommand::Weight { value } => {
            if value <= 0.0 {
                anyhow::bail!("Weight must be greater than zero");
            }
            store.log_weight(
                user.id,
                &WeightLog {
                    timestamp,
                    weight_kg: value,
                },
            )?;
            println!("Logged weight: {value:.1} kg");
        }
        LogCommand::Stress { score } => {
            store.log_stress(user.id, &StressLog { timestamp, score })?;
            println!("Logged stress: {score}/10");
        }
        LogCommand::Activity { kind, minutes } => {
            if minutes == 0 {
                anyhow::bail!("Duration must be greater than zero");
            }
            store.log_activity(
                user.id,
                &ActivityLog {
                    timestamp,
                    kind,
                    minutes,
                },
            )?;
            println!("Logged activity: {minutes} minutes of {kind}");
        }
    }
    Ok(())
}

fn challenge(store: &SqliteStore, email: &str, action: ChallengeCommand) -> Result<()> {
    let user = resolve_user(store, email)?;

    match action {
        ChallengeCommand::List => {
            println!("Available challenges:");
            for template in catalog::CHALLENGES {
                println!(
                    "  {} ({} days) - {}",
                    template.name, template.duration_days, template.description
                );
                for task in template.daily_tasks {
                    println!("      - {task}");
                }
            }

            let active = store.active_challenges(user.id)?;
            if active.is_empty() {
                println!("\nNo active challenges.");
            } else {
                println!("\nYour active challenges:");
                for challenge in active {
                    println!(
                        "  #{} {} - day {}, {} tasks done",
                        challenge.id,
                        challenge.name,
                        challenge.progress.current_day,
                        challenge.progress.completed_tasks.len()
                    );
                }
            }
        }
        ChallengeCommand::Start { name } => {
            let template = catalog::challenge_by_name(&name).ok_or_else(|| {
                anyhow::anyhow!("No challenge named '{name}'. See `vita challenge list`.")
            })?;
            let id =
                store.start_challenge(user.id, template.name, Utc::now(), template.duration_days)?;
            println!(
                "Started {} (#{id}), {} days. Good luck!",
                template.name, template.duration_days
            );
        }
        ChallengeCommand::Done { id, task } => {
            let mut challenge = store
                .active_challenges(user.id)?
                .into_iter()
                .find(|c| c.id == id)
                .ok_or_else(|| anyhow::anyhow!("No active challenge #{id}"))?;
            challenge.complete_task(task.clone());
            store.update_challenge_progress(id, &challenge.progress)?;
            println!(
                "Done: {task} ({} now on day {})",
                challenge.name, challenge.progress.current_day
            );
        }
    }
    Ok(())
}

fn tips(category: Option<&str>) -> Result<()> {
    match category {
        Some(name) => {
            let found = catalog::DAILY_TIPS
                .iter()
                .find(|c| c.category.eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow::anyhow!("No tip category named '{name}'"))?;
            println!("{}:", found.category);
            for tip in found.tips {
                println!("  - {tip}");
            }
        }
        None => {
            for category in catalog::DAILY_TIPS {
                println!("{}:", category.category);
                for tip in category.tips {
                    println!("  - {tip}");
                }
                println!();
            }
        }
    }
    Ok(())
}

fn report(store: &SqliteStore, email: &str) -> Result<()> {
    let user = resolve_user(store, email)?;
    let metrics = store.metrics(user.id)?;

    println!("Wellness report for {}", user.name);
    println!("========================================");

    match metrics.latest_assessment() {
        Some(latest) => {
            println!(
                "Latest assessment ({}):",
                latest.timestamp.format("%Y-%m-%d")
            );
            print_assessment(latest);
            print_recommendations(latest);
        }
        None => println!("No assessments yet. Run `vita assess` to take one."),
    }

    if !metrics.weight_logs.is_empty() {
        println!("\nRecent weight logs:");
        for log in metrics.weight_logs.iter().take(5) {
            println!(
                "  {} - {:.1} kg",
                log.timestamp.format("%Y-%m-%d"),
                log.weight_kg
            );
        }
    }

    if !metrics.stress_logs.is_empty() {
        println!("\nRecent stress logs:");
        for log in metrics.stress_logs.iter().take(5) {
            println!("  {} - {}/10", log.timestamp.format("%Y-%m-%d"), log.score);
        }
    }

    if !metrics.activity_logs.is_empty() {
        println!("\nRecent activities:");
        for log in metrics.activity_logs.iter().take(5) {
            println!(
                "  {} - {} minutes of {}",
                log.timestamp.format("%Y-%m-%d"),
                log.minutes,
                log.kind
            );
        }
    }

    Ok(())
}
