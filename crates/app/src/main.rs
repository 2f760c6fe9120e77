use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use services::{ApiConfig, AppServices, Clock};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use trivia_core::model::{Difficulty, QuestionAmount};

mod terminal;

#[derive(Debug, Error)]
enum ArgsError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
}

/// Trivia quiz in the terminal, backed by Open Trivia DB.
#[derive(Parser, Debug)]
#[command(name = "trivia", version, about, long_about = None)]
struct Cli {
    /// SQLite database holding the high score
    #[arg(long, env = "TRIVIA_DB_URL", default_value = "sqlite://trivia.sqlite3")]
    db: String,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, env = "TRIVIA_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Play a round (default)
    Play(PlayArgs),
    /// List the available question categories
    Categories,
    /// Show the best score so far
    HighScore,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
struct PlayArgs {
    /// easy, medium or hard
    #[arg(long, default_value = "easy")]
    difficulty: Difficulty,

    /// Number of questions: 5, 10, 15 or 20
    #[arg(long, default_value = "10")]
    amount: QuestionAmount,

    /// Category id, see `trivia categories`
    #[arg(long)]
    category: Option<u32>,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            amount: QuestionAmount::default(),
            category: None,
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" {
        return trimmed.to_owned();
    }

    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let (path_str, query) = match path_str.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_str, None),
    };
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    match query {
        Some(query) => format!("sqlite://{}?{query}", absolute.display()),
        None => format!("sqlite://{}", absolute.display()),
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_owned(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.ends_with('/') {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_owned(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db_url = normalize_sqlite_url(&cli.db);
    prepare_sqlite_file(&db_url)?;

    let api_config = ApiConfig::from_env()?;
    tracing::debug!(db = %db_url, api = %api_config.base_url, "starting");
    let services = AppServices::new_sqlite(&db_url, &api_config, Clock::system()).await?;

    match cli.command.unwrap_or(Command::Play(PlayArgs::default())) {
        Command::Play(args) => {
            terminal::play(&services, args.difficulty, args.amount, args.category).await
        }
        Command::Categories => terminal::list_categories(&services).await,
        Command::HighScore => terminal::show_high_score(&services).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
