//! Command-line front end: argument parsing and command dispatch.
//! Review sessions run interactively over stdin.

use anyhow::{Context, anyhow};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use srs_app::database::{CardRepository, CardService, SqliteStore};
use srs_app::export::json::{export_json_to_path, import_json};
use srs_app::models::{Clock, FixedClock, Quality, ReviewRecord, ReviewSession, SystemClock};
use srs_app::SrsConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "srs", about = "Spaced-repetition review scheduler")]
pub struct Cli {
    /// Config file (default ~/.srs/srs.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path, overrides the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Simulated current time (RFC 3339), instead of the wall clock
    #[arg(long, global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register an item; existing items are left unchanged
    Add { id: String, content_ref: String },
    /// Grade an item 0-5 and reschedule it
    Review {
        id: String,
        content_ref: String,
        quality: Quality,
    },
    /// List items that are due now
    Due {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Work through the due queue interactively
    Session {
        /// Item to make sure is in the queue
        #[arg(long, requires = "content_ref")]
        id: Option<String>,
        #[arg(long)]
        content_ref: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print counters over all items
    Stats,
    /// Write all items to a JSON file
    Export { path: PathBuf },
    /// Load items from a JSON file
    Import {
        path: PathBuf,
        /// Replace the stored items instead of merging
        #[arg(long)]
        replace: bool,
    },
}

/// Formats an epoch-millisecond timestamp as a local YYYY-MM-DD HH:MM string
fn format_due(card: &ReviewRecord) -> String {
    match card.due_at() {
        Some(due) => {
            let local: DateTime<Local> = due.into();
            local.format("%Y-%m-%d %H:%M").to_string()
        }
        None => "-".to_string(),
    }
}

fn print_card(card: &ReviewRecord) {
    println!(
        "{:<20} {:<8} due {}  interval {:>4}d  ef {:.2}  reps {:>2}  lapses {:>2}",
        card.id,
        card.content_ref,
        format_due(card),
        card.interval,
        card.easiness,
        card.repetitions,
        card.lapses
    );
}

fn build_clock(now: Option<&str>) -> anyhow::Result<Arc<dyn Clock>> {
    match now {
        Some(raw) => {
            let at = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid --now value '{raw}'"))?;
            Ok(Arc::new(FixedClock::new(at.with_timezone(&Utc).timestamp_millis())))
        }
        None => Ok(Arc::new(SystemClock)),
    }
}

pub async fn run(cli: Cli, config: SrsConfig) -> anyhow::Result<()> {
    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let clock = build_clock(cli.now.as_deref())?;
    let service = CardService::new(CardRepository::new(store, config.storage_key.clone()), clock);

    match cli.command {
        Command::Add { id, content_ref } => {
            let card = service.ensure_item(&id, &content_ref).await?;
            print_card(&card);
        }
        Command::Review {
            id,
            content_ref,
            quality,
        } => {
            let card = service.review_item(&id, &content_ref, quality).await?;
            print_card(&card);
        }
        Command::Due { limit } => {
            let due = service.due(limit.unwrap_or(config.due_limit)).await?;
            if due.is_empty() {
                println!("Nothing due.");
            }
            for card in &due {
                print_card(card);
            }
        }
        Command::Session {
            id,
            content_ref,
            limit,
        } => {
            let limit = limit.unwrap_or(config.session_limit);
            let session = match (id, content_ref) {
                (Some(id), Some(content_ref)) => {
                    ReviewSession::start_with(&service, &id, &content_ref, limit).await?
                }
                _ => ReviewSession::start(&service, limit).await?,
            };
            run_session(session).await?;
        }
        Command::Stats => {
            let stats = service.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Export { path } => {
            let cards = service.snapshot().await?;
            export_json_to_path(&cards, &path)?;
            println!("Exported {} cards to '{}'", cards.len(), path.display());
        }
        Command::Import { path, replace } => {
            let cards = import_json(&path)?;
            let total = service.import(cards, !replace).await?;
            println!("Imported '{}', {} cards stored", path.display(), total);
        }
    }
    Ok(())
}

async fn run_session(
    mut session: ReviewSession<'_, SqliteStore>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(card) = session.current() {
        println!("{}", session.phase_message());
        println!("  {}  ({})", card.content_ref, card.id);
        println!("  How did it go? 0-2 fail, 3 hard, 4 good, 5 perfect (q to stop)");

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }
        let quality: Quality = match line.parse() {
            Ok(q) => q,
            Err(e) => {
                println!("  {e}");
                continue;
            }
        };
        let card = session
            .answer(quality)
            .await?
            .ok_or_else(|| anyhow!("session ended unexpectedly"))?;
        println!("  next review {}", format_due(&card));
    }

    let summary = session.summary();
    if session.is_completed() {
        println!("Nothing left to review.");
    }
    println!(
        "{} answered, {} passed, {} failed over {} round(s)",
        summary.answered, summary.passed, summary.failed, summary.rounds
    );
    Ok(())
}
