use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use flashdeck_core::ReviewSession;
use flashdeck_core::model::{Card, CardStatus};
use services::{DeckService, JsonSeed, SeedProvider};
use storage::repository::Storage;

mod cli;
mod logging;

use cli::{Cli, Command};

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its directory exist before connecting.
fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .with_context(|| format!("invalid --db value: {db_url}"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }

    Ok(())
}

fn print_card(session: &ReviewSession, show_answer: bool) {
    let Some(card) = session.current_card() else {
        println!("The deck is empty.");
        return;
    };

    let status = match card.status() {
        CardStatus::Unset => String::new(),
        other => format!("  [{other}]"),
    };
    println!(
        "({}/{}) #{}{}",
        session.current_index() + 1,
        session.len(),
        card.id(),
        status
    );
    println!("{}", card.front());
    if show_answer {
        println!("---");
        for line in card.back_lines() {
            println!("{line}");
        }
    }
}

fn print_list<'a>(cards: impl IntoIterator<Item = &'a Card>) {
    for card in cards {
        println!("{:>5}  {:<11}  {}", card.id(), card.status().label(), card.front());
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    let storage = Storage::shared_sqlite(&db_url)
        .await
        .with_context(|| format!("opening {db_url}"))?;

    let seed: Arc<dyn SeedProvider> = match cli.seed {
        Some(path) => Arc::new(JsonSeed::from_path(path)),
        None => Arc::new(JsonSeed::bundled()),
    };
    let deck = DeckService::from_storage(&storage, seed);

    let command = cli.command.unwrap_or(Command::Show { answer: false });
    let session = match command {
        Command::Reset => deck.reset().await?,
        Command::Merge => deck.merge().await?,
        _ => deck.initialize().await?,
    };

    match command {
        Command::Show { answer } => print_card(&session, answer),
        Command::Next => print_card(&deck.go_next(&session).await?, false),
        Command::Prev => print_card(&deck.go_previous(&session).await?, false),
        Command::Open { id } => {
            let session = deck.select(&session, id).await?;
            if session.current_card().map(Card::id) != Some(id) {
                bail!("no card with id {id} in the deck");
            }
            print_card(&session, false);
        }
        Command::Status { status } => {
            let session = deck.set_status(&session, status).await?;
            if let Some(card) = session.current_card() {
                println!("#{} tagged {}", card.id(), status.label());
            }
        }
        Command::Edit { front, back } => {
            if front.is_none() && back.is_none() {
                bail!("nothing to edit: pass --front and/or --back");
            }
            let session = deck.edit_card(&session, front, back).await?;
            print_card(&session, true);
        }
        Command::List { status: Some(status) } => {
            print_list(&deck.cards_with_status(status).await?);
        }
        Command::List { status: None } => print_list(session.deck()),
        Command::Merge | Command::Reset => {
            println!("Deck has {} cards.", session.len());
            print_card(&session, false);
        }
        Command::Export => println!("{}", deck.export(&session)?),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.verbosity);

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}
