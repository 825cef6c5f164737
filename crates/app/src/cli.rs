//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use flashdeck_core::model::{CardId, CardStatus};

#[derive(Parser)]
#[command(
    name = "flashdeck",
    version,
    about = "Review a shuffled flashcard deck from the terminal",
    long_about = "Review a shuffled flashcard deck from the terminal.\n\n\
                  The shuffle order, position and card statuses persist in a local\n\
                  SQLite database between runs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// SQLite database holding cards and progress.
    #[arg(
        long = "db",
        env = "FLASHDECK_DB_URL",
        default_value = "sqlite://flashdeck.sqlite3",
        global = true
    )]
    pub db_url: String,

    /// JSON seed dataset of `{id, front, back}` records (defaults to the bundled deck).
    #[arg(long = "seed", env = "FLASHDECK_SEED", value_name = "PATH", global = true)]
    pub seed: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q to silence).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Show the current card (the default).
    Show {
        /// Also print the back of the card.
        #[arg(long)]
        answer: bool,
    },
    /// Move to the next card that is not hidden.
    Next,
    /// Move to the previous card that is not hidden.
    Prev,
    /// Jump to a card by id.
    Open { id: CardId },
    /// Tag the current card: known, unknown, review-soon, dont-show or none.
    Status { status: CardStatus },
    /// Overwrite the current card's text.
    Edit {
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
    },
    /// List cards in deck order, optionally only those with a status.
    List {
        #[arg(long)]
        status: Option<CardStatus>,
    },
    /// Add seed cards that are not in the deck yet and reshuffle.
    Merge,
    /// Discard all progress and start over from the seed dataset.
    Reset,
    /// Print the deck as seed-shaped JSON.
    Export,
}
