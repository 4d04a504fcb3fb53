//! CLI parser.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rolebot")]
#[command(about = "Telegram role bot: run, manage the word list, inspect users", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot until Ctrl-C (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Maintain the profanity word list.
    Words {
        #[command(subcommand)]
        command: WordsCommand,
    },
    /// Print stored users with their title, block flag and warnings.
    Users {
        #[arg(long, allow_hyphen_values = true)]
        chat_id: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum WordsCommand {
    /// Load one word per line from a file.
    Load {
        file: PathBuf,
        /// Remove every existing word first.
        #[arg(long)]
        clear: bool,
    },
    /// Add words given on the command line.
    Add {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Print every word.
    List,
}
