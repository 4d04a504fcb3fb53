//! rolebot CLI: run the bot, maintain the profanity word list, print the user table.

use anyhow::Result;
use clap::Parser;
use rolebot_cli::commands::{add_words, format_user_table, list_users, list_words, load_words_file};
use rolebot_cli::{run_bot, BotConfig, Cli, Commands, WordsCommand};
use storage::Database;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            run_bot(config).await
        }
        Commands::Words { command } => {
            init_console_tracing();
            let db = open_database().await?;
            handle_words(&db, command).await
        }
        Commands::Users { chat_id } => {
            init_console_tracing();
            let db = open_database().await?;
            let users = list_users(&db, chat_id).await?;
            if users.is_empty() {
                println!("No users stored.");
            } else {
                print!("{}", format_user_table(&users));
            }
            Ok(())
        }
    }
}

async fn handle_words(db: &Database, command: WordsCommand) -> Result<()> {
    match command {
        WordsCommand::Load { file, clear } => {
            let report = load_words_file(db, &file, clear).await?;
            if clear {
                println!("Removed {} word(s).", report.cleared);
            }
            println!("Read: {}, Added: {}", report.read, report.added);
        }
        WordsCommand::Add { words } => {
            let added = add_words(db, &words).await?;
            println!("Added {} of {} word(s).", added, words.len());
        }
        WordsCommand::List => {
            let words = list_words(db).await?;
            for word in &words {
                println!("{}", word);
            }
            println!("Total: {}", words.len());
        }
    }
    Ok(())
}

/// Offline commands only need the database URL, not a token.
async fn open_database() -> Result<Database> {
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./rolebot.db".to_string());
    Ok(Database::connect(&url).await?)
}

fn init_console_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_target(false)
        .init();
}
