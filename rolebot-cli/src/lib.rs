//! # rolebot-cli
//!
//! The `rolebot` binary: argument parsing, environment config, component wiring and the
//! offline word-list / user-table commands.

pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod runner;

pub use cli::{Cli, Commands, WordsCommand};
pub use components::{BotComponents, BotIdentity};
pub use config::{parse_admin_ids, BotConfig};
pub use runner::run_bot;
