//! # rolebot-telegram
//!
//! Telegram layer: teloxide adapters, [`TelegramGateway`] implementing [`rolebot_core::ChatGateway`],
//! connection config and the update dispatcher. No persistence or role logic.

mod adapters;
mod config;
mod gateway;
mod runner;

pub use adapters::{member_status, to_member_update, TelegramMessageWrapper, TelegramUserWrapper};
pub use config::TelegramConfig;
pub use gateway::{map_request_error, TelegramGateway};
pub use runner::run_dispatcher;
