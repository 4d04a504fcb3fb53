//! # Handlers for the role bot
//!
//! Message handlers run by the handler chain (logging, activity, profanity, nickname and admin
//! commands) and the membership event handler.

mod activity;
mod admin_command;
mod command;
mod logging;
mod membership;
mod nickname_command;
mod profanity;
mod support;

#[cfg(test)]
mod test;

pub use activity::ActivityHandler;
pub use admin_command::AdminCommandHandler;
pub use command::Command;
pub use logging::LoggingHandler;
pub use membership::MembershipHandler;
pub use nickname_command::NicknameCommandHandler;
pub use profanity::{ProfanityFilter, ProfanityHandler};
