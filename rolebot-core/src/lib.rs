//! # rolebot-core
//!
//! Core types and traits for the role bot: [`ChatGateway`], [`Handler`], [`MemberEventHandler`],
//! message, user and membership types, error enums, and tracing initialisation.
//! Transport-agnostic; used by every other crate in the workspace.

pub mod error;
pub mod gateway;
pub mod logger;
pub mod types;

pub use error::{GatewayError, HandlerError, Result, RolebotError};
pub use gateway::{parse_message_id, AdminPermissions, BotRights, ChatGateway};
pub use logger::init_tracing;
pub use types::{
    Chat, Handler, HandlerResponse, MemberEventHandler, MemberStatus, MemberUpdate, Message,
    ToCoreMessage, ToCoreUser, User,
};
