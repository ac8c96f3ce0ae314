//! Discord platform adapter.
//!
//! Connects to the gateway via serenity, posts a "Thinking..." placeholder
//! for each inbound message, hands text and downloaded image attachments
//! to the chat runtime, and edits the placeholder with the reply.

pub mod bot;
pub mod error;
pub mod handler;

pub use {
    bot::run,
    error::{Error, Result},
    handler::DiscordHandler,
};
