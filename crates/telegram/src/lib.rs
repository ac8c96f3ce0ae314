//! Telegram platform adapter.
//!
//! Receives inbound messages via the Bot API, hands text and downloaded
//! images to the chat runtime, and relays replies back with
//! MarkdownV2 formatting (plain-text fallback when Telegram rejects the
//! markup).

pub mod bot;
pub mod error;
pub mod handlers;
pub mod markdown;
pub mod outbound;
pub mod state;

pub use {bot::run, error::{Error, Result}, state::AdapterContext};
