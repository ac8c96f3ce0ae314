//! Configuration loading, validation, and env substitution.
//!
//! Config file: `courier.toml`, searched in `./` then `~/.config/courier/`.
//! Supports `${ENV_VAR}` substitution in the raw file before parsing.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::{BackendKind, CourierConfig, DiscordConfig, GeminiConfig, OllamaConfig, TelegramConfig},
};
