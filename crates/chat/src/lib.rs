//! Backend dispatch and response pipeline.
//!
//! Normalizes inbound requests from platform adapters into a uniform
//! backend invocation, post-processes the output, and degrades to a fixed
//! safe reply on any failure. Platform adapters call
//! [`ChatRuntime::run_llm`] and never see a raw error.

pub mod dispatch;
pub mod runtime;
pub mod sanitize;

pub use {
    dispatch::{Dispatcher, DEFAULT_SYSTEM_PROMPT},
    runtime::{ChatRuntime, GENERATION_ERROR_REPLY},
    sanitize::{polish, EMPTY_FALLBACK},
};
