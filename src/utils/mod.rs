//! Utility functions and helpers for the copystream server.
//!
//! This module provides cross-cutting concerns like structured logging and
//! prompt-input sanitization.
//!
//! # Submodules
//!
//! - `logging`: Tracing and logging initialization.
//! - `sanitize`: Prompt-injection stripping for free-text input fields.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod sanitize;

pub use sanitize::sanitize_prompt_input;
