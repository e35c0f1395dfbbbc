//! OpenAI-compatible provider client.
//!
//! The one concrete implementation of the `Provider` capability trait:
//! streaming chat completions over SSE for description text, and the images
//! endpoint for product shots.
//!
//! # Components
//!
//! - `client`: HTTP client construction, request signing, error extraction.
//! - `streaming`: SSE chunk parsing for the chat completion stream.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod client;
mod streaming;

pub use client::OpenAiClient;
