//! Generation orchestration for the copystream server.
//!
//! This module contains the two orchestrators that mediate between inbound
//! real-time sessions and the outbound provider calls:
//!
//! - `text`: streams a product description, memoizing completed results.
//! - `image`: fire-and-forget background image generation with callback
//!   delivery through a channel.
//!
//! Supporting pieces: the narrow `Provider` capability trait (`provider`),
//! prompt assembly (`prompt`), the normalized request form and its
//! validation (`request`), and the wire-level event types (`events`).
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod events;
pub mod image;
pub mod prompt;
pub mod provider;
pub mod request;
pub mod text;

pub use events::{ImageEvent, ProgressEvent};
pub use image::{spawn_image_generation, ImageOptions};
pub use provider::{ChatRequest, ImageRequest, Provider, TokenStream};
pub use request::{GenerationRequest, JobSubmission};
pub use text::{generate_description, GenerationOptions, TEXT_COMPLETE};
