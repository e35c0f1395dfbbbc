// Provider capability interface
// Author: kelexine (https://github.com/kelexine)

use crate::error::Result;
use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

/// Incremental completion deltas from the provider's chat endpoint.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// A chat-style completion request: one system instruction plus one user
/// prompt.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// An image generation request.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub model: String,
    pub size: String,
    pub quality: String,
}

/// The narrow seam between the orchestrators and the hosted generation
/// service: submit a chat prompt and receive a token stream, or submit an
/// image prompt and receive a URL. Tests substitute a scripted fake here.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Open a streaming completion call and return its delta stream.
    async fn stream_chat(&self, request: ChatRequest) -> Result<TokenStream>;

    /// Generate a single image and return its URL.
    async fn create_image(&self, request: ImageRequest) -> Result<String>;
}
