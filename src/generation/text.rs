// Text generation orchestrator
// Author: kelexine (https://github.com/kelexine)

use super::events::ProgressEvent;
use super::prompt;
use super::provider::{ChatRequest, Provider};
use super::GenerationRequest;
use crate::cache::CacheStore;
use crate::error::classify_provider_error;
use crate::metrics;
use crate::usage::UsageTracker;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Status line of the final successful event; the gateway matches on it to
/// know when to inject the image-still-running notice.
pub const TEXT_COMPLETE: &str = "Text generation complete.";

// Heuristic denominator for progress estimation, not a hard cap.
const PROGRESS_TOKEN_ESTIMATE: u64 = 300;

/// Tuning knobs for one text generation job.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub use_cache: bool,
}

/// Drive one description generation job as a lazy, finite event sequence,
/// consumed exactly once by the session gateway.
///
/// On a cache hit the sequence is exactly two events and no provider call is
/// made. Otherwise the provider's chat stream is relayed as incremental
/// progress, the finished text is committed to the cache, and a single
/// terminal event closes the sequence. Failures surface as one terminal
/// error event carrying whatever partial output had accumulated; they never
/// escape this component as `Err`.
pub fn generate_description(
    provider: Arc<dyn Provider>,
    cache: Arc<dyn CacheStore>,
    usage: Arc<UsageTracker>,
    request: GenerationRequest,
    options: GenerationOptions,
) -> impl Stream<Item = ProgressEvent> + Send {
    async_stream::stream! {
        let cache_key = request.fingerprint(&options.model);

        if options.use_cache {
            if let Some(cached) = cache.get(&cache_key) {
                info!(product = %request.product_name, "using cached description");
                metrics::record_cache_hit();
                metrics::record_generation("text", "cached");
                yield ProgressEvent::status("Using cached result...", "", 50);
                yield ProgressEvent::status(TEXT_COMPLETE, &cached, 100);
                return;
            }
            metrics::record_cache_miss();
        }

        let chat = ChatRequest {
            model: options.model.clone(),
            system: prompt::SYSTEM_MESSAGE.to_string(),
            user: prompt::build_user_prompt(&request),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        usage.record_request();

        let mut output = String::new();
        let mut total_tokens: u64 = 0;

        yield ProgressEvent::starting("Generating product description...");

        let started = Instant::now();
        let stream = match provider.stream_chat(chat).await {
            Ok(stream) => stream,
            Err(e) => {
                metrics::record_provider_call("chat", false, started.elapsed().as_secs_f64());
                metrics::record_generation("text", "error");
                let classified = classify_provider_error(&e);
                error!(
                    kind = classified.kind.as_str(),
                    original = %classified.original,
                    "description generation failed"
                );
                yield ProgressEvent::terminal_error(classified.message, &output, classified.details());
                return;
            }
        };
        futures::pin_mut!(stream);

        while let Some(delta) = stream.next().await {
            match delta {
                Ok(delta) => {
                    if delta.is_empty() {
                        continue;
                    }
                    output.push_str(&delta);
                    total_tokens += 1;
                    let percent = ((total_tokens * 100) / PROGRESS_TOKEN_ESTIMATE).min(100) as u8;
                    yield ProgressEvent::status("Generating description...", &output, percent);
                }
                Err(e) => {
                    metrics::record_provider_call("chat", false, started.elapsed().as_secs_f64());
                    metrics::record_generation("text", "error");
                    let classified = classify_provider_error(&e);
                    error!(
                        kind = classified.kind.as_str(),
                        original = %classified.original,
                        "description stream failed"
                    );
                    yield ProgressEvent::terminal_error(classified.message, &output, classified.details());
                    return;
                }
            }
        }

        metrics::record_provider_call("chat", true, started.elapsed().as_secs_f64());
        metrics::record_streamed_tokens(&options.model, total_tokens);
        usage.add_tokens(total_tokens);

        if options.use_cache {
            cache.set(&cache_key, output.clone());
            metrics::record_cache_store();
            metrics::update_cache_entries(cache.len());
        }

        metrics::record_generation("text", "completed");
        yield ProgressEvent::status(TEXT_COMPLETE, &output, 100);
    }
}
