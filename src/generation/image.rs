// Image generation orchestrator
// Author: kelexine (https://github.com/kelexine)

use super::events::ImageEvent;
use super::prompt::build_image_prompt;
use super::provider::{ImageRequest, Provider};
use crate::cache::{make_key, CacheStore};
use crate::error::classify_provider_error;
use crate::metrics;
use crate::usage::UsageTracker;
use crate::utils::sanitize_prompt_input;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Provider configuration for one image job.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    pub model: String,
    pub size: String,
    pub quality: String,
}

/// Run one image generation job as detached background work.
///
/// The caller gets the join handle back immediately; all further
/// communication happens through `events`. Sends onto a closed channel are
/// deliberate no-ops: the receiver disappearing just means no live session
/// is left to deliver to. The cache namespace is shared between the
/// combined text+image path and standalone regeneration, so either can
/// serve the other's hit.
pub fn spawn_image_generation(
    provider: Arc<dyn Provider>,
    cache: Arc<dyn CacheStore>,
    usage: Arc<UsageTracker>,
    product_name: String,
    options: ImageOptions,
    events: UnboundedSender<ImageEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let product_name = sanitize_prompt_input(&product_name);

        let cache_key = make_key(
            "product_image",
            &[
                ("product_name", product_name.as_str()),
                ("model", options.model.as_str()),
                ("size", options.size.as_str()),
                ("quality", options.quality.as_str()),
            ],
        );

        if let Some(cached) = cache.get(&cache_key) {
            info!(product = %product_name, "using cached image");
            metrics::record_cache_hit();
            metrics::record_generation("image", "cached");
            let _ = events.send(ImageEvent::status("Using cached image...", 50));
            let _ = events.send(ImageEvent::completed(cached));
            return;
        }
        metrics::record_cache_miss();

        let _ = events.send(ImageEvent::status("Creating image prompt...", 10));
        let prompt = build_image_prompt(&product_name);

        let _ = events.send(ImageEvent::status(
            &format!("Sending request to {}...", options.model),
            25,
        ));
        let _ = events.send(ImageEvent::status(
            "Your image is being generated, it can take up to 30 seconds...",
            50,
        ));

        usage.record_image();
        usage.record_request();

        let request = ImageRequest {
            prompt,
            model: options.model.clone(),
            size: options.size.clone(),
            quality: options.quality.clone(),
        };

        let started = Instant::now();
        match provider.create_image(request).await {
            Ok(image_url) => {
                metrics::record_provider_call("image", true, started.elapsed().as_secs_f64());
                cache.set(&cache_key, image_url.clone());
                metrics::record_cache_store();
                metrics::update_cache_entries(cache.len());
                metrics::record_generation("image", "completed");
                let _ = events.send(ImageEvent::completed(image_url));
            }
            Err(e) => {
                metrics::record_provider_call("image", false, started.elapsed().as_secs_f64());
                metrics::record_generation("image", "error");
                let classified = classify_provider_error(&e);
                error!(
                    kind = classified.kind.as_str(),
                    original = %classified.original,
                    "image generation failed"
                );
                let _ = events.send(ImageEvent::failed(classified.message, classified.details()));
            }
        }
    })
}
