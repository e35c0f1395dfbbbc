// WebSocket session gateway
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::generation::{
    generate_description, spawn_image_generation, GenerationOptions, GenerationRequest,
    ImageEvent, ImageOptions, JobSubmission, ProgressEvent, TEXT_COMPLETE,
};
use crate::metrics;
use crate::utils::sanitize_prompt_input;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const MISSING_KEY_MESSAGE: &str =
    "API key is not configured. Please check server configuration.";

/// Inbound session messages.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
enum ClientMessage {
    /// A full generation job: text, optionally with a concurrent image.
    StartGeneration(Box<JobSubmission>),
    /// Regenerate just the image for a product, bypassing text generation.
    RegenerateImage {
        #[serde(default)]
        product_name: String,
    },
}

/// Serialize an event into its `{event, data}` envelope and hand it to the
/// session's writer. A send onto a closed channel means the session is gone;
/// that is a no-op, never an error.
fn deliver(tx: &UnboundedSender<String>, event: &'static str, data: impl Serialize) {
    let payload = json!({ "event": event, "data": data }).to_string();
    if tx.send(payload).is_ok() {
        metrics::record_event_sent(event);
    }
}

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session(socket, state))
}

/// Manage a single session after upgrade.
///
/// The socket is split into a sink drained by one writer task and an inbound
/// stream processed on the current task, so events for this session go out in
/// emission order no matter which task produced them. Jobs are driven inline:
/// a session runs one text generation at a time, while its image jobs run as
/// detached background work relayed through the same writer.
async fn handle_session(socket: WebSocket, state: AppState) {
    let session_id = Uuid::new_v4();
    info!(%session_id, "session connected");
    metrics::record_session_opened();

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer_session = session_id;
    let writer = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sink.send(Message::Text(payload)).await.is_err() {
                debug!(session_id = %writer_session, "session sink closed");
                break;
            }
        }
    });

    deliver(
        &tx,
        "connection_status",
        json!({
            "status": "connected",
            "message": "Connected to server",
        }),
    );

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::StartGeneration(job)) => {
                    handle_generation(&state, session_id, &tx, *job).await;
                }
                Ok(ClientMessage::RegenerateImage { product_name }) => {
                    handle_regenerate_image(&state, session_id, &tx, product_name);
                }
                Err(e) => {
                    warn!(%session_id, error = %e, "unparseable session message");
                    deliver(
                        &tx,
                        "progress",
                        ProgressEvent::config_error("Invalid message format."),
                    );
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(%session_id, error = %e, "session receive error");
                break;
            }
        }
    }

    // Dropping the writer closes the outbound channel: in-flight image work
    // keeps running, and its sends become no-ops.
    writer.abort();
    metrics::record_session_closed();
    info!(%session_id, "session disconnected");
}

/// Validate a submitted job and fan out to the two orchestrators.
async fn handle_generation(
    state: &AppState,
    session_id: Uuid,
    tx: &UnboundedSender<String>,
    job: JobSubmission,
) {
    info!(%session_id, "received generation request");

    // A missing credential is a configuration error, detected before any
    // provider call rather than surfacing from inside one.
    if !state.config.provider.has_api_key() {
        error!(%session_id, "provider API key is not configured");
        deliver(tx, "progress", ProgressEvent::config_error(MISSING_KEY_MESSAGE));
        return;
    }

    if let Err(errors) = job.validate() {
        warn!(%session_id, ?errors, "validation failed");
        deliver(tx, "progress", ProgressEvent::validation_failure(errors));
        return;
    }

    let request = GenerationRequest::from_submission(&job);
    info!(%session_id, product = %request.product_name, "generating description");

    let image_requested = effective_image_request(&job, &state.config.features);
    if job.generate_image && !image_requested {
        warn!(%session_id, "image generation requested but disabled in config");
    }

    let image_done = Arc::new(AtomicBool::new(false));

    if image_requested {
        deliver(
            tx,
            "progress",
            ProgressEvent::image_started("Starting image generation in parallel..."),
        );
        start_image_job(
            state,
            tx,
            request.product_name.clone(),
            Arc::clone(&image_done),
        );
    }

    let options = GenerationOptions {
        model: state.config.provider.default_model.clone(),
        max_tokens: state.config.provider.max_tokens,
        temperature: state.config.provider.temperature,
        use_cache: state.config.features.enable_caching,
    };

    let events = generate_description(
        Arc::clone(&state.provider),
        Arc::clone(&state.cache),
        Arc::clone(&state.usage),
        request,
        options,
    );
    futures::pin_mut!(events);

    while let Some(event) = events.next().await {
        let completed = event.data == TEXT_COMPLETE;
        let partial = event.partial.clone();
        deliver(tx, "progress", &event);

        // Text finished first: let the client know the image is still coming.
        if completed && image_requested && !image_done.load(Ordering::Acquire) {
            deliver(
                tx,
                "progress",
                ProgressEvent::status(
                    "Text generation complete, image generation in progress.",
                    &partial,
                    100,
                ),
            );
        }
    }
}

/// An image request while image generation is disabled by configuration
/// downgrades silently to text-only; no image event is ever emitted.
fn effective_image_request(job: &JobSubmission, features: &crate::config::FeatureFlags) -> bool {
    job.generate_image && features.enable_image_generation
}

/// Standalone image regeneration, bypassing text generation entirely.
fn handle_regenerate_image(
    state: &AppState,
    session_id: Uuid,
    tx: &UnboundedSender<String>,
    product_name: String,
) {
    info!(%session_id, "received image regeneration request");

    if !state.config.provider.has_api_key() {
        error!(%session_id, "provider API key is not configured");
        deliver(tx, "image_progress", ImageEvent::error(MISSING_KEY_MESSAGE));
        return;
    }

    let product_name = sanitize_prompt_input(&product_name);
    if product_name.is_empty() {
        deliver(
            tx,
            "image_progress",
            ImageEvent::error("Product name is required"),
        );
        return;
    }

    info!(%session_id, product = %product_name, "regenerating image");
    start_image_job(state, tx, product_name, Arc::new(AtomicBool::new(false)));
}

/// Spawn the image orchestrator plus a relay task that forwards its events
/// to this session and records when a terminal event has gone out.
///
/// The orchestrator never learns whether a live destination still exists;
/// the relay side owns that decision, and forwarding to a gone session is
/// simply dropped.
fn start_image_job(
    state: &AppState,
    tx: &UnboundedSender<String>,
    product_name: String,
    image_done: Arc<AtomicBool>,
) {
    let options = ImageOptions {
        model: state.config.provider.default_image_model.clone(),
        size: state.config.provider.image_size.clone(),
        quality: state.config.provider.image_quality.clone(),
    };

    let (image_tx, mut image_rx) = mpsc::unbounded_channel::<ImageEvent>();
    spawn_image_generation(
        Arc::clone(&state.provider),
        Arc::clone(&state.cache),
        Arc::clone(&state.usage),
        product_name,
        options,
        image_tx,
    );

    let tx = tx.clone();
    tokio::spawn(async move {
        while let Some(event) = image_rx.recv().await {
            if event.is_terminal() {
                image_done.store(true, Ordering::Release);
            }
            deliver(&tx, "image_progress", &event);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_generation_message() {
        let raw = r#"{"type":"start_generation","data":{"product_name":"Widget","generate_image":true}}"#;
        let message: ClientMessage = serde_json::from_str(raw).unwrap();
        match message {
            ClientMessage::StartGeneration(job) => {
                assert_eq!(job.product_name, "Widget");
                assert!(job.generate_image);
                assert_eq!(job.language, "English");
            }
            _ => panic!("expected start_generation"),
        }
    }

    #[test]
    fn test_parse_regenerate_image_message() {
        let raw = r#"{"type":"regenerate_image","data":{"product_name":"Widget"}}"#;
        let message: ClientMessage = serde_json::from_str(raw).unwrap();
        match message {
            ClientMessage::RegenerateImage { product_name } => {
                assert_eq!(product_name, "Widget");
            }
            _ => panic!("expected regenerate_image"),
        }
    }

    #[test]
    fn test_unknown_message_type_is_rejected() {
        let raw = r#"{"type":"shutdown","data":{}}"#;
        assert!(serde_json::from_str::<ClientMessage>(raw).is_err());
    }

    #[test]
    fn test_image_request_downgrades_when_disabled() {
        let job = JobSubmission {
            product_name: "Widget".to_string(),
            generate_image: true,
            ..Default::default()
        };

        let mut features = crate::config::FeatureFlags::default();
        assert!(effective_image_request(&job, &features));

        features.enable_image_generation = false;
        assert!(!effective_image_request(&job, &features));
    }
}
