// Progress event types delivered to sessions
// Author: kelexine (https://github.com/kelexine)

use crate::error::ErrorDetails;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One unit of the text-generation status stream. Transient: exists only on
/// the wire, never persisted. Optional fields are omitted from the JSON
/// payload when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Human-readable status line.
    pub data: String,

    /// Accumulated output so far (possibly empty).
    pub partial: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,

    /// Field-level validation failures, keyed by field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<ErrorDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_generation_started: Option<bool>,
}

impl ProgressEvent {
    pub fn status(data: &str, partial: &str, percent: u8) -> Self {
        Self {
            data: data.to_string(),
            partial: partial.to_string(),
            percent: Some(percent),
            error: None,
            errors: None,
            error_details: None,
            image_generation_started: None,
        }
    }

    /// Initial status line, emitted before the provider call; carries no
    /// percentage yet.
    pub fn starting(data: &str) -> Self {
        Self {
            percent: None,
            ..Self::status(data, "", 0)
        }
    }

    pub fn image_started(data: &str) -> Self {
        Self {
            image_generation_started: Some(true),
            ..Self::status(data, "", 0)
        }
    }

    /// Single event enumerating every field-level violation of a rejected
    /// job.
    pub fn validation_failure(errors: BTreeMap<String, String>) -> Self {
        let joined = errors.values().cloned().collect::<Vec<_>>().join("; ");
        Self {
            errors: Some(errors),
            ..Self::status(&format!("Error: {}", joined), "", 0)
        }
    }

    pub fn config_error(message: &str) -> Self {
        Self {
            error: Some(true),
            ..Self::status(&format!("Error: {}", message), "", 0)
        }
    }

    /// Terminal failure event carrying whatever partial output had
    /// accumulated before the error.
    pub fn terminal_error(message: &str, partial: &str, details: ErrorDetails) -> Self {
        Self {
            error: Some(true),
            error_details: Some(details),
            ..Self::status(&format!("Error: {}", message), partial, 0)
        }
    }
}

/// One unit of the image-generation status stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    pub percent: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<ErrorDetails>,
}

impl ImageEvent {
    pub fn status(status: &str, percent: u8) -> Self {
        Self {
            status: Some(status.to_string()),
            percent,
            image_url: None,
            error: None,
            error_details: None,
        }
    }

    /// Final event carrying the image URL; no status message.
    pub fn completed(image_url: String) -> Self {
        Self {
            status: None,
            percent: 100,
            image_url: Some(image_url),
            error: None,
            error_details: None,
        }
    }

    pub fn failed(message: &str, details: ErrorDetails) -> Self {
        Self {
            status: Some(format!("Image generation failed: {}", message)),
            percent: 100,
            image_url: None,
            error: Some(true),
            error_details: Some(details),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: Some(format!("Error: {}", message)),
            percent: 0,
            image_url: None,
            error: Some(true),
            error_details: None,
        }
    }

    /// Whether this event ends the image job (success or failure).
    pub fn is_terminal(&self) -> bool {
        self.image_url.is_some() || self.error == Some(true)
    }
}
