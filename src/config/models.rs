//! Configuration data structures for the copystream server.
//!
//! This module defines the schema for the application settings, including
//! server parameters, provider credentials, feature toggles, and cache
//! behavior.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream text/image provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Per-day usage ceilings.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Feature toggles.
    #[serde(default)]
    pub features: FeatureFlags,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `0.0.0.0`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `3000`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the upstream OpenAI-compatible provider connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API credential. Falls back to the `OPENAI_API_KEY` environment
    /// variable when left empty.
    #[serde(default)]
    pub api_key: String,

    /// Base URL for the provider API.
    /// Default: `https://api.openai.com/v1`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// The chat model used for description generation.
    /// Default: `gpt-4o`
    #[serde(default = "default_model")]
    pub default_model: String,

    /// The model used for image generation.
    /// Default: `dall-e-3`
    #[serde(default = "default_image_model")]
    pub default_image_model: String,

    /// Generated image dimensions.
    /// Default: `1024x1024`
    #[serde(default = "default_image_size")]
    pub image_size: String,

    /// Generated image quality tier.
    /// Default: `standard`
    #[serde(default = "default_image_quality")]
    pub image_quality: String,

    /// Maximum tokens per description.
    /// Default: `600`
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for generation.
    /// Default: `0.7`
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Connection and request timeout in seconds.
    /// Default: `300` (5 minutes)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl ProviderConfig {
    /// Whether a usable credential is present.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Settings for the in-memory response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default entry lifetime in seconds.
    /// Default: `3600` (1 hour)
    #[serde(default = "default_cache_ttl")]
    pub default_ttl_seconds: u64,
}

/// Daily usage ceilings. Declared for operators but not enforced by any
/// code path; the status endpoint exposes the counters they would bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Default: `100`
    #[serde(default = "default_max_requests")]
    pub max_requests_per_day: u64,

    /// Default: `100000`
    #[serde(default = "default_max_tokens_per_day")]
    pub max_tokens_per_day: u64,

    /// Default: `50`
    #[serde(default = "default_max_images")]
    pub max_images_per_day: u64,
}

/// Feature toggles for optional subsystems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Whether generated results are memoized.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enable_caching: bool,

    /// Whether image generation requests are honored.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enable_image_generation: bool,

    /// Whether usage counters are reported. Declared only; counting itself
    /// is unconditional.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enable_usage_tracking: bool,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            default_model: default_model(),
            default_image_model: default_image_model(),
            image_size: default_image_size(),
            image_quality: default_image_quality(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: default_cache_ttl(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_requests_per_day: default_max_requests(),
            max_tokens_per_day: default_max_tokens_per_day(),
            max_images_per_day: default_max_images(),
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_caching: true,
            enable_image_generation: true,
            enable_usage_tracking: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_image_quality() -> String {
    "standard".to_string()
}

fn default_max_tokens() -> u32 {
    600
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    300
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_max_requests() -> u64 {
    100
}

fn default_max_tokens_per_day() -> u64 {
    100_000
}

fn default_max_images() -> u64 {
    50
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
