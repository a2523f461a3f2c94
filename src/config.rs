//! Configuration for the Sub200 Text-to-Speech adapter.
//!
//! The adapter is configured once at construction time. Constructor arguments
//! (`Sub200Options`) are resolved against the process environment into an
//! immutable [`RequestConfig`] that every stream created from the same
//! adapter shares read-only.
//!
//! # Resolution rules
//!
//! - `api_key`: explicit argument → `SUB200_API_KEY` env var → empty string
//!   (with a warning logged; requests will likely fail without it).
//! - `base_url`: `SUB200_BASE_URL` env override (highest precedence) →
//!   explicit argument → built-in default. An empty resolved URL is a
//!   configuration error.
//!
//! Environment access is injected as a lookup closure so tests can resolve
//! against a fake environment without process-wide mutation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{TtsError, TtsResult};

// =============================================================================
// Constants
// =============================================================================

/// Sub200 public streaming TTS endpoint.
pub const SUB200_TTS_URL: &str = "https://api.sub200.dev/v1/tts/stream";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "orpheus";

/// Default voice name.
pub const DEFAULT_VOICE: &str = "aria";

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

/// Default channel count (mono).
pub const DEFAULT_NUM_CHANNELS: u32 = 1;

/// Default audio container requested from the API.
/// Only "wav" is validated by the stream reader currently.
pub const DEFAULT_OUTPUT_FORMAT: &str = "wav";

/// Environment variable consulted when no API key is passed explicitly.
pub const API_KEY_ENV: &str = "SUB200_API_KEY";

/// Environment variable that overrides any explicit base URL.
pub const BASE_URL_ENV: &str = "SUB200_BASE_URL";

// =============================================================================
// Options
// =============================================================================

/// Constructor-time options for [`crate::Sub200Tts`].
///
/// Every field has a default; `..Default::default()` is the expected way to
/// override only what you need:
///
/// ```rust,ignore
/// use sub200_tts::Sub200Options;
///
/// let options = Sub200Options {
///     voice: "luna".to_string(),
///     api_key: Some("sk-...".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Sub200Options {
    /// Model identifier to synthesize with.
    pub model: String,
    /// Voice name to synthesize with.
    pub voice: String,
    /// API key. Falls back to `SUB200_API_KEY` when not set.
    pub api_key: Option<String>,
    /// Streaming endpoint. Overridden by `SUB200_BASE_URL` when that is set.
    pub base_url: String,
    /// Target audio sample rate in Hz.
    pub sample_rate: u32,
    /// Number of audio channels.
    pub num_channels: u32,
    /// Audio container requested from the API.
    pub output_format: String,
    /// Optional directory to mirror streamed WAV responses into.
    pub debug_audio_dir: Option<PathBuf>,
    /// Optional directory to write per-request metadata records into.
    pub debug_log_dir: Option<PathBuf>,
}

impl Default for Sub200Options {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            api_key: None,
            base_url: SUB200_TTS_URL.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            num_channels: DEFAULT_NUM_CHANNELS,
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            debug_audio_dir: None,
            debug_log_dir: None,
        }
    }
}

// =============================================================================
// Resolved configuration
// =============================================================================

/// Immutable per-adapter request parameters.
///
/// Built once by [`resolve_config`]; shared read-only (behind an `Arc`) by
/// every stream the adapter creates. Streams never mutate it, so concurrent
/// synthesis calls need no coordination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    pub url: String,
    pub model: String,
    pub voice: String,
    pub sample_rate: u32,
    pub num_channels: u32,
    pub api_key: String,
    pub output_format: String,
    pub debug_audio_dir: Option<PathBuf>,
    pub debug_log_dir: Option<PathBuf>,
}

/// Resolve constructor options against an environment lookup.
///
/// Pure with respect to process state: the caller supplies `env`, typically
/// `|key| std::env::var(key).ok()`. Tests pass a closure over a fixture map.
///
/// # Errors
///
/// Returns [`TtsError::InvalidConfiguration`] when neither the environment,
/// the explicit argument, nor the built-in default yields a non-empty URL.
pub fn resolve_config<F>(options: Sub200Options, env: F) -> TtsResult<RequestConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = options
        .api_key
        .filter(|k| !k.is_empty())
        .or_else(|| env(API_KEY_ENV))
        .unwrap_or_default();
    if api_key.is_empty() {
        warn!("{API_KEY_ENV} not set; requests will likely fail without it");
    }

    // Env override wins over the explicit argument, which wins over the default.
    let url = env(BASE_URL_ENV)
        .filter(|u| !u.is_empty())
        .unwrap_or(options.base_url);
    if url.is_empty() {
        return Err(TtsError::InvalidConfiguration(format!(
            "{BASE_URL_ENV} or base_url must be provided for Sub200 TTS"
        )));
    }

    Ok(RequestConfig {
        url,
        model: options.model,
        voice: options.voice,
        sample_rate: options.sample_rate,
        num_channels: options.num_channels,
        api_key,
        output_format: options.output_format,
        debug_audio_dir: options.debug_audio_dir,
        debug_log_dir: options.debug_log_dir,
    })
}

// =============================================================================
// Tests
// =============================================================================
