//! Adapter surface: construction, accessors, and the synthesize entry point.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{resolve_config, RequestConfig, Sub200Options};
use crate::error::TtsResult;
use crate::stream::ChunkedStream;

/// Per-call connection options.
///
/// `timeout` bounds both the connect and the per-read phases of the HTTP
/// call; the total stream duration is unbounded. `None` falls back to
/// [`crate::stream::DEFAULT_TIMEOUT`] (120 s).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnOptions {
    pub timeout: Option<Duration>,
}

/// Streaming text-to-speech client for Sub200.
///
/// Construction resolves credentials and the endpoint once (see
/// [`crate::config::resolve_config`]); the resolved configuration is
/// immutable afterwards and shared by every stream. Synthesis calls are
/// independent and may run concurrently.
///
/// ```rust,ignore
/// use sub200_tts::{ConnOptions, Sub200Options, Sub200Tts};
///
/// let tts = Sub200Tts::new(Sub200Options::default())?;
/// let mut stream = tts.synthesize("Hello, world!", ConnOptions::default());
/// stream.run(&mut emitter).await?;
/// ```
pub struct Sub200Tts {
    cfg: Arc<RequestConfig>,
}

impl Sub200Tts {
    /// Create an adapter from constructor options, resolving the API key and
    /// base URL against the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TtsError::InvalidConfiguration`] when no usable
    /// endpoint URL can be resolved.
    pub fn new(options: Sub200Options) -> TtsResult<Self> {
        let cfg = resolve_config(options, |key| std::env::var(key).ok())?;
        Ok(Self { cfg: Arc::new(cfg) })
    }

    /// Model identifier requests are made with.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Voice name requests are made with.
    pub fn voice(&self) -> &str {
        &self.cfg.voice
    }

    /// Provider name for host-framework registration.
    pub fn provider(&self) -> &'static str {
        "sub200"
    }

    /// Configured output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.cfg.sample_rate
    }

    /// Configured channel count.
    pub fn num_channels(&self) -> u32 {
        self.cfg.num_channels
    }

    /// Create a stream that will synthesize `text`.
    ///
    /// This has no side effects; no network I/O happens until the returned
    /// stream's `run` is driven.
    pub fn synthesize(&self, text: impl Into<String>, conn_options: ConnOptions) -> ChunkedStream {
        ChunkedStream::new(text.into(), conn_options, Arc::clone(&self.cfg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SUB200_TTS_URL;

    fn test_options() -> Sub200Options {
        Sub200Options {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_adapter_accessors() {
        let tts = Sub200Tts::new(test_options()).unwrap();

        assert_eq!(tts.model(), "orpheus");
        assert_eq!(tts.voice(), "aria");
        assert_eq!(tts.provider(), "sub200");
        assert_eq!(tts.sample_rate(), 24000);
        assert_eq!(tts.num_channels(), 1);
    }

    #[test]
    fn test_adapter_custom_model_and_voice() {
        let options = Sub200Options {
            model: "orpheus-2".to_string(),
            voice: "luna".to_string(),
            ..test_options()
        };
        let tts = Sub200Tts::new(options).unwrap();

        assert_eq!(tts.model(), "orpheus-2");
        assert_eq!(tts.voice(), "luna");
    }

    #[test]
    fn test_synthesize_has_no_side_effects() {
        let tts = Sub200Tts::new(test_options()).unwrap();

        // Creating a stream must not touch the network; it only binds text
        // and config. Dropping it unused is fine.
        let stream = tts.synthesize("hello world", ConnOptions::default());
        assert_eq!(stream.input_text(), "hello world");
    }

    #[test]
    fn test_conn_options_default_timeout_unset() {
        assert!(ConnOptions::default().timeout.is_none());
    }

    #[test]
    fn test_default_base_url_constant() {
        assert_eq!(SUB200_TTS_URL, "https://api.sub200.dev/v1/tts/stream");
    }
}
