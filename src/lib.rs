//! Streaming text-to-speech adapter for the Sub200 HTTP API.
//!
//! This crate turns Sub200's chunked-WAV streaming endpoint into the sink
//! shape a host voice-agent framework expects: one HTTP POST per synthesis
//! call, incremental WAV-header validation, then verbatim byte relay to an
//! [`AudioEmitter`] supplied by the host, with optional debug mirroring of
//! the stream to disk.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sub200_tts::{ConnOptions, Sub200Options, Sub200Tts};
//!
//! let tts = Sub200Tts::new(Sub200Options {
//!     voice: "aria".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let mut stream = tts.synthesize("Hello, world!", ConnOptions::default());
//! stream.run(&mut emitter).await?;
//! ```
//!
//! Credentials fall back to the `SUB200_API_KEY` environment variable, and
//! `SUB200_BASE_URL` overrides any explicitly configured endpoint.

pub mod config;
pub mod emitter;
pub mod error;
pub mod stream;
pub mod tts;
pub mod wav;

pub use config::{
    resolve_config, RequestConfig, Sub200Options, API_KEY_ENV, BASE_URL_ENV, DEFAULT_MODEL,
    DEFAULT_NUM_CHANNELS, DEFAULT_OUTPUT_FORMAT, DEFAULT_SAMPLE_RATE, DEFAULT_VOICE,
    SUB200_TTS_URL,
};
pub use emitter::{AudioEmitter, AudioStreamInfo, EmitterClosed};
pub use error::{TtsError, TtsResult};
pub use stream::{ChunkedStream, DEFAULT_TIMEOUT};
pub use tts::{ConnOptions, Sub200Tts};
pub use wav::{WavHeaderGate, RIFF_MAGIC, WAV_HEADER_LEN};
