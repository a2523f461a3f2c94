//! Sink contract between the stream reader and the host framework.
//!
//! The host voice-agent framework owns the audio pipeline; this crate only
//! drives it. [`AudioEmitter`] is the narrow surface the stream reader needs:
//! one initialization with stream metadata, any number of byte pushes, a
//! flush, and a terminal end-of-input signal.
//!
//! Call order guaranteed by [`crate::ChunkedStream::run`]:
//! `initialize` exactly once (only after a full WAV header was buffered),
//! then zero or more `push` calls, `flush` on success, and `end_input`
//! exactly once on every outcome including failure and cancellation.

use async_trait::async_trait;
use thiserror::Error;

/// Stream metadata delivered with the first audio bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStreamInfo {
    /// Correlation id: the server's `x-request-id` header, or a freshly
    /// generated token when the server sent none.
    pub request_id: String,
    /// Sample rate the adapter was configured with, in Hz.
    pub sample_rate: u32,
    /// Channel count the adapter was configured with.
    pub num_channels: u32,
    /// Container MIME type; always `audio/wav` for this adapter.
    pub mime_type: &'static str,
}

/// Refusal returned by [`AudioEmitter::end_input`] when the emitter was
/// already finalized. The stream reader swallows this silently; finalization
/// is best-effort cleanup, not a reportable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("emitter input already finalized")]
pub struct EmitterClosed;

/// Downstream audio consumer supplied by the host framework.
#[async_trait]
pub trait AudioEmitter: Send {
    /// Called once, before any audio bytes, with the stream metadata.
    async fn initialize(&mut self, info: AudioStreamInfo);

    /// Deliver a run of audio bytes. The concatenation of all pushed bytes
    /// equals the response body, byte for byte.
    async fn push(&mut self, bytes: &[u8]);

    /// Called after the last `push` on the success path.
    async fn flush(&mut self);

    /// Signal that no more input will arrive. Idempotence refusals are
    /// reported via [`EmitterClosed`] and ignored by the caller.
    fn end_input(&mut self) -> Result<(), EmitterClosed>;
}
