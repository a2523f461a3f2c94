//! One-shot chunked synthesis stream.
//!
//! A [`ChunkedStream`] is created per `synthesize` call and drives exactly one
//! HTTP POST against the Sub200 streaming endpoint. The response body is a
//! complete WAV file delivered as chunked bytes; the stream withholds audio
//! until the 44-byte header has been validated (see [`crate::wav`]), then
//! relays every byte to the host-supplied [`AudioEmitter`], optionally
//! mirroring the stream into debug files.
//!
//! There is no retry, no pooling, and no shared mutable state between
//! streams; a failed attempt is terminal for that call.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use serde_json::json;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::RequestConfig;
use crate::emitter::{AudioEmitter, AudioStreamInfo};
use crate::error::{TtsError, TtsResult};
use crate::tts::ConnOptions;
use crate::wav::WavHeaderGate;

/// Connect and read deadline applied when the caller sets none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Generate a short random correlation token.
///
/// Used for request tracing when the server sends no `x-request-id`, and for
/// naming per-call debug artifacts.
pub(crate) fn correlation_token() -> String {
    let mut token = uuid::Uuid::new_v4().simple().to_string();
    token.truncate(12);
    token
}

/// Debug artifacts opened lazily once the WAV header has been validated.
struct DebugMirror {
    wav_file: Option<fs::File>,
    wav_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
}

impl DebugMirror {
    /// Create the configured debug directories and open the per-call WAV
    /// mirror file. Failures are logged and leave the mirror disabled; debug
    /// artifacts never fail the synthesis call.
    async fn open(cfg: &RequestConfig, file_token: &str) -> Self {
        let mut mirror = Self {
            wav_file: None,
            wav_path: None,
            log_path: None,
        };

        if let Some(dir) = &cfg.debug_audio_dir {
            let path = dir.join(format!("resp_{file_token}.wav"));
            match fs::create_dir_all(dir).await {
                Ok(()) => match fs::File::create(&path).await {
                    Ok(file) => {
                        mirror.wav_file = Some(file);
                        mirror.wav_path = Some(path);
                    }
                    Err(e) => warn!("failed to open debug audio file {}: {e}", path.display()),
                },
                Err(e) => warn!("failed to create debug audio dir {}: {e}", dir.display()),
            }
        }

        if let Some(dir) = &cfg.debug_log_dir {
            match fs::create_dir_all(dir).await {
                Ok(()) => mirror.log_path = Some(dir.join(format!("resp_{file_token}.txt"))),
                Err(e) => warn!("failed to create debug log dir {}: {e}", dir.display()),
            }
        }

        mirror
    }

    async fn write_audio(&mut self, bytes: &[u8]) {
        if let Some(file) = self.wav_file.as_mut() {
            if let Err(e) = file.write_all(bytes).await {
                warn!("failed to write debug audio file: {e}");
                self.wav_file = None;
            }
        }
    }

    async fn finish_audio(&mut self) {
        if let Some(file) = self.wav_file.as_mut() {
            if let Err(e) = file.flush().await {
                warn!("failed to flush debug audio file: {e}");
            }
        }
        self.wav_file = None;
    }

    /// Write the plain-text request record on the success path.
    async fn write_log(&self, cfg: &RequestConfig, record: &StreamRecord<'_>) {
        let Some(path) = &self.log_path else {
            return;
        };
        let audio_path = self
            .wav_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string());
        let content = format!(
            "request_id={}\ntext={}\nmodel={}\nvoice={}\nurl={}\nsample_rate={}\nnum_channels={}\naudio_path={audio_path}\ntotal_bytes={}",
            record.request_id,
            record.input_text,
            cfg.model,
            cfg.voice,
            cfg.url,
            cfg.sample_rate,
            cfg.num_channels,
            record.total_bytes,
        );
        if let Err(e) = fs::write(path, content).await {
            warn!("failed to write debug log file {}: {e}", path.display());
        }
    }
}

struct StreamRecord<'a> {
    request_id: &'a str,
    input_text: &'a str,
    total_bytes: usize,
}

/// Single-use synthesis stream bound to one input text.
///
/// Created by [`crate::Sub200Tts::synthesize`]; creating one has no side
/// effects. Network I/O happens only when [`run`](Self::run) is driven.
pub struct ChunkedStream {
    input_text: String,
    conn_options: ConnOptions,
    file_token: String,
    cfg: Arc<RequestConfig>,
    cancel: CancellationToken,
}

impl ChunkedStream {
    pub(crate) fn new(input_text: String, conn_options: ConnOptions, cfg: Arc<RequestConfig>) -> Self {
        Self {
            input_text,
            conn_options,
            file_token: correlation_token(),
            cfg,
            cancel: CancellationToken::new(),
        }
    }

    /// Text this stream will synthesize.
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// Token that cancels this stream mid-read. A cancelled stream stops
    /// relaying audio but still finalizes the emitter before returning.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drive the synthesis call to completion, relaying audio to `emitter`.
    ///
    /// Regardless of outcome (success, any failure, or cancellation) the
    /// emitter's `end_input` is invoked exactly once before this returns; an
    /// already-finalized refusal is swallowed.
    pub async fn run(&mut self, emitter: &mut dyn AudioEmitter) -> TtsResult<()> {
        let result = self.run_inner(emitter).await;
        // Best-effort finalization on every exit path.
        if emitter.end_input().is_err() {
            debug!("emitter already finalized");
        }
        result
    }

    async fn run_inner(&mut self, emitter: &mut dyn AudioEmitter) -> TtsResult<()> {
        let cfg = Arc::clone(&self.cfg);
        let timeout = self.conn_options.timeout.unwrap_or(DEFAULT_TIMEOUT);

        // No total deadline: long syntheses may stream for longer than any
        // single connect or read is allowed to stall.
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| TtsError::Network(format!("failed to build HTTP client: {e}")))?;

        let payload = json!({
            "text": self.input_text,
            "model": cfg.model,
            "voice": cfg.voice,
            "output_format": cfg.output_format,
            "stream": true,
        });

        info!(
            model = %cfg.model,
            voice = %cfg.voice,
            url = %cfg.url,
            "sending sub200 TTS request"
        );

        let response = client
            .post(&cfg.url)
            .header("Authorization", format!("Bearer {}", cfg.api_key))
            .header("Accept", "audio/wav")
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
            return Err(TtsError::Timeout("sub200 TTS request timed out".to_string()));
        }
        if status.as_u16() >= 400 {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TtsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(correlation_token);

        let mut gate = WavHeaderGate::new();
        let mut mirror: Option<DebugMirror> = None;
        let mut total_bytes = 0usize;
        let mut cancelled = false;

        let mut body = response.bytes_stream();
        loop {
            let item = tokio::select! {
                // Cancellation wins over a ready chunk.
                biased;
                _ = self.cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                item = body.next() => item,
            };
            let Some(item) = item else {
                break;
            };
            let chunk = item?;
            if chunk.is_empty() {
                continue;
            }
            total_bytes += chunk.len();

            let was_streaming = gate.is_streaming();
            let Some(bytes) = gate.feed(&chunk)? else {
                continue;
            };

            if !was_streaming {
                // Full header buffered and validated: bring up the sink and
                // the debug artifacts before any audio is forwarded.
                emitter
                    .initialize(AudioStreamInfo {
                        request_id: request_id.clone(),
                        sample_rate: cfg.sample_rate,
                        num_channels: cfg.num_channels,
                        mime_type: "audio/wav",
                    })
                    .await;
                mirror = Some(DebugMirror::open(&cfg, &self.file_token).await);
            }

            emitter.push(&bytes).await;
            if let Some(mirror) = mirror.as_mut() {
                mirror.write_audio(&bytes).await;
            }
        }

        if cancelled {
            debug!(request_id = %request_id, "sub200 stream cancelled");
            return Ok(());
        }

        if !gate.is_streaming() {
            // No chunk, fewer than 44 bytes total, or an empty body.
            return Err(TtsError::Payload("sub200 returned no audio data".to_string()));
        }

        emitter.flush().await;

        if let Some(mirror) = mirror.as_mut() {
            mirror.finish_audio().await;
            mirror
                .write_log(
                    &cfg,
                    &StreamRecord {
                        request_id: &request_id,
                        input_text: &self.input_text,
                        total_bytes,
                    },
                )
                .await;
        }

        info!(request_id = %request_id, total_bytes, "sub200 stream completed");
        Ok(())
    }
}
