//! Incremental WAV-header detection.
//!
//! The Sub200 API streams a complete WAV file as chunked bytes. Downstream
//! consumers must not see any audio until the fixed 44-byte header has been
//! fully buffered and validated, so the read loop routes every chunk through
//! a small two-state machine: accumulate while awaiting the header, then
//! pass bytes through verbatim.

use crate::error::{TtsError, TtsResult};

/// Length of the fixed PCM WAV header in bytes.
pub const WAV_HEADER_LEN: usize = 44;

/// ASCII magic identifying a RIFF/WAV container.
pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";

#[derive(Debug)]
enum GateState {
    /// Accumulating bytes until a full 44-byte header is available.
    AwaitingHeader { buf: Vec<u8> },
    /// Header validated; bytes pass through untouched.
    Streaming,
}

/// Two-state gate that withholds audio until a valid WAV header is buffered.
///
/// Feed every received chunk through [`feed`](Self::feed). While the header
/// is incomplete the gate returns `Ok(None)` and keeps the bytes. The first
/// `Ok(Some(..))` carries the entire accumulated buffer (header plus any
/// audio that arrived with it); every later call echoes the chunk back. The
/// concatenation of all returned buffers equals the concatenation of all fed
/// bytes regardless of chunk boundaries.
#[derive(Debug)]
pub struct WavHeaderGate {
    state: GateState,
}

impl WavHeaderGate {
    pub fn new() -> Self {
        Self {
            state: GateState::AwaitingHeader { buf: Vec::new() },
        }
    }

    /// True once a valid header has been seen and bytes flow through.
    pub fn is_streaming(&self) -> bool {
        matches!(self.state, GateState::Streaming)
    }

    /// Route one received chunk through the gate.
    ///
    /// # Errors
    ///
    /// Returns [`TtsError::Payload`] when 44 bytes have been buffered and the
    /// first four are not the ASCII literal `RIFF`.
    pub fn feed(&mut self, chunk: &[u8]) -> TtsResult<Option<Vec<u8>>> {
        match &mut self.state {
            GateState::AwaitingHeader { buf } => {
                buf.extend_from_slice(chunk);
                if buf.len() < WAV_HEADER_LEN {
                    // Wait for the full WAV header before initializing downstream.
                    return Ok(None);
                }
                if &buf[0..4] != RIFF_MAGIC {
                    return Err(TtsError::Payload(
                        "sub200 returned non-wav payload or empty body".to_string(),
                    ));
                }
                let buffered = std::mem::take(buf);
                self.state = GateState::Streaming;
                Ok(Some(buffered))
            }
            GateState::Streaming => Ok(Some(chunk.to_vec())),
        }
    }
}

impl Default for WavHeaderGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 44-byte PCM WAV header for 24 kHz mono 16-bit audio.
    fn wav_header(data_len: u32) -> Vec<u8> {
        let mut header = Vec::with_capacity(WAV_HEADER_LEN);
        header.extend_from_slice(b"RIFF");
        header.extend_from_slice(&(36 + data_len).to_le_bytes());
        header.extend_from_slice(b"WAVE");
        header.extend_from_slice(b"fmt ");
        header.extend_from_slice(&16u32.to_le_bytes());
        header.extend_from_slice(&1u16.to_le_bytes()); // PCM
        header.extend_from_slice(&1u16.to_le_bytes()); // mono
        header.extend_from_slice(&24000u32.to_le_bytes());
        header.extend_from_slice(&48000u32.to_le_bytes());
        header.extend_from_slice(&2u16.to_le_bytes());
        header.extend_from_slice(&16u16.to_le_bytes());
        header.extend_from_slice(b"data");
        header.extend_from_slice(&data_len.to_le_bytes());
        header
    }

    #[test]
    fn test_buffers_until_44_bytes() {
        let mut gate = WavHeaderGate::new();

        assert_eq!(gate.feed(b"RIFF").unwrap(), None);
        assert_eq!(gate.feed(&[0u8; 20]).unwrap(), None);
        assert!(!gate.is_streaming());
    }

    #[test]
    fn test_exact_header_released_whole() {
        let header = wav_header(0);
        let mut gate = WavHeaderGate::new();

        let released = gate.feed(&header).unwrap().unwrap();
        assert_eq!(released, header);
        assert!(gate.is_streaming());
    }

    #[test]
    fn test_header_plus_audio_in_one_chunk() {
        let mut body = wav_header(100);
        body.extend_from_slice(&[0xABu8; 100]);
        let mut gate = WavHeaderGate::new();

        let released = gate.feed(&body).unwrap().unwrap();
        assert_eq!(released, body);
    }

    #[test]
    fn test_passthrough_after_header() {
        let mut gate = WavHeaderGate::new();
        gate.feed(&wav_header(100)).unwrap();

        let chunk = vec![0x42u8; 100];
        assert_eq!(gate.feed(&chunk).unwrap(), Some(chunk));
    }

    #[test]
    fn test_non_riff_prefix_fails() {
        let mut gate = WavHeaderGate::new();
        let result = gate.feed(&[0u8; WAV_HEADER_LEN]);

        assert!(matches!(result, Err(TtsError::Payload(_))));
    }

    #[test]
    fn test_non_riff_detected_across_split_chunks() {
        let mut gate = WavHeaderGate::new();
        assert_eq!(gate.feed(b"JUNK").unwrap(), None);

        let result = gate.feed(&[0u8; 40]);
        assert!(matches!(result, Err(TtsError::Payload(_))));
    }

    #[test]
    fn test_chunking_invariance_single_bytes() {
        let mut body = wav_header(10);
        body.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

        let mut gate = WavHeaderGate::new();
        let mut out = Vec::new();
        for byte in &body {
            if let Some(released) = gate.feed(std::slice::from_ref(byte)).unwrap() {
                out.extend_from_slice(&released);
            }
        }

        assert_eq!(out, body);
    }

    #[test]
    fn test_chunking_invariance_large_chunks() {
        let mut body = wav_header(8192);
        body.extend_from_slice(&vec![0x5Au8; 8192]);

        let mut gate = WavHeaderGate::new();
        let mut out = Vec::new();
        for chunk in body.chunks(4096) {
            if let Some(released) = gate.feed(chunk).unwrap() {
                out.extend_from_slice(&released);
            }
        }

        assert_eq!(out, body);
    }

    #[test]
    fn test_header_then_audio_chunks() {
        // Header alone, then 100 bytes of PCM: two releases totaling 144 bytes.
        let header = wav_header(100);
        let audio = vec![0x11u8; 100];

        let mut gate = WavHeaderGate::new();
        let first = gate.feed(&header).unwrap().unwrap();
        let second = gate.feed(&audio).unwrap().unwrap();

        assert_eq!(first.len() + second.len(), 144);
        assert_eq!(first, header);
        assert_eq!(second, audio);
    }
}
