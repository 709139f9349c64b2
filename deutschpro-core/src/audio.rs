use crate::CoreError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const SAMPLE_RATE: u32 = 24_000;
pub const CHANNELS: u16 = 1;

/// Decoded speech, mono, samples in [-1.0, 1.0).
#[derive(Clone, Debug, PartialEq)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl AudioClip {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels.max(1) as f32)
    }

    /// Back to 16-bit integers for writers that want PCM.
    pub fn to_i16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|s| (s * 32768.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16)
            .collect()
    }
}

pub fn decode_base64(data: &str) -> Result<Vec<u8>, CoreError> {
    STANDARD
        .decode(data.trim())
        .map_err(|_| CoreError::Invalid("audio payload is not base64"))
}

/// Little-endian signed 16-bit PCM to floats. A trailing odd byte is ignored.
pub fn pcm16_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
        .collect()
}

pub fn decode_speech(base64_pcm: &str) -> Result<AudioClip, CoreError> {
    let bytes = decode_base64(base64_pcm)?;
    Ok(AudioClip {
        sample_rate: SAMPLE_RATE,
        channels: CHANNELS,
        samples: pcm16_to_f32(&bytes),
    })
}

/// Admits one playback at a time. A second attempt while a guard is alive
/// gets `None` and should be dropped silently.
#[derive(Clone, Default)]
pub struct PlaybackGate {
    busy: Arc<AtomicBool>,
}

pub struct PlaybackGuard {
    busy: Arc<AtomicBool>,
}

impl PlaybackGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_start(&self) -> Option<PlaybackGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PlaybackGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_playing(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for PlaybackGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
