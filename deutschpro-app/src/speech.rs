use anyhow::Result;
use deutschpro_core::audio::{decode_speech, AudioClip, PlaybackGate};
use deutschpro_core::GenerativeBackend;
use hound::{SampleFormat, WavSpec, WavWriter};
use log::{debug, warn};
use std::path::Path;

pub fn write_wav(clip: &AudioClip, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: clip.channels,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for s in clip.to_i16() {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Renders pronunciations, one at a time.
#[derive(Clone, Default)]
pub struct Speaker {
    gate: PlaybackGate,
}

impl Speaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthesizes `text` into `out`. Returns `None` when another rendering
    /// is in flight or the service sent no audio.
    pub async fn speak_to_file(
        &self,
        backend: &dyn GenerativeBackend,
        text: &str,
        out: &Path,
    ) -> Result<Option<AudioClip>> {
        let Some(_guard) = self.gate.try_start() else {
            debug!("pronunciation already in progress, dropping request");
            return Ok(None);
        };
        let Some(payload) = backend.synthesize_speech(text).await? else {
            warn!("speech service returned no audio for {text:?}");
            return Ok(None);
        };
        let clip = decode_speech(&payload)?;
        write_wav(&clip, out)?;
        Ok(Some(clip))
    }
}
