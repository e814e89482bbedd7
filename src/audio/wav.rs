use crate::{DocChatError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Encode f32 samples (range -1.0 to 1.0) as a 16-bit PCM WAV held in
/// memory, ready to post as a multipart part.
pub fn encode_wav(samples: &[f32], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)
        .map_err(|e| DocChatError::AudioProcessing(format!("WAV writer: {e}")))?;

    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| DocChatError::AudioProcessing(format!("WAV sample: {e}")))?;
    }

    writer
        .finalize()
        .map_err(|e| DocChatError::AudioProcessing(format!("WAV finalize: {e}")))?;

    Ok(cursor.into_inner())
}
