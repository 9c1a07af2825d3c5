//! Audio clip decoding
//!
//! Converts an encoded WAV clip into the 16 kHz mono f32 waveform the
//! speech-to-text model expects.

use std::io::Cursor;

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::SpeechError;

/// Sample rate expected by the speech-to-text model.
pub const MODEL_SAMPLE_RATE: u32 = 16_000;

/// Decode a WAV byte buffer into 16 kHz mono f32 samples.
pub fn decode_clip(bytes: &[u8]) -> Result<Vec<f32>, SpeechError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| SpeechError::Audio(format!("invalid WAV container: {}", e)))?;
    let spec = reader.spec();

    let samples = read_samples(reader, &spec)?;
    let mono = downmix(samples, spec.channels);
    resample(&mono, spec.sample_rate, MODEL_SAMPLE_RATE)
}

fn read_samples(
    reader: hound::WavReader<Cursor<&[u8]>>,
    spec: &hound::WavSpec,
) -> Result<Vec<f32>, SpeechError> {
    match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SpeechError::Audio(format!("corrupt samples: {}", e))),
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| SpeechError::Audio(format!("corrupt samples: {}", e)))
        }
    }
}

/// Average interleaved channels down to mono.
fn downmix(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }
    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample mono samples from `from_rate` to `to_rate`.
fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, SpeechError> {
    if from_rate == to_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    const CHUNK: usize = 1024;
    let mut resampler =
        SincFixedIn::<f32>::new(to_rate as f64 / from_rate as f64, 2.0, params, CHUNK, 1)
            .map_err(|e| SpeechError::Audio(format!("resampler init: {}", e)))?;

    let mut output =
        Vec::with_capacity(input.len() * to_rate as usize / from_rate as usize + CHUNK);
    let mut pos = 0;

    while pos + CHUNK <= input.len() {
        let frames = resampler
            .process(&[&input[pos..pos + CHUNK]], None)
            .map_err(|e| SpeechError::Audio(format!("resample: {}", e)))?;
        output.extend_from_slice(&frames[0]);
        pos += CHUNK;
    }

    if pos < input.len() {
        let frames = resampler
            .process_partial(Some(&[&input[pos..]]), None)
            .map_err(|e| SpeechError::Audio(format!("resample: {}", e)))?;
        output.extend_from_slice(&frames[0]);
    }

    Ok(output)
}
