//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! PCM16 WAV encoding for classifier uploads

use crate::error::WavError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;

/// Samples decoded from a WAV file, scaled back to [-1, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedWav {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

/// Encode interleaved float samples as a 16-bit PCM WAV file
///
/// Samples are clamped to [-1, 1] and scaled by 32767.
pub fn encode_pcm16(samples: &[f32], channels: u16, sample_rate: u32) -> Result<Vec<u8>, WavError> {
    if channels == 0 {
        return Err(WavError::Format("channel count must be non-zero".to_string()));
    }
    if sample_rate == 0 {
        return Err(WavError::Format("sample rate must be non-zero".to_string()));
    }

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(WavError::Encode)?;
        for sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
            writer.write_sample(value).map_err(WavError::Encode)?;
        }
        writer.finalize().map_err(WavError::Encode)?;
    }
    Ok(cursor.into_inner())
}

pub fn decode_pcm16(bytes: &[u8]) -> Result<DecodedWav, WavError> {
    let reader = WavReader::new(Cursor::new(bytes)).map_err(WavError::Decode)?;
    let spec = reader.spec();
    if spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int {
        return Err(WavError::Format(format!(
            "expected 16-bit PCM, found {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let samples = reader
        .into_samples::<i16>()
        .map(|s| s.map(|v| v as f32 / 32767.0))
        .collect::<Result<Vec<_>, _>>()
        .map_err(WavError::Decode)?;

    Ok(DecodedWav {
        samples,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    })
}
