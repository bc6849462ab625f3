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

//! Shared audio sample buffer

use std::sync::Mutex;

/// Interleaved samples drained from the buffer in one go
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl AudioChunk {
    pub fn rms(&self) -> f32 {
        rms(&self.samples)
    }
}

#[derive(Debug, Default)]
struct BufferInner {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

/// Audio appended by the capture thread and drained by the analysis loop
///
/// The format of the most recent push wins.
#[derive(Debug, Default)]
pub struct AudioBuffer {
    inner: Mutex<BufferInner>,
}

impl AudioBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, samples: &[f32], channels: u16, sample_rate: u32) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.samples.extend_from_slice(samples);
        inner.channels = channels;
        inner.sample_rate = sample_rate;
    }

    /// Take everything buffered so far, or `None` if the buffer is empty
    pub fn drain(&self) -> Option<AudioChunk> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.samples.is_empty() {
            return None;
        }
        Some(AudioChunk {
            samples: std::mem::take(&mut inner.samples),
            channels: inner.channels,
            sample_rate: inner.sample_rate,
        })
    }

    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .samples
            .clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Root mean square loudness, zero for no samples
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}
