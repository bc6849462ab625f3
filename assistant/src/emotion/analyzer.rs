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

//! Periodic audio analysis loop

use super::buffer::AudioBuffer;
use super::classifier::EmotionClassifier;
use super::label::EmotionDetection;
use super::wav::encode_pcm16;
use crate::config::ClassifierConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Handle for pushing captured audio from another thread
#[derive(Clone)]
pub struct AudioInjector {
    analyzing: Arc<AtomicBool>,
    buffer: Arc<AudioBuffer>,
}

impl AudioInjector {
    /// Append samples; dropped while analysis is stopped
    pub fn inject(&self, samples: &[f32], channels: u16, sample_rate: u32) {
        if self.analyzing.load(Ordering::Acquire) {
            self.buffer.push(samples, channels, sample_rate);
        }
    }
}

/// Buffers injected audio and classifies it at a fixed interval
pub struct EmotionAnalyzer {
    buffer: Arc<AudioBuffer>,
    classifier: Arc<dyn EmotionClassifier>,
    gain_threshold: f32,
    interval: Duration,
    analyzing: Arc<AtomicBool>,
    cancel: Option<CancellationToken>,
}

impl EmotionAnalyzer {
    pub fn new(config: &ClassifierConfig, classifier: Arc<dyn EmotionClassifier>) -> Self {
        Self {
            buffer: Arc::new(AudioBuffer::new()),
            classifier,
            gain_threshold: config.audio_gain_threshold,
            interval: config.analysis_interval(),
            analyzing: Arc::new(AtomicBool::new(false)),
            cancel: None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::Acquire)
    }

    pub fn buffered_samples(&self) -> usize {
        self.buffer.len()
    }

    pub fn injector(&self) -> AudioInjector {
        AudioInjector {
            analyzing: self.analyzing.clone(),
            buffer: self.buffer.clone(),
        }
    }

    pub fn inject_audio(&self, samples: &[f32], channels: u16, sample_rate: u32) {
        if self.is_analyzing() {
            self.buffer.push(samples, channels, sample_rate);
        }
    }

    /// Mark analysis as running without spawning the periodic loop
    ///
    /// The owner is then expected to call [`analyze_once`](Self::analyze_once).
    pub fn resume(&self) {
        self.analyzing.store(true, Ordering::Release);
    }

    /// Start the periodic loop, sending detections to `detections`
    ///
    /// Must be called from within a tokio runtime. Returns false if the loop
    /// is already running.
    pub fn start(&mut self, detections: mpsc::UnboundedSender<EmotionDetection>) -> bool {
        if self.cancel.is_some() {
            tracing::warn!("Audio analysis is already running");
            return false;
        }

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());
        self.analyzing.store(true, Ordering::Release);

        let buffer = self.buffer.clone();
        let classifier = self.classifier.clone();
        let threshold = self.gain_threshold;
        let period = self.interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let detection = tokio::select! {
                    _ = cancel.cancelled() => break,
                    detection = analyze_buffer(&buffer, classifier.as_ref(), threshold) => detection,
                };

                if let Some(detection) = detection
                    && detections.send(detection).is_err()
                {
                    tracing::debug!("Detection receiver dropped, stopping analysis loop");
                    break;
                }
            }
            tracing::debug!("Audio analysis loop exited");
        });

        tracing::info!(
            "Audio analysis started, interval {:.2}s",
            self.interval.as_secs_f32()
        );
        true
    }

    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if self.analyzing.swap(false, Ordering::AcqRel) {
            tracing::info!("Audio analysis stopped");
        }
        self.buffer.clear();
    }

    /// Run one analysis pass over the current buffer contents
    pub async fn analyze_once(&self) -> Option<EmotionDetection> {
        if !self.is_analyzing() {
            return None;
        }
        analyze_buffer(&self.buffer, self.classifier.as_ref(), self.gain_threshold).await
    }
}

impl Drop for EmotionAnalyzer {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

async fn analyze_buffer(
    buffer: &AudioBuffer,
    classifier: &dyn EmotionClassifier,
    threshold: f32,
) -> Option<EmotionDetection> {
    let chunk = buffer.drain()?;

    let volume = chunk.rms();
    if volume < threshold {
        tracing::trace!("Discarding quiet audio chunk ({:.4})", volume);
        return None;
    }

    tracing::debug!(
        "Volume threshold met ({:.4}), analyzing {} samples",
        volume,
        chunk.samples.len()
    );

    let wav = match encode_pcm16(&chunk.samples, chunk.channels, chunk.sample_rate) {
        Ok(wav) => wav,
        Err(e) => {
            tracing::error!("Failed to encode audio chunk: {}", e);
            return None;
        }
    };

    match classifier.classify(wav).await {
        Ok(result) => Some(EmotionDetection::from_result(&result)),
        Err(e) => {
            tracing::warn!("Emotion classification failed: {}", e);
            None
        }
    }
}
