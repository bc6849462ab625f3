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

//! Emotion statistics over a session

use super::label::{Emotion, EmotionDetection};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Tally {
    count: u32,
    total_confidence: f32,
    max_confidence: f32,
}

/// Detection history plus per-label tallies
///
/// The history is capped at `max_history` entries; tallies count every
/// detection recorded since the last `clear`.
#[derive(Debug, Clone)]
pub struct EmotionStatistics {
    max_history: usize,
    history: VecDeque<EmotionDetection>,
    tallies: BTreeMap<Emotion, Tally>,
    total_detections: u32,
}

impl EmotionStatistics {
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history: max_history.max(1),
            history: VecDeque::new(),
            tallies: BTreeMap::new(),
            total_detections: 0,
        }
    }

    pub fn record(&mut self, detection: &EmotionDetection) {
        self.history.push_back(detection.clone());
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }

        let tally = self.tallies.entry(detection.emotion).or_default();
        tally.count += 1;
        tally.total_confidence += detection.confidence;
        tally.max_confidence = tally.max_confidence.max(detection.confidence);
        self.total_detections += 1;

        tracing::debug!(
            "Emotion history #{}: {} (confidence {:.2})",
            self.total_detections,
            detection.emotion,
            detection.confidence
        );
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.tallies.clear();
        self.total_detections = 0;
    }

    pub fn history(&self) -> impl Iterator<Item = &EmotionDetection> {
        self.history.iter()
    }

    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn total_detections(&self) -> u32 {
        self.total_detections
    }

    pub fn count(&self, emotion: Emotion) -> u32 {
        self.tallies.get(&emotion).map_or(0, |t| t.count)
    }

    pub fn average_confidence(&self, emotion: Emotion) -> f32 {
        match self.tallies.get(&emotion) {
            Some(tally) if tally.count > 0 => tally.total_confidence / tally.count as f32,
            _ => 0.0,
        }
    }

    pub fn max_confidence(&self, emotion: Emotion) -> f32 {
        self.tallies.get(&emotion).map_or(0.0, |t| t.max_confidence)
    }

    /// Most frequent emotion and its share in percent
    ///
    /// Ties go to the label listed first in [`Emotion::ALL`]. With no
    /// detections the dominant emotion is neutral at 0%.
    pub fn dominant(&self) -> (Emotion, f32) {
        let mut dominant = Emotion::Neutral;
        let mut max_count = 0;
        for emotion in Emotion::ALL {
            let count = self.count(emotion);
            if count > max_count {
                max_count = count;
                dominant = emotion;
            }
        }
        (dominant, self.percentage(max_count))
    }

    /// Share of every detected label in percent, omitting labels never seen
    pub fn summary_percentages(&self) -> BTreeMap<String, f32> {
        self.tallies
            .iter()
            .filter(|(_, tally)| tally.count > 0)
            .map(|(emotion, tally)| (emotion.as_str().to_string(), self.percentage(tally.count)))
            .collect()
    }

    fn percentage(&self, count: u32) -> f32 {
        if self.total_detections == 0 {
            0.0
        } else {
            count as f32 / self.total_detections as f32 * 100.0
        }
    }

    pub fn log_statistics(&self) {
        if self.total_detections == 0 {
            tracing::info!("No emotion statistics available");
            return;
        }

        let (dominant, share) = self.dominant();
        tracing::info!(
            "Emotion statistics: {} detections, dominant {} ({:.1}%)",
            self.total_detections,
            dominant,
            share
        );

        let mut ranked: Vec<_> = self.tallies.iter().filter(|(_, t)| t.count > 0).collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        for (emotion, tally) in ranked {
            tracing::info!(
                "  {:<10} {:>3} ({:.1}%) avg {:.2} max {:.2}",
                emotion.as_str(),
                tally.count,
                self.percentage(tally.count),
                self.average_confidence(*emotion),
                tally.max_confidence
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stats: &mut EmotionStatistics, emotion: Emotion, confidence: f32) {
        stats.record(&EmotionDetection::new(emotion, confidence));
    }

    #[test]
    fn test_empty_statistics() {
        let stats = EmotionStatistics::new(10);
        assert_eq!(stats.dominant(), (Emotion::Neutral, 0.0));
        assert!(stats.summary_percentages().is_empty());
        assert!(!stats.has_history());
    }

    #[test]
    fn test_tallies_and_dominant() {
        let mut stats = EmotionStatistics::new(10);
        record(&mut stats, Emotion::Happy, 0.6);
        record(&mut stats, Emotion::Happy, 0.8);
        record(&mut stats, Emotion::Sad, 0.4);
        record(&mut stats, Emotion::Happy, 1.0);

        assert_eq!(stats.total_detections(), 4);
        assert_eq!(stats.count(Emotion::Happy), 3);
        assert!((stats.average_confidence(Emotion::Happy) - 0.8).abs() < 1e-6);
        assert_eq!(stats.max_confidence(Emotion::Happy), 1.0);
        assert_eq!(stats.average_confidence(Emotion::Fear), 0.0);

        let (dominant, share) = stats.dominant();
        assert_eq!(dominant, Emotion::Happy);
        assert!((share - 75.0).abs() < 1e-4);

        let summary = stats.summary_percentages();
        assert_eq!(summary.len(), 2);
        assert!((summary["sad"] - 25.0).abs() < 1e-4);
        assert!(!summary.contains_key("fear"));
    }

    #[test]
    fn test_dominant_tie_prefers_earlier_label() {
        let mut stats = EmotionStatistics::new(10);
        record(&mut stats, Emotion::Fear, 0.5);
        record(&mut stats, Emotion::Sad, 0.5);
        assert_eq!(stats.dominant().0, Emotion::Sad);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut stats = EmotionStatistics::new(3);
        for emotion in [Emotion::Happy, Emotion::Sad, Emotion::Angry, Emotion::Fear] {
            record(&mut stats, emotion, 0.5);
        }
        let labels: Vec<_> = stats.history().map(|d| d.emotion).collect();
        assert_eq!(labels, vec![Emotion::Sad, Emotion::Angry, Emotion::Fear]);
        assert_eq!(stats.total_detections(), 4);
        assert_eq!(stats.count(Emotion::Happy), 1);
    }

    #[test]
    fn test_clear() {
        let mut stats = EmotionStatistics::new(3);
        record(&mut stats, Emotion::Happy, 0.5);
        stats.clear();
        assert_eq!(stats.total_detections(), 0);
        assert!(!stats.has_history());
    }
}
