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

use crate::error::ConfigError;
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to configuration file",
        default_value = "assistant/config.yaml"
    )]
    pub config_file: String,

    #[arg(short = 'e', long = "env", help = "Path to environment file")]
    pub env_file: Option<String>,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            config_file: "config.yaml".to_string(),
            env_file: Some(".env".to_string()),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub dialogue: DialogueConfig,
    pub tts: TtsConfig,
    pub classifier: ClassifierConfig,
    pub music: MusicConfig,
    pub movement: MovementConfig,
    pub perception: PerceptionConfig,
    pub expression: ExpressionConfig,
    pub persistence: PersistenceConfig,
    pub boredom: BoredomConfig,
    pub scene: SceneConfig,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Configuration, ConfigError> {
        let file = std::fs::File::open(path).map_err(ConfigError::Open)?;
        let conf = serde_yaml::from_reader(file).map_err(ConfigError::Parse)?;
        Ok(conf)
    }
}

/// Dialogue server connection
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    pub url: EnvField<String>,
    /// Name the visitor is introduced with
    pub username: EnvField<String>,
    pub base_prompt: String,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:3000/ws/id".to_string().into(),
            username: "visitor".to_string().into(),
            base_prompt: "museumAssistant".to_string(),
        }
    }
}

/// Text-to-speech signaling server
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub url: EnvField<String>,
    pub voice: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8765".to_string().into(),
            voice: "dan".to_string(),
        }
    }
}

/// Remote emotion classifier
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub base_url: EnvField<String>,
    pub endpoint: String,
    pub analysis_interval_secs: f32,
    /// RMS below which a chunk is discarded without a request
    pub audio_gain_threshold: f32,
    pub analyze_on_start: bool,
}

impl ClassifierConfig {
    pub fn analysis_interval(&self) -> Duration {
        Duration::from_secs_f32(self.analysis_interval_secs.max(0.01))
    }

    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:6000".to_string().into(),
            endpoint: "/analyze_emotion".to_string(),
            analysis_interval_secs: 1.0,
            audio_gain_threshold: 0.01,
            analyze_on_start: true,
        }
    }
}

/// Music search service
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    pub base_url: EnvField<String>,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.blankframe.com".to_string().into(),
        }
    }
}

/// Locomotion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub patrol_range: f32,
    pub walk_speed: f32,
    pub follow_walk_speed: f32,
    pub run_speed: f32,
    /// Remaining distance above which the agent runs
    pub run_distance: f32,
    pub stopping_distance: f32,
    pub follow_stopping_distance: f32,
    pub head_track_distance: f32,
    /// Degrees per second
    pub angular_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            patrol_range: 50.0,
            walk_speed: 0.8,
            follow_walk_speed: 1.5,
            run_speed: 4.5,
            run_distance: 5.0,
            stopping_distance: 0.5,
            follow_stopping_distance: 2.2,
            head_track_distance: 4.5,
            angular_speed: 180.0,
        }
    }
}

/// Visibility, conversation and gaze heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    pub interval_secs: f32,
    pub conversation_timeout_secs: f32,
    pub engage_distance: f32,
    pub upkeep_distance: f32,
    pub gaze_angle_min: f32,
    pub gaze_angle_max: f32,
    pub gaze_max_distance: f32,
    pub gaze_pick_radius: f32,
    pub view_radius: f32,
    pub audible_distance: f32,
    pub head_height: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            interval_secs: 0.2,
            conversation_timeout_secs: 3.0,
            engage_distance: 2.5,
            upkeep_distance: 3.0,
            gaze_angle_min: 85.0,
            gaze_angle_max: 95.0,
            gaze_max_distance: 8.0,
            gaze_pick_radius: 0.2,
            view_radius: 8.0,
            audible_distance: 20.0,
            head_height: 1.7,
        }
    }
}

/// Facial and body expression tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    pub blendshape_transition_speed: f32,
    pub emotion_intensity_multiplier: f32,
    pub body_animation_speed: f32,
    pub body_animation_intensity: f32,
    pub persistent_intensity_multiplier: f32,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            blendshape_transition_speed: 5.0,
            emotion_intensity_multiplier: 1.0,
            body_animation_speed: 2.0,
            body_animation_intensity: 1.0,
            persistent_intensity_multiplier: 1.2,
        }
    }
}

/// Emotion persistence tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub enabled: bool,
    pub consecutive_threshold: u32,
    pub persistent_duration_secs: f32,
    pub max_history: usize,
    /// Seconds between statistics log lines, zero disables them
    pub statistics_log_interval_secs: f32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            consecutive_threshold: 2,
            persistent_duration_secs: 8.0,
            max_history: 10,
            statistics_log_interval_secs: 10.0,
        }
    }
}

/// Inner thought timer range
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoredomConfig {
    pub min_secs: f32,
    pub max_secs: f32,
}

impl Default for BoredomConfig {
    fn default() -> Self {
        Self {
            min_secs: 20.0,
            max_secs: 40.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub path: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: "assistant/scene.yaml".to_string(),
        }
    }
}
