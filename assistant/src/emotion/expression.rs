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

//! Expression target generation and interpolation

use super::channels::{BodyPose, FacialWeights};
use super::label::Emotion;
use crate::config::ExpressionConfig;
use glam::Vec3;

const MAX_INTENSITY: f32 = 1.5;

/// Drives facial weights and body pose toward the last detected emotion
pub struct ExpressionEngine {
    config: ExpressionConfig,
    current_face: FacialWeights,
    target_face: FacialWeights,
    current_body: BodyPose,
    target_body: BodyPose,
}

impl ExpressionEngine {
    pub fn new(config: ExpressionConfig) -> Self {
        Self {
            config,
            current_face: FacialWeights::default(),
            target_face: FacialWeights::default(),
            current_body: BodyPose::default(),
            target_body: BodyPose::default(),
        }
    }

    pub fn face(&self) -> &FacialWeights {
        &self.current_face
    }

    pub fn target_face(&self) -> &FacialWeights {
        &self.target_face
    }

    pub fn body(&self) -> &BodyPose {
        &self.current_body
    }

    pub fn target_body(&self) -> &BodyPose {
        &self.target_body
    }

    fn intensity(&self, confidence: f32, multiplier: f32, persistent: bool) -> f32 {
        let mut intensity = confidence * multiplier;
        if persistent {
            intensity *= self.config.persistent_intensity_multiplier;
        }
        if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, MAX_INTENSITY)
        }
    }

    /// Replace both targets with the expression for `emotion`
    pub fn apply(&mut self, emotion: Emotion, confidence: f32, persistent: bool) {
        let face = self.intensity(
            confidence,
            self.config.emotion_intensity_multiplier,
            persistent,
        );
        let body = self.intensity(confidence, self.config.body_animation_intensity, persistent);

        self.target_face = facial_expression(emotion, face);
        self.target_body = body_expression(emotion, body);
        tracing::debug!(
            "Expression target set to {} (face {:.2}, body {:.2})",
            emotion,
            face,
            body
        );
    }

    /// Interpolate the current channels toward their targets
    pub fn tick(&mut self, delta_time: f32) {
        self.current_face = self.current_face.lerp(
            &self.target_face,
            self.config.blendshape_transition_speed * delta_time,
        );
        self.current_body = self
            .current_body
            .lerp(&self.target_body, self.config.body_animation_speed * delta_time);
    }

    pub fn reset_to_neutral(&mut self) {
        self.target_face = FacialWeights::default();
        self.target_body = BodyPose::default();
        tracing::debug!("Expression reset to neutral");
    }
}

fn facial_expression(emotion: Emotion, i: f32) -> FacialWeights {
    match emotion {
        Emotion::Happy => FacialWeights {
            mouth_smile_left: i,
            mouth_smile_right: i,
            cheek_squint_left: i * 0.9,
            cheek_squint_right: i * 0.9,
            eye_squint_left: i * 0.6,
            eye_squint_right: i * 0.6,
            brow_outer_up_left: i * 0.4,
            brow_outer_up_right: i * 0.4,
            ..Default::default()
        },
        Emotion::Sad => FacialWeights {
            mouth_frown_left: i,
            mouth_frown_right: i,
            brow_inner_up: i,
            mouth_lower_down_left: i * 0.5,
            mouth_lower_down_right: i * 0.5,
            ..Default::default()
        },
        Emotion::Angry => FacialWeights {
            brow_down_left: i,
            brow_down_right: i,
            eye_squint_left: i,
            eye_squint_right: i,
            mouth_frown_left: i * 0.7,
            mouth_frown_right: i * 0.7,
            nose_sneer_left: i * 0.8,
            nose_sneer_right: i * 0.8,
            ..Default::default()
        },
        Emotion::Fear => FacialWeights {
            eye_wide_left: i,
            eye_wide_right: i,
            brow_inner_up: i,
            brow_outer_up_left: i * 0.9,
            brow_outer_up_right: i * 0.9,
            mouth_stretch_left: i * 0.8,
            mouth_stretch_right: i * 0.8,
            jaw_open: i * 0.5,
            ..Default::default()
        },
        Emotion::Surprise => FacialWeights {
            eye_wide_left: i,
            eye_wide_right: i,
            brow_inner_up: i,
            jaw_open: i,
            ..Default::default()
        },
        Emotion::Disgust => FacialWeights {
            nose_sneer_left: i,
            nose_sneer_right: i,
            mouth_frown_left: i,
            mouth_frown_right: i,
            eye_squint_left: i * 0.7,
            eye_squint_right: i * 0.7,
            ..Default::default()
        },
        Emotion::Neutral => FacialWeights::default(),
    }
}

fn body_expression(emotion: Emotion, i: f32) -> BodyPose {
    match emotion {
        Emotion::Happy => BodyPose {
            head_rotation: Vec3::new(-5.0 * i, 0.0, 0.0),
            ..Default::default()
        },
        Emotion::Sad => BodyPose {
            head_rotation: Vec3::new(15.0 * i, 0.0, 0.0),
            spine_rotation: Vec3::new(8.0 * i, 0.0, 0.0),
            ..Default::default()
        },
        Emotion::Angry => BodyPose {
            head_rotation: Vec3::new(-8.0 * i, 0.0, 0.0),
            spine_rotation: Vec3::new(-5.0 * i, 0.0, 0.0),
            ..Default::default()
        },
        Emotion::Fear => BodyPose {
            head_rotation: Vec3::new(10.0 * i, 0.0, 0.0),
            body_position: Vec3::new(0.0, -0.02 * i, 0.02 * i),
            ..Default::default()
        },
        Emotion::Surprise => BodyPose {
            head_rotation: Vec3::new(-10.0 * i, 0.0, 0.0),
            ..Default::default()
        },
        Emotion::Disgust => BodyPose {
            head_rotation: Vec3::new(5.0 * i, -10.0 * i, 5.0 * i),
            ..Default::default()
        },
        Emotion::Neutral => BodyPose::default(),
    }
}
