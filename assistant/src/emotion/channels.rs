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

//! Expression channel sets
//!
//! Facial weights and body pose are plain structs of named channels. The
//! `define_channels!` macro generates each struct together with its channel
//! name table, lookup and interpolation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

macro_rules! define_channels {
    (
        $(#[$meta:meta])*
        pub struct $ty:ident: $value:ty {
            $(
                $field:ident => $name:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $ty {
            $(
                pub $field: $value,
            )*
        }

        impl $ty {
            /// Channel names, in declaration order
            pub const CHANNELS: &'static [&'static str] = &[$($name),*];

            /// Move every channel toward `target` by `t`, clamped to [0, 1]
            pub fn lerp(&self, target: &Self, t: f32) -> Self {
                let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
                if t >= 1.0 {
                    return *target;
                }
                Self {
                    $(
                        $field: self.$field + (target.$field - self.$field) * t,
                    )*
                }
            }

            /// Look up a channel by name
            pub fn get(&self, name: &str) -> Option<$value> {
                match name {
                    $(
                        $name => Some(self.$field),
                    )*
                    _ => None,
                }
            }

            /// Iterate over `(name, value)` pairs
            pub fn iter(&self) -> impl Iterator<Item = (&'static str, $value)> {
                [$(($name, self.$field)),*].into_iter()
            }
        }
    };
}

define_channels! {
    /// Blendshape weights of the face, nominally in [0, 1.5]
    pub struct FacialWeights: f32 {
        eye_blink_left => "eyeBlinkLeft",
        eye_blink_right => "eyeBlinkRight",
        eyes_look_up => "eyesLookUp",
        eyes_look_down => "eyesLookDown",
        eye_squint_left => "eyeSquintLeft",
        eye_squint_right => "eyeSquintRight",
        eye_wide_left => "eyeWideLeft",
        eye_wide_right => "eyeWideRight",
        brow_down_left => "browDownLeft",
        brow_down_right => "browDownRight",
        brow_inner_up => "browInnerUp",
        brow_outer_up_left => "browOuterUpLeft",
        brow_outer_up_right => "browOuterUpRight",
        mouth_frown_left => "mouthFrownLeft",
        mouth_frown_right => "mouthFrownRight",
        mouth_smile_left => "mouthSmileLeft",
        mouth_smile_right => "mouthSmileRight",
        mouth_pucker => "mouthPucker",
        mouth_funnel => "mouthFunnel",
        mouth_dimple_left => "mouthDimpleLeft",
        mouth_dimple_right => "mouthDimpleRight",
        mouth_stretch_left => "mouthStretchLeft",
        mouth_stretch_right => "mouthStretchRight",
        mouth_roll_lower => "mouthRollLower",
        mouth_roll_upper => "mouthRollUpper",
        mouth_shrug_lower => "mouthShrugLower",
        mouth_shrug_upper => "mouthShrugUpper",
        mouth_press_left => "mouthPressLeft",
        mouth_press_right => "mouthPressRight",
        mouth_upper_up_left => "mouthUpperUpLeft",
        mouth_upper_up_right => "mouthUpperUpRight",
        mouth_lower_down_left => "mouthLowerDownLeft",
        mouth_lower_down_right => "mouthLowerDownRight",
        mouth_left => "mouthLeft",
        mouth_right => "mouthRight",
        cheek_puff => "cheekPuff",
        cheek_squint_left => "cheekSquintLeft",
        cheek_squint_right => "cheekSquintRight",
        nose_sneer_left => "noseSneerLeft",
        nose_sneer_right => "noseSneerRight",
        jaw_forward => "jawForward",
        jaw_left => "jawLeft",
        jaw_right => "jawRight",
        jaw_open => "jawOpen",
        tongue_out => "tongueOut",
    }
}

define_channels! {
    /// Euler rotation offsets in degrees, plus a body position offset
    pub struct BodyPose: Vec3 {
        head_rotation => "headRotation",
        spine_rotation => "spineRotation",
        left_shoulder_rotation => "leftShoulderRotation",
        right_shoulder_rotation => "rightShoulderRotation",
        left_arm_rotation => "leftArmRotation",
        right_arm_rotation => "rightArmRotation",
        body_position => "bodyPosition",
    }
}
