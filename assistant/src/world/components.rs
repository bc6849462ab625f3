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

//! Scene components

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name, also the lookup key used by the dialogue layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ground position of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec3);

/// Forward direction of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facing(pub Vec3);

impl Facing {
    pub fn forward(&self) -> Vec3 {
        self.0.normalize_or(Vec3::Z)
    }

    /// Horizontal right vector, `+X` when facing `+Z`
    pub fn right(&self) -> Vec3 {
        let f = self.forward();
        Vec3::new(f.z, 0.0, -f.x).normalize_or(Vec3::X)
    }
}

impl Default for Facing {
    fn default() -> Self {
        Self(Vec3::Z)
    }
}

/// Sphere collider, centred `center_height` above the entity's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f32,
    pub center_height: f32,
}

impl Collider {
    pub fn new(radius: f32, center_height: f32) -> Self {
        Self {
            radius,
            center_height,
        }
    }

    pub fn center(&self, position: Vec3) -> Vec3 {
        position + Vec3::Y * self.center_height
    }
}

/// Marks an art object that can be seen, gazed at and broken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset;

/// Named region of the museum; its `Name` is the location string
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationZone {
    pub radius: f32,
}

/// Group a walk destination belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointGroup {
    Sublocation,
    Painting,
    DisplayCase,
}

impl WaypointGroup {
    /// Order in which groups are searched when resolving a location name
    pub const PRIORITY: [WaypointGroup; 3] = [
        WaypointGroup::Sublocation,
        WaypointGroup::Painting,
        WaypointGroup::DisplayCase,
    ];
}

/// Named walk destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint(pub WaypointGroup);

/// Marks the visitor entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor;
