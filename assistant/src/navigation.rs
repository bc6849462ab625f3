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

//! Navigation seam
//!
//! Path finding belongs to the host engine. The assistant only sets
//! destinations, speeds and stopping distances, and reads back how far it
//! still has to go.

use crate::world::WalkableBounds;
use glam::Vec3;

/// Slack added to the stopping distance when judging arrival
pub const ARRIVAL_TOLERANCE: f32 = 1e-3;

/// Path-following agent driven by the movement controller
pub trait Navigator: Send {
    fn position(&self) -> Vec3;

    fn destination(&self) -> Vec3;

    /// Returns false when the destination cannot be reached
    fn set_destination(&mut self, destination: Vec3) -> bool;

    fn remaining_distance(&self) -> f32;

    fn stopping_distance(&self) -> f32;

    fn set_stopping_distance(&mut self, distance: f32);

    fn speed(&self) -> f32;

    fn set_speed(&mut self, speed: f32);

    /// Nearest walkable point within `max_distance` of `point`
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Drop the current destination and stand still
    fn stop(&mut self) {
        let here = self.position();
        self.set_destination(here);
    }

    /// Move along the path; a no-op for engine-driven agents
    fn advance(&mut self, _delta_time: f32) {}

    fn has_arrived(&self) -> bool {
        self.remaining_distance() <= self.stopping_distance() + ARRIVAL_TOLERANCE
    }
}

/// Straight-line navigator over an axis-aligned walkable area
#[derive(Debug, Clone)]
pub struct StraightLineNavigator {
    position: Vec3,
    destination: Vec3,
    speed: f32,
    stopping_distance: f32,
    bounds: WalkableBounds,
}

impl StraightLineNavigator {
    pub fn new(position: Vec3, bounds: WalkableBounds) -> Self {
        Self {
            position,
            destination: position,
            speed: 0.0,
            stopping_distance: 0.0,
            bounds,
        }
    }

    /// Teleport, clearing the destination
    pub fn warp(&mut self, position: Vec3) {
        self.position = position;
        self.destination = position;
    }

    fn clamp(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.bounds.min.x, self.bounds.max.x),
            self.position.y,
            point.z.clamp(self.bounds.min.z, self.bounds.max.z),
        )
    }

    fn contains(&self, point: Vec3) -> bool {
        (self.bounds.min.x..=self.bounds.max.x).contains(&point.x)
            && (self.bounds.min.z..=self.bounds.max.z).contains(&point.z)
    }
}

impl Navigator for StraightLineNavigator {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn destination(&self) -> Vec3 {
        self.destination
    }

    fn set_destination(&mut self, destination: Vec3) -> bool {
        if !self.contains(destination) {
            tracing::debug!("Destination {} is outside the walkable area", destination);
            return false;
        }
        self.destination = Vec3::new(destination.x, self.position.y, destination.z);
        true
    }

    fn remaining_distance(&self) -> f32 {
        Vec3::new(
            self.destination.x - self.position.x,
            0.0,
            self.destination.z - self.position.z,
        )
        .length()
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.stopping_distance = distance.max(0.0);
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        let projected = self.clamp(point);
        let offset = Vec3::new(projected.x - point.x, 0.0, projected.z - point.z);
        (offset.length() <= max_distance).then_some(projected)
    }

    fn advance(&mut self, delta_time: f32) {
        let remaining = self.remaining_distance();
        if remaining <= self.stopping_distance + ARRIVAL_TOLERANCE {
            return;
        }
        let step = (self.speed * delta_time).min(remaining - self.stopping_distance);
        let direction = Vec3::new(
            self.destination.x - self.position.x,
            0.0,
            self.destination.z - self.position.z,
        )
        .normalize_or_zero();
        self.position += direction * step;
    }
}
