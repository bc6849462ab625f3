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

//! Line of sight and gaze resolution

use crate::config::PerceptionConfig;
use crate::world::{Asset, Name, SceneQuery};
use glam::Vec3;
use hecs::{Entity, World};

/// What the visitor is looking at; replaced wholesale every update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GazeObservation {
    pub valid: bool,
    pub object_of_interest: Option<Entity>,
}

impl GazeObservation {
    pub fn looking_at(object: Entity) -> Self {
        Self {
            valid: true,
            object_of_interest: Some(object),
        }
    }

    /// Name of the gazed object while it still exists
    pub fn object_name(&self, world: &World) -> Option<String> {
        if !self.valid {
            return None;
        }
        let object = self.object_of_interest?;
        world.get::<&Name>(object).ok().map(|n| n.as_str().to_string())
    }
}

/// Cast from the agent's head to the visitor's head.
///
/// `Some(true)` when the visitor is the first thing hit, `Some(false)` when
/// something else is in the way, `None` when the ray hits nothing at all.
pub fn check_visibility(
    scene: &dyn SceneQuery,
    world: &World,
    agent_head: Vec3,
    visitor_head: Vec3,
    visitor: Entity,
) -> Option<bool> {
    let hit = scene.raycast(world, agent_head, visitor_head - agent_head, f32::INFINITY, None)?;
    Some(hit.entity == visitor)
}

/// Resolve the asset the visitor is looking at
pub fn resolve_gaze(
    scene: &dyn SceneQuery,
    world: &World,
    visitor: Entity,
    visitor_position: Vec3,
    visitor_eye: Vec3,
    visitor_forward: Vec3,
    config: &PerceptionConfig,
) -> GazeObservation {
    let Some(hit) = scene.raycast(world, visitor_eye, visitor_forward, f32::INFINITY, Some(visitor))
    else {
        return GazeObservation::default();
    };
    if visitor_position.distance(hit.point) > config.gaze_max_distance {
        return GazeObservation::default();
    }

    scene
        .overlap_sphere(world, hit.point, config.gaze_pick_radius)
        .into_iter()
        .find(|entity| world.satisfies::<&Asset>(*entity))
        .map(GazeObservation::looking_at)
        .unwrap_or_default()
}

/// Names of assets whose colliders touch the sphere, nearest first
pub fn assets_in_view(
    scene: &dyn SceneQuery,
    world: &World,
    center: Vec3,
    radius: f32,
) -> Vec<String> {
    scene
        .overlap_sphere(world, center, radius)
        .into_iter()
        .filter(|entity| world.satisfies::<&Asset>(*entity))
        .filter_map(|entity| world.get::<&Name>(entity).ok().map(|n| n.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Collider, ColliderScene, Position};

    fn world_with_painting(at: Vec3) -> (World, Entity, Entity) {
        let mut world = World::new();
        let visitor = world.spawn((Position(Vec3::ZERO), Collider::new(0.4, 1.5)));
        let painting = world.spawn((
            Name::new("Starry Night"),
            Position(at),
            Collider::new(0.5, 0.0),
            Asset,
        ));
        (world, visitor, painting)
    }

    #[test]
    fn test_gaze_hits_asset() {
        let (world, visitor, painting) = world_with_painting(Vec3::new(0.0, 1.7, 5.0));
        let gaze = resolve_gaze(
            &ColliderScene,
            &world,
            visitor,
            Vec3::ZERO,
            Vec3::new(0.0, 1.7, 0.0),
            Vec3::Z,
            &PerceptionConfig::default(),
        );
        assert_eq!(gaze, GazeObservation::looking_at(painting));
        assert_eq!(gaze.object_name(&world).as_deref(), Some("Starry Night"));
    }

    #[test]
    fn test_gaze_too_far() {
        let (world, visitor, _) = world_with_painting(Vec3::new(0.0, 1.7, 12.0));
        let gaze = resolve_gaze(
            &ColliderScene,
            &world,
            visitor,
            Vec3::ZERO,
            Vec3::new(0.0, 1.7, 0.0),
            Vec3::Z,
            &PerceptionConfig::default(),
        );
        assert!(!gaze.valid);
        assert!(gaze.object_of_interest.is_none());
    }

    #[test]
    fn test_gaze_on_non_asset_is_invalid() {
        let mut world = World::new();
        let visitor = world.spawn((Position(Vec3::ZERO),));
        world.spawn((Name::new("Wall"), Position(Vec3::new(0.0, 1.7, 3.0)), Collider::new(1.0, 0.0)));
        let gaze = resolve_gaze(
            &ColliderScene,
            &world,
            visitor,
            Vec3::ZERO,
            Vec3::new(0.0, 1.7, 0.0),
            Vec3::Z,
            &PerceptionConfig::default(),
        );
        assert!(!gaze.valid);
    }

    #[test]
    fn test_assets_in_view_skips_plain_colliders() {
        let (mut world, _, _) = world_with_painting(Vec3::new(0.0, 1.7, 5.0));
        world.spawn((Name::new("Bench"), Position(Vec3::new(0.0, 0.5, 4.0)), Collider::new(0.5, 0.0)));
        world.spawn((
            Name::new("Water Lilies"),
            Position(Vec3::new(3.0, 1.7, 5.0)),
            Collider::new(0.5, 0.0),
            Asset,
        ));

        let names = assets_in_view(&ColliderScene, &world, Vec3::new(0.0, 1.7, 5.0), 4.0);
        assert_eq!(names, vec!["Starry Night".to_string(), "Water Lilies".to_string()]);
    }

    #[test]
    fn test_visibility() {
        let (world, visitor, _) = world_with_painting(Vec3::new(0.0, 1.7, 5.0));
        let eye = Vec3::new(0.0, 1.7, -3.0);
        assert_eq!(
            check_visibility(&ColliderScene, &world, eye, Vec3::new(0.0, 1.7, 0.0), visitor),
            Some(true)
        );
        assert_eq!(
            check_visibility(
                &ColliderScene,
                &world,
                Vec3::new(0.0, 1.7, 8.0),
                Vec3::new(0.0, 1.7, 0.0),
                visitor
            ),
            Some(false)
        );
        assert_eq!(
            check_visibility(&ColliderScene, &world, eye, Vec3::new(20.0, 1.7, -3.0), visitor),
            None
        );
    }
}
