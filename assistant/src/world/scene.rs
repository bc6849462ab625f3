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

//! Scene queries
//!
//! [`SceneQuery`] is the physics seam: line-of-sight rays and proximity
//! checks. [`ColliderScene`] answers them against the sphere colliders in the
//! world, which is all the assistant's perception needs.

use super::components::{Collider, LocationZone, Name, Position, Waypoint, WaypointGroup};
use glam::Vec3;
use hecs::{Entity, World};

/// First collider struck by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
}

/// Physics queries against the scene
pub trait SceneQuery: Send + Sync {
    /// Cast a ray and return the nearest hit within `max_distance`.
    /// Colliders containing the origin and the `ignore` entity are skipped.
    fn raycast(
        &self,
        world: &World,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: Option<Entity>,
    ) -> Option<RayHit>;

    /// Entities whose collider intersects the sphere, nearest first
    fn overlap_sphere(&self, world: &World, center: Vec3, radius: f32) -> Vec<Entity>;
}

/// Sphere-collider implementation of [`SceneQuery`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ColliderScene;

impl ColliderScene {
    pub fn new() -> Self {
        Self
    }
}

impl SceneQuery for ColliderScene {
    fn raycast(
        &self,
        world: &World,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: Option<Entity>,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        let mut nearest: Option<RayHit> = None;

        for (entity, position, collider) in world.query::<(Entity, &Position, &Collider)>().iter() {
            if Some(entity) == ignore {
                continue;
            }
            let center = collider.center(position.0);
            let oc = origin - center;
            let b = oc.dot(dir);
            let c = oc.length_squared() - collider.radius * collider.radius;
            if c <= 0.0 {
                continue;
            }
            let discriminant = b * b - c;
            if discriminant < 0.0 {
                continue;
            }
            let t = -b - discriminant.sqrt();
            if t < 0.0 || t > max_distance {
                continue;
            }
            if nearest.is_none_or(|hit| t < hit.distance) {
                nearest = Some(RayHit {
                    entity,
                    point: origin + dir * t,
                    distance: t,
                });
            }
        }

        nearest
    }

    fn overlap_sphere(&self, world: &World, center: Vec3, radius: f32) -> Vec<Entity> {
        let mut hits: Vec<(Entity, f32)> = world
            .query::<(Entity, &Position, &Collider)>()
            .iter()
            .filter_map(|(entity, position, collider)| {
                let distance = collider.center(position.0).distance(center);
                (distance <= radius + collider.radius).then_some((entity, distance))
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits.into_iter().map(|(entity, _)| entity).collect()
    }
}

pub fn entity_name(world: &World, entity: Entity) -> Option<String> {
    world
        .get::<&Name>(entity)
        .ok()
        .map(|name| name.as_str().to_string())
}

pub fn entity_position(world: &World, entity: Entity) -> Option<Vec3> {
    world.get::<&Position>(entity).ok().map(|p| p.0)
}

/// Find any entity by its exact name
pub fn find_by_name(world: &World, name: &str) -> Option<Entity> {
    world
        .query::<(Entity, &Name)>()
        .iter()
        .find(|(_, n)| n.as_str() == name)
        .map(|(entity, _)| entity)
}

/// Resolve a walk destination by name, searching waypoint groups in priority order
pub fn find_waypoint(world: &World, name: &str) -> Option<(Entity, Vec3)> {
    let mut query = world.query::<(Entity, &Name, &Waypoint, &Position)>();
    let candidates: Vec<(Entity, WaypointGroup, Vec3)> = query
        .iter()
        .filter(|(_, n, _, _)| n.as_str() == name)
        .map(|(entity, _, waypoint, position)| (entity, waypoint.0, position.0))
        .collect();

    WaypointGroup::PRIORITY.iter().find_map(|group| {
        candidates
            .iter()
            .find(|(_, g, _)| g == group)
            .map(|(entity, _, position)| (*entity, *position))
    })
}

/// Name of the nearest location zone containing `position`
pub fn locate(world: &World, position: Vec3) -> Option<String> {
    world
        .query::<(&Name, &Position, &LocationZone)>()
        .iter()
        .filter_map(|(name, zone_position, zone)| {
            let distance = horizontal_distance(zone_position.0, position);
            (distance <= zone.radius).then(|| (name.as_str().to_string(), distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name)
}

pub(crate) fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}
