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

//! YAML scene descriptions
//!
//! The host engine owns the real scene. The standalone binary and the tests
//! load a small description instead and spawn it into a `hecs::World`.

use super::components::{
    Asset, Collider, Facing, LocationZone, Name, Position, Visitor, Waypoint, WaypointGroup,
};
use crate::error::SceneError;
use glam::Vec3;
use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub agent: AgentDescription,
    pub visitor: Option<VisitorDescription>,
    #[serde(default)]
    pub walkable: WalkableBounds,
    #[serde(default)]
    pub zones: Vec<ZoneDescription>,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

/// Where the assistant starts and where it patrols around
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDescription {
    pub position: Vec3,
    #[serde(default = "default_facing")]
    pub facing: Vec3,
    /// Patrol centre, the start position when omitted
    pub patrol_anchor: Option<Vec3>,
}

impl Default for AgentDescription {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            facing: Vec3::Z,
            patrol_anchor: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorDescription {
    #[serde(default = "default_visitor_name")]
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_facing")]
    pub facing: Vec3,
    #[serde(default = "default_visitor_radius")]
    pub radius: f32,
    #[serde(default = "default_visitor_center")]
    pub center_height: f32,
}

/// Axis-aligned walkable area
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WalkableBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for WalkableBounds {
    fn default() -> Self {
        Self {
            min: Vec3::new(-50.0, 0.0, -50.0),
            max: Vec3::new(50.0, 0.0, 50.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDescription {
    pub name: String,
    pub position: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub name: String,
    pub position: Vec3,
    #[serde(default)]
    pub facing: Option<Vec3>,
    /// Sphere collider radius; objects without one are invisible to rays
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default)]
    pub center_height: f32,
    #[serde(default)]
    pub asset: bool,
    #[serde(default)]
    pub waypoint: Option<WaypointGroup>,
}

/// Entities the assistant needs handles to after spawning
#[derive(Debug, Clone, Copy)]
pub struct SceneHandles {
    pub visitor: Entity,
}

fn default_facing() -> Vec3 {
    Vec3::Z
}

fn default_visitor_name() -> String {
    "visitor".to_string()
}

fn default_visitor_radius() -> f32 {
    0.4
}

fn default_visitor_center() -> f32 {
    1.3
}

impl SceneDescription {
    pub fn load(path: &str) -> Result<Self, SceneError> {
        let file = std::fs::File::open(path).map_err(SceneError::Open)?;
        serde_yaml::from_reader(file).map_err(SceneError::Parse)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, SceneError> {
        serde_yaml::from_str(yaml).map_err(SceneError::Parse)
    }

    pub fn patrol_anchor(&self) -> Vec3 {
        self.agent.patrol_anchor.unwrap_or(self.agent.position)
    }

    /// Spawn zones, objects and the visitor into `world`
    pub fn spawn(&self, world: &mut World) -> Result<SceneHandles, SceneError> {
        let visitor = self.visitor.as_ref().ok_or(SceneError::MissingVisitor)?;

        for zone in &self.zones {
            world.spawn((
                Name::new(zone.name.clone()),
                Position(zone.position),
                LocationZone {
                    radius: zone.radius,
                },
            ));
        }

        for object in &self.objects {
            let mut builder = hecs::EntityBuilder::new();
            builder.add(Name::new(object.name.clone()));
            builder.add(Position(object.position));
            if let Some(facing) = object.facing {
                builder.add(Facing(facing));
            }
            if let Some(radius) = object.radius {
                builder.add(Collider::new(radius, object.center_height));
            }
            if object.asset {
                builder.add(Asset);
            }
            if let Some(group) = object.waypoint {
                builder.add(Waypoint(group));
            }
            world.spawn(builder.build());
        }

        let visitor = world.spawn((
            Name::new(visitor.name.clone()),
            Position(visitor.position),
            Facing(visitor.facing),
            Collider::new(visitor.radius, visitor.center_height),
            Visitor,
        ));

        tracing::info!(
            "Spawned scene '{}': {} zones, {} objects",
            self.name,
            self.zones.len(),
            self.objects.len()
        );

        Ok(SceneHandles { visitor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{find_waypoint, locate};

    const SCENE: &str = r#"
name: Test Gallery
agent:
  position: [0.0, 0.0, 0.0]
visitor:
  position: [2.0, 0.0, 0.0]
  facing: [-1.0, 0.0, 0.0]
zones:
  - name: Lower Gallery
    position: [0.0, 0.0, 0.0]
    radius: 15.0
objects:
  - name: Sunflowers
    position: [0.0, 1.5, 6.0]
    radius: 0.6
    asset: true
  - name: Sunflowers
    position: [0.0, 0.0, 4.5]
    waypoint: painting
"#;

    #[test]
    fn test_spawn_scene() {
        let description = SceneDescription::from_yaml(SCENE).unwrap();
        let mut world = World::new();
        let handles = description.spawn(&mut world).unwrap();

        assert!(world.get::<&Visitor>(handles.visitor).is_ok());
        assert_eq!(
            world.get::<&Name>(handles.visitor).unwrap().as_str(),
            "visitor"
        );
        assert_eq!(locate(&world, Vec3::new(3.0, 0.0, 3.0)).as_deref(), Some("Lower Gallery"));
        let (_, waypoint) = find_waypoint(&world, "Sunflowers").unwrap();
        assert_eq!(waypoint, Vec3::new(0.0, 0.0, 4.5));
        assert_eq!(description.patrol_anchor(), Vec3::ZERO);
    }

    #[test]
    fn test_missing_visitor() {
        let description = SceneDescription::from_yaml("name: Empty\n").unwrap();
        let mut world = World::new();
        assert!(matches!(
            description.spawn(&mut world),
            Err(SceneError::MissingVisitor)
        ));
    }
}
