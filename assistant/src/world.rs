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

//! Scene World
//!
//! Scene objects, zones, waypoints and the visitor live as entities in a
//! `hecs::World`. Entity handles act as weak references: an object that has
//! been despawned simply fails lookup.

mod components;
mod description;
mod scene;

pub use self::components::*;
pub use self::description::{
    AgentDescription, ObjectDescription, SceneDescription, SceneHandles, VisitorDescription,
    WalkableBounds, ZoneDescription,
};
pub use self::scene::{
    ColliderScene, RayHit, SceneQuery, entity_name, entity_position, find_by_name, find_waypoint,
    locate,
};
