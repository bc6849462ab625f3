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

//! Movement controller

use super::state::{CommandQueueEntry, LocomotionIntent, MovementState};
use crate::config::MovementConfig;
use crate::navigation::Navigator;
use crate::perception::GazeObservation;
use crate::world::{entity_position, find_waypoint};
use glam::Vec3;
use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Orientation overrides applied after movement each tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FacingTargets {
    /// Point the head looks at
    pub head: Option<Vec3>,
    /// Point the body turns toward, at the agent's own height
    pub body: Option<Vec3>,
}

/// Movement cached when conversation body language freezes the agent
#[derive(Debug, Clone)]
struct FrozenMovement {
    state: MovementState,
    destination: Vec3,
    queue: VecDeque<CommandQueueEntry>,
    generation: u64,
}

/// Owns the movement state, the deferred command queue and the navigator
pub struct MovementController {
    navigator: Box<dyn Navigator>,
    config: MovementConfig,
    head_height: f32,
    patrol_anchor: Vec3,
    visitor: Entity,
    state: MovementState,
    queue: VecDeque<CommandQueueEntry>,
    intent: LocomotionIntent,
    face_visitor: bool,
    frozen: Option<FrozenMovement>,
    /// Bumped on every applied command
    generation: u64,
    facing: FacingTargets,
    /// Horizontal body forward
    heading: Vec3,
    /// Heading held before the visitor was faced
    prior_heading: Option<Vec3>,
    /// Heading to turn back to once the conversation ends
    return_heading: Option<Vec3>,
    rng: StdRng,
}

impl MovementController {
    pub fn new(
        mut navigator: Box<dyn Navigator>,
        config: MovementConfig,
        head_height: f32,
        patrol_anchor: Vec3,
        visitor: Entity,
    ) -> Self {
        navigator.set_speed(config.walk_speed);
        navigator.set_stopping_distance(config.stopping_distance);
        Self {
            navigator,
            config,
            head_height,
            patrol_anchor,
            visitor,
            state: MovementState::Idle,
            queue: VecDeque::new(),
            intent: LocomotionIntent::Idle,
            face_visitor: false,
            frozen: None,
            generation: 0,
            facing: FacingTargets::default(),
            heading: Vec3::Z,
            prior_heading: None,
            return_heading: None,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Use a fixed seed for patrol point sampling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_heading(mut self, heading: Vec3) -> Self {
        self.heading = flatten(heading).unwrap_or(Vec3::Z);
        self
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn intent(&self) -> LocomotionIntent {
        self.intent
    }

    pub fn facing(&self) -> FacingTargets {
        self.facing
    }

    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    /// Direction the head is pointing, the body heading when not tracking
    pub fn head_forward(&self) -> Vec3 {
        let eye = self.navigator.position() + Vec3::Y * self.head_height;
        self.facing
            .head
            .and_then(|target| (target - eye).try_normalize())
            .unwrap_or(self.heading)
    }

    pub fn is_facing_visitor(&self) -> bool {
        self.face_visitor
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Deferred commands, oldest first
    pub fn queued(&self) -> impl Iterator<Item = &CommandQueueEntry> {
        self.queue.iter()
    }

    /// True while deferred commands are waiting
    pub fn is_queue_locked(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn position(&self) -> Vec3 {
        self.navigator.position()
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn navigator_mut(&mut self) -> &mut dyn Navigator {
        self.navigator.as_mut()
    }

    pub fn idle(&mut self) {
        self.command(CommandQueueEntry::state(MovementState::Idle));
    }

    pub fn patrol(&mut self) {
        self.command(CommandQueueEntry::state(MovementState::Patrol));
    }

    pub fn follow_visitor(&mut self) {
        self.command(CommandQueueEntry::state(MovementState::Follow));
    }

    /// Walk to an entity's current position
    pub fn walk_to(&mut self, world: &World, target: Entity) {
        let Some(position) = entity_position(world, target) else {
            tracing::warn!("Ignoring walk to missing entity {:?}", target);
            return;
        };

        if self.state == MovementState::GotoTarget {
            self.defer(CommandQueueEntry::walk_to(target));
            return;
        }

        self.discard_queue();
        self.go_to(position);
    }

    /// Walk to a named waypoint; returns false when the name is unknown
    pub fn walk_to_location(&mut self, world: &World, name: &str) -> bool {
        match find_waypoint(world, name) {
            Some((waypoint, _)) => {
                tracing::debug!("Walking to location '{}'", name);
                self.walk_to(world, waypoint);
                true
            }
            None => {
                tracing::warn!("Unknown location '{}'", name);
                false
            }
        }
    }

    pub fn walk_to_visitor(&mut self, world: &World) {
        self.walk_to(world, self.visitor);
    }

    fn command(&mut self, entry: CommandQueueEntry) {
        if self.state == MovementState::GotoTarget {
            self.defer(entry);
            return;
        }
        self.discard_queue();
        self.set_state(entry.state);
    }

    /// Drop deferred commands left behind by an earlier walk
    fn discard_queue(&mut self) {
        if !self.queue.is_empty() {
            tracing::debug!("Discarding {} stale deferred commands", self.queue.len());
            self.queue.clear();
        }
    }

    fn defer(&mut self, entry: CommandQueueEntry) {
        tracing::debug!(
            "Deferring {} until arrival ({} queued)",
            entry.state,
            self.queue.len() + 1
        );
        self.queue.push_back(entry);
    }

    fn go_to(&mut self, destination: Vec3) {
        if !self.navigator.set_destination(destination) {
            tracing::warn!("Navigator rejected destination {}", destination);
            return;
        }
        self.set_state(MovementState::GotoTarget);
    }

    fn set_state(&mut self, state: MovementState) {
        if self.state != state {
            tracing::debug!("Movement state {} -> {}", self.state, state);
        }
        if state == MovementState::Idle {
            self.navigator.stop();
        }
        self.state = state;
        self.generation += 1;
    }

    /// Advance the navigator and run the current state's behaviour
    pub fn tick(&mut self, world: &World, delta_time: f32) {
        self.navigator.advance(delta_time);

        match self.state {
            MovementState::Idle => self.intent = LocomotionIntent::Idle,
            MovementState::Patrol => self.tick_patrol(),
            MovementState::Follow => self.tick_follow(world),
            MovementState::GotoTarget => self.tick_goto(world),
        }
    }

    fn tick_patrol(&mut self) {
        self.navigator
            .set_stopping_distance(self.config.stopping_distance);
        self.navigator.set_speed(self.config.walk_speed);

        if !self.navigator.has_arrived() {
            self.intent = LocomotionIntent::Walk;
            return;
        }

        self.intent = LocomotionIntent::Idle;
        match self.random_patrol_point() {
            Some(point) if self.navigator.set_destination(point) => {
                tracing::trace!("Patrolling to {}", point);
                self.intent = LocomotionIntent::Walk;
            }
            _ => tracing::debug!("No walkable patrol point found, retrying next tick"),
        }
    }

    fn random_patrol_point(&mut self) -> Option<Vec3> {
        let range = self.config.patrol_range;
        let offset = loop {
            let candidate = Vec3::new(
                self.rng.random_range(-1.0..=1.0),
                self.rng.random_range(-1.0..=1.0),
                self.rng.random_range(-1.0..=1.0),
            );
            if candidate.length_squared() <= 1.0 {
                break candidate;
            }
        };
        self.navigator
            .sample_position(self.patrol_anchor + offset * range, range)
    }

    fn tick_follow(&mut self, world: &World) {
        let Some(visitor) = entity_position(world, self.visitor) else {
            self.intent = LocomotionIntent::Idle;
            return;
        };

        self.navigator
            .set_stopping_distance(self.config.follow_stopping_distance);
        self.navigator.set_destination(visitor);

        let remaining = self.navigator.remaining_distance();
        if remaining <= self.navigator.stopping_distance() {
            self.navigator.set_speed(self.config.follow_walk_speed);
            self.intent = LocomotionIntent::Idle;
        } else if remaining <= self.config.run_distance {
            self.navigator.set_speed(self.config.follow_walk_speed);
            self.intent = LocomotionIntent::Walk;
        } else {
            self.navigator.set_speed(self.config.run_speed);
            self.intent = LocomotionIntent::Run;
        }
    }

    fn tick_goto(&mut self, world: &World) {
        self.navigator
            .set_stopping_distance(self.config.stopping_distance);

        if self.navigator.has_arrived() {
            self.intent = LocomotionIntent::Idle;
            self.consume_queued(world);
            return;
        }

        if self.navigator.remaining_distance() <= self.config.run_distance {
            self.navigator.set_speed(self.config.walk_speed);
            self.intent = LocomotionIntent::Walk;
        } else {
            self.navigator.set_speed(self.config.run_speed);
            self.intent = LocomotionIntent::Run;
        }
    }

    /// Apply exactly one deferred command after an arrival
    fn consume_queued(&mut self, world: &World) {
        let Some(next) = self.queue.pop_front() else {
            return;
        };

        match (next.state, next.target) {
            (MovementState::GotoTarget, Some(target)) => match entity_position(world, target) {
                Some(position) if self.navigator.set_destination(position) => {
                    tracing::debug!("Continuing to queued target {:?}", target);
                    self.generation += 1;
                }
                _ => tracing::warn!("Queued walk target {:?} is unreachable", target),
            },
            (state, _) => self.set_state(state),
        }
    }

    /// Freeze movement and turn toward the visitor
    pub fn enable_face_visitor(&mut self) {
        if self.face_visitor {
            return;
        }
        self.face_visitor = true;
        self.frozen = None;
        self.prior_heading = Some(self.heading);
        self.return_heading = None;

        if matches!(self.state, MovementState::Patrol | MovementState::GotoTarget) {
            let state = self.state;
            let destination = self.navigator.destination();
            let queue = std::mem::take(&mut self.queue);
            self.set_state(MovementState::Idle);
            self.frozen = Some(FrozenMovement {
                state,
                destination,
                queue,
                generation: self.generation,
            });
            tracing::debug!("Froze {} movement for conversation", state);
        }
    }

    /// Release the visitor and resume frozen movement if nothing replaced it
    pub fn disable_face_visitor(&mut self) {
        if !self.face_visitor {
            return;
        }
        self.face_visitor = false;
        self.facing.body = None;
        self.return_heading = self.prior_heading.take();

        let Some(frozen) = self.frozen.take() else {
            return;
        };
        if frozen.generation != self.generation {
            tracing::debug!(
                "Not resuming {}: superseded by a newer command, dropping {} deferred",
                frozen.state,
                frozen.queue.len()
            );
            return;
        }

        match frozen.state {
            MovementState::GotoTarget => {
                self.go_to(frozen.destination);
                if self.state == MovementState::GotoTarget {
                    self.queue = frozen.queue;
                }
            }
            state => self.set_state(state),
        }
    }

    /// Compute head and body orientation overrides and turn the body
    pub fn late_tick(&mut self, world: &World, gaze: &GazeObservation, delta_time: f32) {
        let mut facing = FacingTargets::default();
        let agent = self.navigator.position();

        if let Some(visitor) = entity_position(world, self.visitor) {
            let flat = Vec3::new(visitor.x - agent.x, 0.0, visitor.z - agent.z);
            if flat.length() < self.config.head_track_distance {
                facing.head = Some(visitor + Vec3::Y * self.head_height);
            }

            if self.face_visitor {
                let gazed = gaze
                    .object_of_interest
                    .filter(|_| gaze.valid)
                    .and_then(|object| entity_position(world, object));
                match gazed {
                    Some(object) => {
                        facing.body = Some(Vec3::new(object.x, agent.y, object.z));
                        facing.head = Some(object);
                    }
                    None => facing.body = Some(Vec3::new(visitor.x, agent.y, visitor.z)),
                }
            }
        }

        self.facing = facing;

        if let Some(body) = facing.body {
            if let Some(direction) = flatten(body - agent) {
                self.heading = direction;
            }
        } else if !self.navigator.has_arrived() {
            self.return_heading = None;
            if let Some(direction) = flatten(self.navigator.destination() - agent) {
                let max_step = self.config.angular_speed.to_radians() * delta_time;
                self.heading = turn_toward(self.heading, direction, max_step);
            }
        } else if let Some(direction) = self.return_heading {
            let max_step = self.config.angular_speed.to_radians() * delta_time;
            self.heading = turn_toward(self.heading, direction, max_step);
            if self.heading.dot(direction) > 1.0 - 1e-6 {
                self.heading = direction;
                self.return_heading = None;
            }
        }
    }
}

fn flatten(v: Vec3) -> Option<Vec3> {
    Vec3::new(v.x, 0.0, v.z).try_normalize()
}

/// Rotate a horizontal direction about `+Y` by at most `max_step` radians
fn turn_toward(current: Vec3, target: Vec3, max_step: f32) -> Vec3 {
    let current_yaw = current.x.atan2(current.z);
    let target_yaw = target.x.atan2(target.z);
    let mut delta = target_yaw - current_yaw;
    while delta > std::f32::consts::PI {
        delta -= std::f32::consts::TAU;
    }
    while delta < -std::f32::consts::PI {
        delta += std::f32::consts::TAU;
    }
    let yaw = current_yaw + delta.clamp(-max_step, max_step);
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::StraightLineNavigator;
    use crate::world::{Name, Position, Visitor, WalkableBounds, Waypoint, WaypointGroup};

    struct Fixture {
        world: World,
        visitor: Entity,
        a: Entity,
        b: Entity,
    }

    fn fixture() -> Fixture {
        let mut world = World::new();
        let visitor = world.spawn((Name::new("visitor"), Position(Vec3::new(20.0, 0.0, 0.0)), Visitor));
        let a = world.spawn((Name::new("A"), Position(Vec3::new(10.0, 0.0, 0.0))));
        let b = world.spawn((Name::new("B"), Position(Vec3::new(10.0, 0.0, 10.0))));
        Fixture {
            world,
            visitor,
            a,
            b,
        }
    }

    fn controller(visitor: Entity) -> MovementController {
        let navigator = StraightLineNavigator::new(Vec3::ZERO, WalkableBounds::default());
        MovementController::new(
            Box::new(navigator),
            MovementConfig::default(),
            1.7,
            Vec3::ZERO,
            visitor,
        )
        .with_seed(7)
    }

    fn tick_until(
        controller: &mut MovementController,
        world: &World,
        done: impl Fn(&MovementController) -> bool,
    ) {
        for _ in 0..2000 {
            controller.tick(world, 0.1);
            if done(controller) {
                return;
            }
        }
        panic!("condition never reached");
    }

    #[test]
    fn test_commands_apply_immediately_outside_goto() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.patrol();
        assert_eq!(mc.state(), MovementState::Patrol);
        mc.follow_visitor();
        assert_eq!(mc.state(), MovementState::Follow);
        mc.idle();
        assert_eq!(mc.state(), MovementState::Idle);
        assert_eq!(mc.queue_len(), 0);
    }

    #[test]
    fn test_commands_deferred_in_goto() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.walk_to(&f.world, f.a);
        assert_eq!(mc.state(), MovementState::GotoTarget);

        mc.patrol();
        mc.follow_visitor();
        mc.walk_to(&f.world, f.b);
        assert_eq!(mc.state(), MovementState::GotoTarget);
        assert!(mc.is_queue_locked());

        let queued: Vec<_> = mc.queued().map(|e| e.state).collect();
        assert_eq!(
            queued,
            vec![
                MovementState::Patrol,
                MovementState::Follow,
                MovementState::GotoTarget
            ]
        );
    }

    #[test]
    fn test_one_entry_consumed_per_arrival() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.walk_to(&f.world, f.a);
        mc.walk_to(&f.world, f.b);
        mc.idle();
        mc.patrol();

        tick_until(&mut mc, &f.world, |mc| mc.queue_len() < 3);
        assert_eq!(mc.state(), MovementState::GotoTarget);
        assert_eq!(mc.queue_len(), 2);
        assert_eq!(mc.navigator().destination(), Vec3::new(10.0, 0.0, 10.0));

        tick_until(&mut mc, &f.world, |mc| mc.queue_len() < 2);
        assert_eq!(mc.state(), MovementState::Idle);
        assert_eq!(mc.queue_len(), 1);
        assert!(mc.is_queue_locked());
    }

    #[test]
    fn test_goto_speed_by_distance() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.walk_to(&f.world, f.a);
        mc.tick(&f.world, 0.0);
        assert_eq!(mc.intent(), LocomotionIntent::Run);
        assert_eq!(mc.navigator().speed(), 4.5);

        mc.navigator_mut().set_speed(1.0);
        mc.navigator_mut().advance(6.0);
        mc.tick(&f.world, 0.0);
        assert_eq!(mc.intent(), LocomotionIntent::Walk);
        assert_eq!(mc.navigator().speed(), 0.8);
    }

    #[test]
    fn test_walk_to_missing_entity_is_noop() {
        let mut f = fixture();
        let mut mc = controller(f.visitor);

        f.world.despawn(f.a).unwrap();
        mc.walk_to(&f.world, f.a);
        assert_eq!(mc.state(), MovementState::Idle);
        assert_eq!(mc.queue_len(), 0);
    }

    #[test]
    fn test_walk_to_location() {
        let mut f = fixture();
        f.world.spawn((
            Name::new("Night Watch"),
            Position(Vec3::new(-5.0, 0.0, 3.0)),
            Waypoint(WaypointGroup::Painting),
        ));
        let mut mc = controller(f.visitor);

        assert!(!mc.walk_to_location(&f.world, "Mona Lisa"));
        assert_eq!(mc.state(), MovementState::Idle);

        assert!(mc.walk_to_location(&f.world, "Night Watch"));
        assert_eq!(mc.state(), MovementState::GotoTarget);
        assert_eq!(mc.navigator().destination(), Vec3::new(-5.0, 0.0, 3.0));
    }

    #[test]
    fn test_follow_intents() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.follow_visitor();
        mc.tick(&f.world, 0.0);
        assert_eq!(mc.intent(), LocomotionIntent::Run);
        assert_eq!(mc.navigator().destination(), Vec3::new(20.0, 0.0, 0.0));

        f.world.get::<&mut Position>(f.visitor).unwrap().0 = Vec3::new(4.0, 0.0, 0.0);
        mc.tick(&f.world, 0.0);
        assert_eq!(mc.intent(), LocomotionIntent::Walk);
        assert_eq!(mc.navigator().speed(), 1.5);

        f.world.get::<&mut Position>(f.visitor).unwrap().0 = Vec3::new(2.0, 0.0, 0.0);
        mc.tick(&f.world, 0.0);
        assert_eq!(mc.intent(), LocomotionIntent::Idle);
    }

    #[test]
    fn test_patrol_picks_point_near_anchor() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.patrol();
        mc.tick(&f.world, 0.0);
        let destination = mc.navigator().destination();
        assert!(destination.length() <= 50.0 + 1e-3);
        assert_eq!(mc.intent(), LocomotionIntent::Walk);
    }

    #[test]
    fn test_patrol_retries_when_no_walkable_point() {
        let f = fixture();
        let navigator = StraightLineNavigator::new(
            Vec3::ZERO,
            WalkableBounds {
                min: Vec3::new(-1.0, 0.0, -1.0),
                max: Vec3::new(1.0, 0.0, 1.0),
            },
        );
        let mut mc = MovementController::new(
            Box::new(navigator),
            MovementConfig::default(),
            1.7,
            Vec3::new(500.0, 0.0, 500.0),
            f.visitor,
        )
        .with_seed(3);

        mc.patrol();
        mc.tick(&f.world, 0.1);
        assert_eq!(mc.state(), MovementState::Patrol);
        assert_eq!(mc.intent(), LocomotionIntent::Idle);
        assert_eq!(mc.navigator().destination(), Vec3::ZERO);
    }

    #[test]
    fn test_face_visitor_freezes_and_restores_goto() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.walk_to(&f.world, f.a);
        mc.enable_face_visitor();
        assert_eq!(mc.state(), MovementState::Idle);
        assert_eq!(mc.navigator().remaining_distance(), 0.0);

        mc.disable_face_visitor();
        assert_eq!(mc.state(), MovementState::GotoTarget);
        assert_eq!(mc.navigator().destination(), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_face_visitor_restore_skipped_after_newer_command() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.patrol();
        mc.enable_face_visitor();
        assert_eq!(mc.state(), MovementState::Idle);

        mc.follow_visitor();
        mc.disable_face_visitor();
        assert_eq!(mc.state(), MovementState::Follow);
    }

    #[test]
    fn test_restored_walk_keeps_its_deferred_commands() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.walk_to(&f.world, f.a);
        mc.patrol();
        mc.enable_face_visitor();
        assert_eq!(mc.queue_len(), 0);

        mc.disable_face_visitor();
        assert_eq!(mc.state(), MovementState::GotoTarget);
        let queued: Vec<_> = mc.queued().map(|e| e.state).collect();
        assert_eq!(queued, vec![MovementState::Patrol]);
    }

    #[test]
    fn test_superseded_walk_drops_its_deferred_commands() {
        let mut f = fixture();
        let c = f.world.spawn((Name::new("C"), Position(Vec3::new(-10.0, 0.0, 0.0))));
        let d = f.world.spawn((Name::new("D"), Position(Vec3::new(-10.0, 0.0, -10.0))));
        let mut mc = controller(f.visitor);

        mc.walk_to(&f.world, f.a);
        mc.idle();
        mc.enable_face_visitor();
        mc.follow_visitor();
        mc.disable_face_visitor();
        assert_eq!(mc.state(), MovementState::Follow);
        assert_eq!(mc.queue_len(), 0);

        mc.idle();
        mc.walk_to(&f.world, c);
        mc.walk_to(&f.world, d);
        assert_eq!(mc.queue_len(), 1);

        tick_until(&mut mc, &f.world, |mc| mc.queue_len() == 0);
        assert_eq!(mc.state(), MovementState::GotoTarget);
        assert_eq!(mc.navigator().destination(), Vec3::new(-10.0, 0.0, -10.0));

        tick_until(&mut mc, &f.world, |mc| mc.navigator().has_arrived());
        assert!(mc.position().distance(Vec3::new(-10.0, 0.0, -10.0)) <= 0.5 + 1e-3);
    }

    #[test]
    fn test_immediate_command_discards_leftover_queue() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.walk_to(&f.world, f.a);
        mc.idle();
        mc.patrol();
        tick_until(&mut mc, &f.world, |mc| mc.state() == MovementState::Idle);
        assert_eq!(mc.queue_len(), 1);

        mc.follow_visitor();
        assert_eq!(mc.state(), MovementState::Follow);
        assert!(!mc.is_queue_locked());
    }

    #[test]
    fn test_heading_restored_after_conversation() {
        let f = fixture();
        let mut mc = controller(f.visitor);
        assert_eq!(mc.heading(), Vec3::Z);

        mc.enable_face_visitor();
        mc.late_tick(&f.world, &GazeObservation::default(), 0.1);
        assert!((mc.heading() - Vec3::X).length() < 1e-5);

        mc.disable_face_visitor();
        mc.late_tick(&f.world, &GazeObservation::default(), 0.25);
        let expected = Vec3::new(45.0_f32.to_radians().sin(), 0.0, 45.0_f32.to_radians().cos());
        assert!((mc.heading() - expected).length() < 1e-4);

        mc.late_tick(&f.world, &GazeObservation::default(), 1.0);
        assert_eq!(mc.heading(), Vec3::Z);
    }

    #[test]
    fn test_late_tick_facing() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.late_tick(&f.world, &GazeObservation::default(), 0.1);
        assert_eq!(mc.facing(), FacingTargets::default());

        f.world.get::<&mut Position>(f.visitor).unwrap().0 = Vec3::new(2.0, 0.0, 0.0);
        mc.late_tick(&f.world, &GazeObservation::default(), 0.1);
        assert_eq!(mc.facing().head, Some(Vec3::new(2.0, 1.7, 0.0)));
        assert_eq!(mc.facing().body, None);

        mc.enable_face_visitor();
        mc.late_tick(&f.world, &GazeObservation::default(), 0.1);
        assert_eq!(mc.facing().body, Some(Vec3::new(2.0, 0.0, 0.0)));

        let gaze = GazeObservation {
            valid: true,
            object_of_interest: Some(f.b),
        };
        mc.late_tick(&f.world, &gaze, 0.1);
        assert_eq!(mc.facing().body, Some(Vec3::new(10.0, 0.0, 10.0)));
        assert_eq!(mc.facing().head, Some(Vec3::new(10.0, 0.0, 10.0)));
        assert!((mc.heading() - Vec3::new(1.0, 0.0, 1.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn test_heading_turns_at_angular_speed() {
        let f = fixture();
        let mut mc = controller(f.visitor);

        mc.walk_to(&f.world, f.a);
        mc.late_tick(&f.world, &GazeObservation::default(), 0.25);
        let expected = Vec3::new(45.0_f32.to_radians().sin(), 0.0, 45.0_f32.to_radians().cos());
        assert!((mc.heading() - expected).length() < 1e-4);

        mc.late_tick(&f.world, &GazeObservation::default(), 1.0);
        assert!((mc.heading() - Vec3::X).length() < 1e-4);
    }
}
