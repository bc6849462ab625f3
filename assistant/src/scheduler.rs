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

//! Periodic task scheduling driven by frame time

/// Most times a single task is reported due in one frame
pub const MAX_CATCH_UP: usize = 8;

#[derive(Debug, Clone)]
struct ScheduledTask<K> {
    key: K,
    update_interval: f32,
    time_since_update: f32,
}

impl<K> ScheduledTask<K> {
    fn update_timer(&mut self, delta_time: f32) {
        self.time_since_update += delta_time;
    }

    fn should_update(&self) -> bool {
        self.time_since_update >= self.update_interval
    }

    fn mark_updated(&mut self) {
        self.time_since_update -= self.update_interval;
    }
}

/// Named periodic tasks advanced by elapsed time
///
/// The scheduler only reports which tasks are due; the owner runs them. A
/// frame that spans several periods reports the task once per period, up to
/// [`MAX_CATCH_UP`] times. Any backlog beyond that is dropped.
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    tasks: Vec<ScheduledTask<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<K: Copy + PartialEq + std::fmt::Debug> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` to fire every `interval` seconds, replacing any
    /// existing registration. Non-positive intervals are rejected.
    pub fn register(&mut self, key: K, interval: f32) -> bool {
        if !(interval > 0.0 && interval.is_finite()) {
            tracing::warn!("Refusing to schedule {:?} with interval {}", key, interval);
            return false;
        }
        self.unregister(key);
        self.tasks.push(ScheduledTask {
            key,
            update_interval: interval,
            time_since_update: 0.0,
        });
        true
    }

    pub fn unregister(&mut self, key: K) {
        self.tasks.retain(|task| task.key != key);
    }

    pub fn is_registered(&self, key: K) -> bool {
        self.tasks.iter().any(|task| task.key == key)
    }

    pub fn interval(&self, key: K) -> Option<f32> {
        self.tasks
            .iter()
            .find(|task| task.key == key)
            .map(|task| task.update_interval)
    }

    /// Advance every task by `delta_time` and return the keys that came due
    pub fn advance(&mut self, delta_time: f32) -> Vec<K> {
        let mut due = Vec::new();
        if !delta_time.is_finite() {
            tracing::warn!("Ignoring non-finite frame time {}", delta_time);
            return due;
        }

        for task in &mut self.tasks {
            task.update_timer(delta_time.max(0.0));
            let mut fired = 0;
            while task.should_update() && fired < MAX_CATCH_UP {
                due.push(task.key);
                task.mark_updated();
                fired += 1;
            }
            if task.should_update() {
                tracing::debug!("Dropping backlog for {:?} after {} runs", task.key, fired);
                task.time_since_update %= task.update_interval;
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Task {
        Fast,
        Slow,
    }

    #[test]
    fn test_fires_on_period() {
        let mut scheduler = Scheduler::new();
        scheduler.register(Task::Fast, 0.25);

        assert!(scheduler.advance(0.1).is_empty());
        assert!(scheduler.advance(0.1).is_empty());
        assert_eq!(scheduler.advance(0.1), vec![Task::Fast]);
        assert!(scheduler.advance(0.1).is_empty());
    }

    #[test]
    fn test_long_frame_fires_multiple_times() {
        let mut scheduler = Scheduler::new();
        scheduler.register(Task::Fast, 0.25);
        scheduler.register(Task::Slow, 1.0);

        let due = scheduler.advance(1.0);
        assert_eq!(due.iter().filter(|k| **k == Task::Fast).count(), 4);
        assert_eq!(due.iter().filter(|k| **k == Task::Slow).count(), 1);
    }

    #[test]
    fn test_register_replaces_and_rejects() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.register(Task::Fast, 1.0));
        assert!(scheduler.register(Task::Fast, 0.5));
        assert_eq!(scheduler.interval(Task::Fast), Some(0.5));
        assert!(!scheduler.register(Task::Slow, 0.0));
        assert!(!scheduler.register(Task::Slow, f32::NAN));
        assert!(!scheduler.register(Task::Slow, f32::INFINITY));
        assert!(!scheduler.is_registered(Task::Slow));

        scheduler.unregister(Task::Fast);
        assert!(scheduler.advance(10.0).is_empty());
    }

    #[test]
    fn test_huge_frame_is_capped() {
        let mut scheduler = Scheduler::new();
        scheduler.register(Task::Fast, 0.25);

        assert_eq!(scheduler.advance(1.0e6).len(), MAX_CATCH_UP);
        // Backlog is dropped rather than carried into the next frame
        assert!(scheduler.advance(0.1).len() <= 1);
    }

    #[test]
    fn test_non_finite_frame_is_ignored() {
        let mut scheduler = Scheduler::new();
        scheduler.register(Task::Fast, 0.25);

        assert!(scheduler.advance(f32::INFINITY).is_empty());
        assert!(scheduler.advance(f32::NAN).is_empty());
        assert!(scheduler.advance(0.1).is_empty());
        assert_eq!(scheduler.advance(0.2), vec![Task::Fast]);
    }
}
