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

//! Movement state machine
//!
//! The assistant is always in one of four movement states. Commands that
//! arrive while it is walking to a target are deferred into a FIFO queue and
//! consumed one per arrival.

mod controller;
mod state;

pub use self::controller::{FacingTargets, MovementController};
pub use self::state::{CommandQueueEntry, LocomotionIntent, MovementState};
