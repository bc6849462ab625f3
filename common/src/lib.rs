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

//! Docent Common Types and Protocols
//!
//! This crate defines the wire types exchanged between the assistant and its
//! remote collaborators:
//! - Dialogue server protocol (client and server messages)
//! - Emotion classifier result record
//! - Text-to-speech text messages

pub mod dialogue;
pub mod emotion;
pub mod tts;
