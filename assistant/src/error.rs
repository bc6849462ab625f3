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

//! Error types for the assistant's external boundaries
//!
//! Every failure that crosses a network, file or codec boundary is one of
//! these. Callers in the tick loop log them and degrade to a no-op.

use thiserror::Error;

/// Configuration loading failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Open(#[source] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[source] serde_yaml::Error),
}

/// Scene description loading failure
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Failed to open scene file: {0}")]
    Open(#[source] std::io::Error),

    #[error("Failed to parse scene file: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("Scene has no visitor")]
    MissingVisitor,
}

/// WAV encoding or decoding failure
#[derive(Debug, Error)]
pub enum WavError {
    #[error("WAV encoding failed: {0}")]
    Encode(#[source] hound::Error),

    #[error("WAV decoding failed: {0}")]
    Decode(#[source] hound::Error),

    #[error("Unsupported WAV format: {0}")]
    Format(String),
}

/// Emotion classification failure
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Classifier returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse classifier response: {0}")]
    Parse(String),

    #[error(transparent)]
    Encoding(#[from] WavError),
}

/// WebSocket channel failure (dialogue and TTS)
#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    #[error("Failed to send message: {0}")]
    Send(String),

    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Channel closed")]
    Closed,
}

/// Music search failure
#[derive(Debug, Error)]
pub enum MusicError {
    #[error("Music search request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Music search returned {0}")]
    Status(u16),

    #[error("Failed to parse music search response: {0}")]
    Parse(String),
}

/// Rejected multi-stage action message
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Token {0} is already registered")]
    Duplicate(String),

    #[error("Token {0} is not registered")]
    UnknownToken(String),

    #[error("Token {token} belongs to {expected}, not {actual}")]
    ActionMismatch {
        token: String,
        expected: String,
        actual: String,
    },

    #[error("Stage {stage} for token {token} does not advance past {current}")]
    StaleStage { token: String, stage: u32, current: u32 },
}

#[derive(Debug, Error)]
pub enum TtsError {
    #[error(transparent)]
    Channel(#[from] DialogueError),

    #[error("Invalid text cleaning pattern: {0}")]
    Pattern(#[from] regex::Error),
}
