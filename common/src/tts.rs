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

//! Text-to-speech signaling messages

use serde::{Deserialize, Serialize};

/// Text to synthesize, sent over the TTS signaling socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub voice: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            kind: "text_message".to_string(),
            text: text.into(),
            voice: voice.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_json() {
        let json = serde_json::to_string(&TextMessage::new("Hello there", "dan")).unwrap();
        assert_eq!(
            json,
            r#"{"type":"text_message","text":"Hello there","voice":"dan"}"#
        );
    }
}
