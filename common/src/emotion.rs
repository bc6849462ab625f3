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

//! Emotion classifier result record

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body returned by the emotion classification endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    /// Raw label as reported by the classifier, not yet normalized
    pub emotion: String,
    pub confidence: f32,
    /// Per-label probabilities, when the classifier reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<HashMap<String, f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_body() {
        let result: EmotionResult =
            serde_json::from_str(r#"{"emotion":"happy","confidence":0.82}"#).unwrap();
        assert_eq!(result.emotion, "happy");
        assert!((result.confidence - 0.82).abs() < f32::EPSILON);
        assert!(result.probabilities.is_none());
    }

    #[test]
    fn test_missing_confidence_is_an_error() {
        assert!(serde_json::from_str::<EmotionResult>(r#"{"emotion":"sad"}"#).is_err());
    }
}
