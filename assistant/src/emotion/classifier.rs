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

//! Remote emotion classification

use crate::config::ClassifierConfig;
use crate::error::ClassifierError;
use async_trait::async_trait;
use docent_common::emotion::EmotionResult;
use reqwest::multipart::{Form, Part};

/// Classifies a WAV recording into an emotion label
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, wav: Vec<u8>) -> Result<EmotionResult, ClassifierError>;
}

/// Posts recordings as multipart form data to the classification endpoint
pub struct HttpEmotionClassifier {
    url: String,
    client: reqwest::Client,
}

impl HttpEmotionClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ClassifierError::Transport)?;

        Ok(Self {
            url: config.url(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EmotionClassifier for HttpEmotionClassifier {
    async fn classify(&self, wav: Vec<u8>) -> Result<EmotionResult, ClassifierError> {
        tracing::debug!("Sending {} bytes to {}", wav.len(), self.url);

        let part = Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(ClassifierError::Transport)?;
        let form = Form::new().part("audio", part);

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(ClassifierError::Transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClassifierError::Status { status, body });
        }

        let text = response.text().await.map_err(ClassifierError::Transport)?;
        serde_json::from_str(&text).map_err(|e| ClassifierError::Parse(e.to_string()))
    }
}
