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

//! Speech synthesis client
//!
//! Dialogue text may carry stage directions (`*smiles*`) and markup tags.
//! Only the non-verbal sound tags the synthesizer can voice are kept.

use crate::config::TtsConfig;
use crate::dialogue::{SpeechSink, WebSocketChannel};
use crate::error::TtsError;
use docent_common::tts::TextMessage;
use regex::{Captures, Regex};

/// Tags the synthesizer renders as sounds
pub const VOICED_TAGS: [&str; 8] = [
    "laugh", "chuckle", "sigh", "cough", "sniffle", "groan", "yawn", "gasp",
];

pub struct TextCleaner {
    stage_directions: Regex,
    tags: Regex,
    space_before_comma: Regex,
    repeated_space: Regex,
}

impl TextCleaner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            stage_directions: Regex::new(r"\*.*?\*")?,
            tags: Regex::new(r"<([^>]*)>")?,
            space_before_comma: Regex::new(r"\s+,")?,
            repeated_space: Regex::new(r"\s\s+")?,
        })
    }

    pub fn clean(&self, text: &str) -> String {
        let text = self.stage_directions.replace_all(text, "");
        let text = self.tags.replace_all(&text, |caps: &Captures| {
            if VOICED_TAGS.contains(&&caps[1]) {
                caps[0].to_string()
            } else {
                String::new()
            }
        });
        let text = self.space_before_comma.replace_all(&text, ",");
        let text = self.repeated_space.replace_all(&text, " ");
        text.trim().to_string()
    }
}

/// WebSocket connection to the speech synthesizer
pub struct TtsClient {
    channel: WebSocketChannel,
    voice: String,
    cleaner: TextCleaner,
}

impl TtsClient {
    pub async fn connect(config: &TtsConfig) -> Result<Self, TtsError> {
        let cleaner = TextCleaner::new()?;
        let (channel, mut frames) = WebSocketChannel::connect(config.url.as_str()).await?;
        tokio::spawn(async move {
            while let Some(frame) = frames.recv().await {
                tracing::trace!("Speech service: {}", frame);
            }
        });

        Ok(Self {
            channel,
            voice: config.voice.clone(),
            cleaner,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    pub fn send_text(&self, text: &str) -> Result<(), TtsError> {
        let cleaned = self.cleaner.clean(text);
        if cleaned.is_empty() {
            tracing::debug!("Nothing to speak after cleaning '{}'", text);
            return Ok(());
        }
        let json = serde_json::to_string(&TextMessage::new(cleaned, self.voice.clone()))
            .map_err(crate::error::DialogueError::from)?;
        self.channel.send_text(json)?;
        Ok(())
    }
}

impl SpeechSink for TtsClient {
    fn speak(&self, text: &str) {
        if let Err(e) = self.send_text(text) {
            tracing::warn!("Dropping speech: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    fn clean(text: &str) -> String {
        TextCleaner::new().unwrap().clean(text)
    }

    #[test]
    fn test_strips_stage_directions() {
        assert_eq!(clean("*smiles* Hello there!"), "Hello there!");
        assert_eq!(clean("Well *pauses* , yes."), "Well, yes.");
    }

    #[test]
    fn test_keeps_voiced_tags_only() {
        assert_eq!(clean("Oh <laugh> that is funny"), "Oh <laugh> that is funny");
        assert_eq!(clean("<b>Look</b> here <sigh>"), "Look here <sigh>");
        assert_eq!(clean("<emphasis>Wow</emphasis>"), "Wow");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean("  This   is \n\n a   test ,  ok  "), "This is a test, ok");
        assert_eq!(clean("*only a direction*"), "");
    }

    #[tokio::test]
    async fn test_sends_cleaned_text_message() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let frame = ws.next().await.unwrap().unwrap();
            serde_json::from_str::<TextMessage>(frame.to_text().unwrap()).unwrap()
        });

        let client = TtsClient::connect(&TtsConfig {
            url: url.into(),
            voice: "dan".to_string(),
        })
        .await
        .unwrap();
        client.speak("*bows*");
        client.speak("Welcome <chuckle> to the  gallery.");

        let received = server.await.unwrap();
        assert_eq!(received, TextMessage::new("Welcome <chuckle> to the gallery.", "dan"));
    }
}
