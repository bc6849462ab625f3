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

//! Background music search and playback queue
//!
//! A visitor's request is turned into a playlist search. The outcome comes
//! back to the tick loop as [`MusicFeedback`] so the dialogue server can be
//! told whether anything was found.

use crate::config::MusicConfig;
use crate::error::MusicError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Playlist returned by the search endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Playlist {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tracks: Vec<String>,
}

/// Result of a music request, correlated by action token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicFeedback {
    pub token: String,
    pub found: bool,
    pub query: String,
    pub tracks: Vec<String>,
}

#[async_trait]
pub trait MusicService: Send + Sync {
    async fn search(&self, query: &str) -> Result<Playlist, MusicError>;
}

/// Strip the word "music" from a request so only the genre or mood is searched
pub fn search_query(request: &str) -> String {
    request.replace("music", "").replace("Music", "").trim().to_string()
}

pub struct HttpMusicService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpMusicService {
    pub fn new(config: &MusicConfig) -> Result<Self, MusicError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(MusicError::Transport)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Download location of a track id
    pub fn track_url(&self, id: &str) -> String {
        format!("{}/files/track/download/mp3/{}", self.base_url, id)
    }
}

#[async_trait]
impl MusicService for HttpMusicService {
    async fn search(&self, query: &str) -> Result<Playlist, MusicError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/playlist/create/nosave", self.base_url),
            &[("input", query)],
        )
        .map_err(|e| MusicError::Parse(e.to_string()))?;

        tracing::debug!("Searching music: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(MusicError::Transport)?;

        if !response.status().is_success() {
            return Err(MusicError::Status(response.status().as_u16()));
        }

        let text = response.text().await.map_err(MusicError::Transport)?;
        serde_json::from_str(&text).map_err(|e| MusicError::Parse(e.to_string()))
    }
}

/// Tracks the playback queue and runs searches in the background
///
/// Audio output belongs to the host, which reports the end of each track
/// through [`MusicPlayer::track_finished`].
pub struct MusicPlayer {
    service: Arc<dyn MusicService>,
    feedback: mpsc::UnboundedSender<MusicFeedback>,
    queue: VecDeque<String>,
    current: Option<String>,
}

impl MusicPlayer {
    pub fn new(
        service: Arc<dyn MusicService>,
        feedback: mpsc::UnboundedSender<MusicFeedback>,
    ) -> Self {
        Self {
            service,
            feedback,
            queue: VecDeque::new(),
            current: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_track(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Tracks waiting behind the current one
    pub fn queued_tracks(&self) -> impl Iterator<Item = &String> {
        self.queue.iter()
    }

    /// Start a search for `request` on the runtime
    ///
    /// Failures are reported as feedback with `found = false`.
    pub fn request(&self, request: &str, token: &str) {
        let service = self.service.clone();
        let sender = self.feedback.clone();
        let query = search_query(request);
        let token = token.to_string();

        tokio::spawn(async move {
            let tracks = match service.search(&query).await {
                Ok(playlist) => playlist.tracks,
                Err(e) => {
                    tracing::warn!("Music search for '{}' failed: {}", query, e);
                    Vec::new()
                }
            };
            let feedback = MusicFeedback {
                token,
                found: !tracks.is_empty(),
                query,
                tracks,
            };
            if sender.send(feedback).is_err() {
                tracing::debug!("Music feedback dropped, receiver is gone");
            }
        });
    }

    /// Queue the tracks of a completed search, starting one if idle
    pub fn accept(&mut self, feedback: &MusicFeedback) {
        self.queue.extend(feedback.tracks.iter().cloned());
        if self.current.is_none() {
            self.current = self.queue.pop_front();
            if let Some(track) = &self.current {
                tracing::info!("Playing '{}', {} more queued", track, self.queue.len());
            }
        }
    }

    /// Move on after the current track ended; returns the track now playing
    pub fn track_finished(&mut self) -> Option<&str> {
        if self.current.is_none() {
            return None;
        }
        self.current = self.queue.pop_front();
        match &self.current {
            Some(track) => tracing::debug!("Next track '{}'", track),
            None => tracing::info!("Playlist finished"),
        }
        self.current.as_deref()
    }

    pub fn stop(&mut self) {
        self.queue.clear();
        if self.current.take().is_some() {
            tracing::info!("Music stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FixedService(Result<Vec<String>, u16>);

    #[async_trait]
    impl MusicService for FixedService {
        async fn search(&self, _query: &str) -> Result<Playlist, MusicError> {
            match &self.0 {
                Ok(tracks) => Ok(Playlist {
                    tracks: tracks.clone(),
                    ..Default::default()
                }),
                Err(status) => Err(MusicError::Status(*status)),
            }
        }
    }

    #[test]
    fn test_search_query_strips_music() {
        assert_eq!(search_query("jazz music"), "jazz");
        assert_eq!(search_query("Music for relaxing"), "for relaxing");
    }

    #[tokio::test]
    async fn test_http_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/playlist/create/nosave"))
            .and(query_param("input", "baroque"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Baroque",
                "type": "playlist",
                "tracks": ["a1", "b2"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpMusicService::new(&MusicConfig {
            base_url: server.uri().into(),
        })
        .unwrap();
        let playlist = service.search("baroque").await.unwrap();
        assert_eq!(playlist.tracks, vec!["a1", "b2"]);
        assert_eq!(
            service.track_url("a1"),
            format!("{}/files/track/download/mp3/a1", server.uri())
        );
    }

    #[tokio::test]
    async fn test_http_search_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let service = HttpMusicService::new(&MusicConfig {
            base_url: server.uri().into(),
        })
        .unwrap();
        assert!(matches!(
            service.search("anything").await,
            Err(MusicError::Status(404))
        ));
    }

    #[tokio::test]
    async fn test_request_reports_found() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut player = MusicPlayer::new(
            Arc::new(FixedService(Ok(vec!["t1".to_string()]))),
            tx,
        );

        player.request("calm music", "tok-1");
        let feedback = rx.recv().await.unwrap();
        assert_eq!(feedback.token, "tok-1");
        assert_eq!(feedback.query, "calm");
        assert!(feedback.found);

        player.accept(&feedback);
        assert!(player.is_playing());
        assert_eq!(player.current_track(), Some("t1"));
        assert_eq!(player.queued_tracks().count(), 0);
    }

    #[test]
    fn test_playing_clears_when_playlist_ends() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut player = MusicPlayer::new(Arc::new(FixedService(Ok(Vec::new()))), tx);
        player.accept(&MusicFeedback {
            token: "t".into(),
            found: true,
            query: "q".into(),
            tracks: vec!["x".into(), "y".into()],
        });
        assert_eq!(player.current_track(), Some("x"));

        assert_eq!(player.track_finished(), Some("y"));
        assert!(player.is_playing());
        assert_eq!(player.track_finished(), None);
        assert!(!player.is_playing());
        assert_eq!(player.track_finished(), None);

        // A later search starts playing again
        player.accept(&MusicFeedback {
            token: "u".into(),
            found: true,
            query: "q".into(),
            tracks: vec!["z".into()],
        });
        assert_eq!(player.current_track(), Some("z"));
    }

    #[tokio::test]
    async fn test_request_failure_reports_not_found() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut player = MusicPlayer::new(Arc::new(FixedService(Err(500))), tx);

        player.request("polka", "tok-2");
        let feedback = rx.recv().await.unwrap();
        assert!(!feedback.found);
        player.accept(&feedback);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_stop_clears_queue() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut player = MusicPlayer::new(Arc::new(FixedService(Ok(Vec::new()))), tx);
        player.accept(&MusicFeedback {
            token: "t".into(),
            found: true,
            query: "q".into(),
            tracks: vec!["x".into(), "y".into()],
        });
        player.stop();
        assert!(!player.is_playing());
        assert_eq!(player.queued_tracks().count(), 0);
    }
}
