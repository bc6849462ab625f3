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

use clap::Parser;
use docent_assistant::assistant::AssistantServices;
use docent_assistant::config::{Arguments, Configuration};
use docent_assistant::dialogue::{DialogueClient, SpeechSink};
use docent_assistant::emotion::HttpEmotionClassifier;
use docent_assistant::events::EventKind;
use docent_assistant::music::HttpMusicService;
use docent_assistant::tts::TtsClient;
use docent_assistant::world::SceneDescription;
use docent_assistant::Assistant;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);

/// Speech sink used when the synthesizer is unreachable
struct LoggedSpeech;

impl SpeechSink for LoggedSpeech {
    fn speak(&self, text: &str) {
        tracing::info!("ASSISTANT: {}", text);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(true)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            tracing::debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        tracing::debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    let config = Configuration::load(&arguments.config_file)?;
    tracing::debug!("Configuration loaded: {:?}", config);

    let scene = SceneDescription::load(&config.scene.path)?;
    tracing::info!("Starting Docent assistant in '{}'", scene.name);

    let (dialogue, inbound) = DialogueClient::connect(&config.dialogue).await?;
    let speech: Arc<dyn SpeechSink> = match TtsClient::connect(&config.tts).await {
        Ok(tts) => Arc::new(tts),
        Err(e) => {
            tracing::warn!("Speech synthesis unavailable, logging speech instead: {}", e);
            Arc::new(LoggedSpeech)
        }
    };

    let services = AssistantServices {
        dialogue: Arc::new(dialogue),
        inbound,
        speech,
        classifier: Arc::new(HttpEmotionClassifier::new(&config.classifier)?),
        music: Arc::new(HttpMusicService::new(&config.music)?),
    };
    let mut assistant = Assistant::new(&config, &scene, services)?;
    assistant.bus().subscribe(|event| match event.kind() {
        EventKind::MovementStateChanged | EventKind::VisibilityChanged => {
            tracing::debug!("Event: {:?}", event)
        }
        _ => tracing::info!("Event: {:?}", event),
    });
    assistant.start();

    // Each line typed on stdin is treated as visitor speech
    let (speech_tx, mut speech_rx) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            let line = line.trim().to_string();
            if !line.is_empty() && speech_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut interval = tokio::time::interval(FRAME);
    let mut last = tokio::time::Instant::now();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            Some(text) = speech_rx.recv() => assistant.visitor_speech(&text),
            now = interval.tick() => {
                let delta_time = now.duration_since(last).as_secs_f32();
                last = now;
                assistant.tick(delta_time);
            }
        }
    }

    assistant.stop_analysis();
    Ok(())
}
