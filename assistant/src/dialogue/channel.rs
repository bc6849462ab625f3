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

//! WebSocket transport for the dialogue and speech services

use super::DialogueSink;
use crate::config::DialogueConfig;
use crate::error::DialogueError;
use docent_common::dialogue::{ClientMessage, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

/// A text-frame WebSocket connection driven by a background task
///
/// Outbound frames are queued on an unbounded channel and written by the
/// task; inbound text frames are forwarded to the receiver returned by
/// [`WebSocketChannel::connect`]. The connection is not re-established once
/// it drops.
pub struct WebSocketChannel {
    url: String,
    outbound: mpsc::UnboundedSender<String>,
    connected: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl WebSocketChannel {
    pub async fn connect(
        url: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<String>), DialogueError> {
        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|source| DialogueError::Connect {
                url: url.to_string(),
                source,
            })?;
        tracing::info!("Connected to {}", url);

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();
        let connected = Arc::new(AtomicBool::new(true));
        let cancel = CancellationToken::new();

        let task_connected = connected.clone();
        let task_cancel = cancel.clone();
        let task_url = url.to_string();
        tokio::spawn(async move {
            let (mut write, mut read) = ws_stream.split();
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        let _ = write.send(Message::Close(None)).await;
                        break;
                    }
                    msg = read.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                if inbound_tx.send(text).is_err() {
                                    tracing::debug!("Inbound receiver for {} dropped", task_url);
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                tracing::info!("{} closed the connection", task_url);
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                tracing::error!("WebSocket error on {}: {}", task_url, e);
                                break;
                            }
                        }
                    }
                    Some(text) = outbound_rx.recv() => {
                        if let Err(e) = write.send(Message::Text(text)).await {
                            tracing::error!("Failed to write to {}: {}", task_url, e);
                            break;
                        }
                    }
                }
            }
            task_connected.store(false, Ordering::SeqCst);
        });

        Ok((
            Self {
                url: url.to_string(),
                outbound,
                connected,
                cancel,
            },
            inbound_rx,
        ))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Queue a text frame
    pub fn send_text(&self, text: String) -> Result<(), DialogueError> {
        if !self.is_connected() {
            return Err(DialogueError::Closed);
        }
        self.outbound
            .send(text)
            .map_err(|e| DialogueError::Send(e.to_string()))
    }

    pub fn close(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.cancel.cancel();
    }
}

impl Drop for WebSocketChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Connection to the dialogue server
pub struct DialogueClient {
    channel: WebSocketChannel,
}

impl DialogueClient {
    /// Connect, introduce the visitor and start decoding server messages
    pub async fn connect(
        config: &DialogueConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ServerMessage>), DialogueError> {
        let (channel, mut frames) = WebSocketChannel::connect(config.url.as_str()).await?;
        let client = Self { channel };
        client.send_message(&ClientMessage::initialize_player(
            config.username.as_str(),
        ))?;

        let (messages_tx, messages_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(frame) = frames.recv().await {
                match ServerMessage::from_json(&frame) {
                    Ok(msg) => {
                        if messages_tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("Malformed dialogue message: {} ({})", e, frame),
                }
            }
        });

        Ok((client, messages_rx))
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    pub fn send_message(&self, msg: &ClientMessage) -> Result<(), DialogueError> {
        let json = msg.to_json()?;
        tracing::debug!("Sending {}", msg.message_type);
        self.channel.send_text(json)
    }

    pub fn close(&self) {
        self.channel.close();
    }
}

impl DialogueSink for DialogueClient {
    fn send(&self, message: ClientMessage) {
        if let Err(e) = self.send_message(&message) {
            tracing::warn!("Dropping {} message: {}", message.message_type, e);
        }
    }
}
