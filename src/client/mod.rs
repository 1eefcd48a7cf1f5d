pub mod store;

use std::time::Duration;

use anyhow::{anyhow, Result};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::web::models::{Role, Turn};

/// Turns sent to the relay per call: the most recent window of the
/// in-memory conversation, including the just-submitted user turn.
pub const HISTORY_WINDOW: usize = 14;

/// Fixed line dropped into the transcript when a send fails, so the
/// conversation can continue. The raw error is surfaced separately.
pub const FALLBACK_LINE: &str = "Connection got noisy. Try sending that again.";

const MIN_TYPING_DELAY_MS: u64 = 500;
const MAX_TYPING_DELAY_MS: u64 = 1900;
const TYPING_DELAY_JITTER_MS: u64 = 450;
const MS_PER_CHAR: u64 = 28;

pub fn starter_line(character: &str) -> &'static str {
    match character {
        "Echo" => "Echo connected. Talk to me like you mean it. What is on your mind?",
        "Nova" => "Nova in the channel. Give me one thing you want help with right now.",
        _ => "Neon here. I am online now. Tell me what happened today.",
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    message: &'a str,
    character: &'a str,
    persona: &'a str,
    history: &'a [Turn],
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the relay's chat endpoint.
pub struct RelayClient {
    http: Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// One chat turn against the relay. Failures prefer the relay's own
    /// error text; a success with an empty reply is treated as a failure.
    pub async fn send(
        &self,
        message: &str,
        character: &str,
        persona: &str,
        history: &[Turn],
    ) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&WireRequest {
                message,
                character,
                persona,
                history,
            })
            .send()
            .await
            .map_err(|_| anyhow!("Unable to reach the chat server."))?;

        let status = response.status();
        let body: WireResponse = response
            .json()
            .await
            .map_err(|_| anyhow!("Unable to reach the chat server."))?;

        if !status.is_success() {
            return Err(anyhow!(body
                .error
                .unwrap_or_else(|| "Unable to reach the chat server.".to_string())));
        }

        let reply = body.reply.unwrap_or_default().trim().to_string();
        if reply.is_empty() {
            return Err(anyhow!("The bot replied with an empty message."));
        }
        Ok(reply)
    }
}

/// One in-memory conversation with a character. Owns the transcript and
/// the relay-facing windowing; `&mut self` on `send` keeps it single-flight.
pub struct ChatSession {
    pub character: String,
    pub persona: String,
    messages: Vec<Turn>,
    last_error: Option<String>,
}

impl ChatSession {
    pub fn new(character: impl Into<String>, persona: impl Into<String>) -> Self {
        let character = character.into();
        let messages = vec![Turn {
            role: Role::Assistant,
            text: starter_line(&character).to_string(),
        }];
        Self {
            character,
            persona: persona.into(),
            messages,
            last_error: None,
        }
    }

    pub fn messages(&self) -> &[Turn] {
        &self.messages
    }

    /// Raw error text from the most recent failed send, for diagnostics.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Reset the transcript to the character's starter line.
    pub fn clear(&mut self) {
        self.messages = vec![Turn {
            role: Role::Assistant,
            text: starter_line(&self.character).to_string(),
        }];
        self.last_error = None;
    }

    /// The history window sent with each relay call.
    pub fn window(&self) -> &[Turn] {
        let start = self.messages.len().saturating_sub(HISTORY_WINDOW);
        &self.messages[start..]
    }

    /// Submit one user turn. The user turn lands in the transcript either
    /// way; a failure records the raw error and appends the fallback line
    /// instead of a reply. Never retries.
    pub async fn send(&mut self, relay: &RelayClient, draft: &str) -> Result<String> {
        let text = draft.trim();
        if text.is_empty() {
            return Err(anyhow!("Message is required."));
        }

        self.last_error = None;
        self.messages.push(Turn {
            role: Role::User,
            text: text.to_string(),
        });

        let outcome = relay
            .send(text, &self.character, &self.persona, self.window())
            .await;

        match outcome {
            Ok(reply) => {
                self.messages.push(Turn {
                    role: Role::Assistant,
                    text: reply.clone(),
                });
                Ok(reply)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                self.messages.push(Turn {
                    role: Role::Assistant,
                    text: FALLBACK_LINE.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Visible "typing" pause derived from message length with a little
    /// jitter, clamped to a bounded range. UX pacing only.
    pub fn typing_delay(text: &str) -> Duration {
        let jitter = rand::thread_rng().gen_range(0..TYPING_DELAY_JITTER_MS);
        let ms = (text.len() as u64 * MS_PER_CHAR + jitter)
            .clamp(MIN_TYPING_DELAY_MS, MAX_TYPING_DELAY_MS);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    use crate::gemini::test_support::spawn_stub;

    #[test]
    fn session_opens_with_the_character_starter_line() {
        let session = ChatSession::new("Echo", "cool");
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::Assistant);
        assert!(session.messages()[0].text.starts_with("Echo connected."));

        // Unknown characters fall back to Neon's line.
        let session = ChatSession::new("Zero", "cool");
        assert!(session.messages()[0].text.starts_with("Neon here."));
    }

    #[test]
    fn window_keeps_only_the_most_recent_turns() {
        let mut session = ChatSession::new("Neon", "cool");
        for i in 0..30 {
            session.messages.push(Turn {
                role: Role::User,
                text: format!("m{i}"),
            });
        }

        let window = session.window();
        assert_eq!(window.len(), HISTORY_WINDOW);
        assert_eq!(window.last().unwrap().text, "m29");
        assert_eq!(window.first().unwrap().text, "m16");
    }

    #[test]
    fn typing_delay_is_clamped() {
        for _ in 0..20 {
            assert_eq!(ChatSession::typing_delay(""), Duration::from_millis(500));
            assert_eq!(
                ChatSession::typing_delay(&"x".repeat(500)),
                Duration::from_millis(1900)
            );
        }
    }

    #[tokio::test]
    async fn empty_draft_is_rejected_locally() {
        let relay = RelayClient::new("http://127.0.0.1:9/api/chat");
        let mut session = ChatSession::new("Echo", "cool");

        assert!(session.send(&relay, "   ").await.is_err());
        assert_eq!(session.messages().len(), 1);
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn failed_send_appends_the_fallback_line() {
        let relay = RelayClient::new("http://127.0.0.1:9/api/chat");
        let mut session = ChatSession::new("Neon", "cool");

        let result = session.send(&relay, "hello").await;
        assert!(result.is_err());
        assert_eq!(session.last_error(), Some("Unable to reach the chat server."));

        let messages = session.messages();
        assert_eq!(messages[messages.len() - 2].text, "hello");
        assert_eq!(messages[messages.len() - 2].role, Role::User);
        assert_eq!(messages.last().unwrap().text, FALLBACK_LINE);
        assert_eq!(messages.last().unwrap().role, Role::Assistant);
    }

    #[actix_web::test]
    async fn successful_send_appends_the_reply() {
        let base = spawn_stub(r#"{"reply":"sure thing"}"#, StatusCode::OK).await;
        let relay = RelayClient::new(format!("{base}/api/chat"));
        let mut session = ChatSession::new("Nova", "funny");

        let reply = session.send(&relay, "help me out").await.unwrap();
        assert_eq!(reply, "sure thing");
        assert_eq!(session.messages().last().unwrap().text, "sure thing");
        assert!(session.last_error().is_none());
    }

    #[actix_web::test]
    async fn relay_error_body_text_is_surfaced() {
        let base = spawn_stub(r#"{"error":"boom"}"#, StatusCode::INTERNAL_SERVER_ERROR).await;
        let relay = RelayClient::new(format!("{base}/api/chat"));
        let mut session = ChatSession::new("Neon", "cool");

        let err = session.send(&relay, "hello").await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[actix_web::test]
    async fn empty_reply_from_the_relay_is_an_error() {
        let base = spawn_stub(r#"{"reply":"   "}"#, StatusCode::OK).await;
        let relay = RelayClient::new(format!("{base}/api/chat"));
        let mut session = ChatSession::new("Neon", "cool");

        let err = session.send(&relay, "hello").await.unwrap_err();
        assert_eq!(err.to_string(), "The bot replied with an empty message.");
        assert_eq!(session.messages().last().unwrap().text, FALLBACK_LINE);
    }
}
