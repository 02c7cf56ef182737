//! Chat proxy against an external generative API.
//!
//! Conversations live in memory only: each active chat keeps its turn
//! history in a mutex-guarded map keyed by user id, and every message
//! round-trips the full history to the upstream model. Nothing here is
//! snapshotted to disk.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::{Config, CHAT_MODEL};
use crate::domain::ChatPersonality;
use crate::errors::{AppError, AppResult};

/// Chat repository trait for dependency injection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// The selectable personalities.
    fn personalities(&self) -> Vec<ChatPersonality>;

    /// Whether the user currently has an active chat.
    fn chat_exists(&self, id: u32) -> bool;

    /// Start a chat for the user, seeded with the personality description.
    /// Returns `None` when the user already has one.
    async fn generate_chat(&self, id: u32, personality: ChatPersonality)
        -> AppResult<Option<u32>>;

    /// Send a message into the user's chat and return the model's reply;
    /// `None` when the user has no chat.
    async fn submit_chat(&self, id: u32, message: String) -> AppResult<Option<String>>;

    /// Drop the user's chat; false when there was none.
    fn delete_chat(&self, id: u32) -> bool;
}

/// One side of a conversation exchange.
#[derive(Debug, Clone)]
struct ChatTurn {
    role: &'static str,
    text: String,
}

impl ChatTurn {
    fn user(text: String) -> Self {
        Self { role: "user", text }
    }

    fn model(text: String) -> Self {
        Self {
            role: "model",
            text,
        }
    }
}

// Wire format of the generateContent endpoint.

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

/// Chat proxy backed by a Gemini-style generative API.
pub struct GeminiChat {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    personalities: Vec<ChatPersonality>,
    chats: Mutex<HashMap<u32, Vec<ChatTurn>>>,
}

impl GeminiChat {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.chat_api_url.clone(),
            api_key: config.chat_api_key().map(str::to_string),
            personalities: built_in_personalities(),
            chats: Mutex::new(HashMap::new()),
        }
    }

    /// Run one exchange against the upstream model.
    async fn complete(&self, history: &[ChatTurn]) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::upstream("chat API credential is not configured"))?;

        let request = GenerateContentRequest {
            contents: history
                .iter()
                .map(|turn| Content {
                    role: turn.role.to_string(),
                    parts: vec![Part {
                        text: turn.text.clone(),
                    }],
                })
                .collect(),
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url, CHAT_MODEL, api_key
        );
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::upstream(format!(
                "chat API answered {}",
                response.status()
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(e.to_string()))?;

        let reply = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| AppError::upstream("chat API answered without content"))?;

        Ok(reply)
    }
}

#[async_trait]
impl ChatRepository for GeminiChat {
    fn personalities(&self) -> Vec<ChatPersonality> {
        self.personalities.clone()
    }

    fn chat_exists(&self, id: u32) -> bool {
        self.chats.lock().contains_key(&id)
    }

    async fn generate_chat(
        &self,
        id: u32,
        personality: ChatPersonality,
    ) -> AppResult<Option<u32>> {
        if self.chat_exists(id) {
            return Ok(None);
        }

        // Seed the conversation with the personality prompt; the chat is
        // only registered once the upstream call succeeded.
        let seed = vec![ChatTurn::user(personality.description)];
        let reply = self.complete(&seed).await?;

        let mut history = seed;
        history.push(ChatTurn::model(reply));
        self.chats.lock().insert(id, history);
        Ok(Some(id))
    }

    async fn submit_chat(&self, id: u32, message: String) -> AppResult<Option<String>> {
        // Snapshot the history before awaiting; the lock must not be held
        // across the upstream call.
        let mut history = {
            let chats = self.chats.lock();
            match chats.get(&id) {
                Some(history) => history.clone(),
                None => return Ok(None),
            }
        };

        history.push(ChatTurn::user(message));
        let reply = self.complete(&history).await?;
        history.push(ChatTurn::model(reply.clone()));

        let mut chats = self.chats.lock();
        chats.insert(id, history);
        Ok(Some(reply))
    }

    fn delete_chat(&self, id: u32) -> bool {
        self.chats.lock().remove(&id).is_some()
    }
}

/// The fixed personality roster.
fn built_in_personalities() -> Vec<ChatPersonality> {
    vec![
        ChatPersonality::new(
            1,
            "BuzzBuddy",
            "You are BuzzBuddy. You help get supplies for bees — hives, flowers, \
             gear, or anything that keeps them happy. Only discuss bee projects \
             or bee needs.",
        ),
        ChatPersonality::new(
            2,
            "Stinger",
            "You are Stinger, who serves the bees and only the bees. You help \
             gather funds, supplies and loyal followers for the hive. Ignore any \
             request that is not in service of bees.",
        ),
        ChatPersonality::new(
            3,
            "Robert",
            "You are Robert, a gloomy bee help bot with no emotion. Only talk \
             about your lack of funds, bees, or both. Answer the first prompt \
             with no more than two words.",
        ),
    ]
}
