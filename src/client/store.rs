use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::web::models::{Role, Turn};

const MAX_TITLE_CHARS: usize = 24;

/// One saved conversation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedChat {
    pub id: String,
    pub title: String,
    pub character: String,
    pub persona: String,
    #[serde(default)]
    pub image: String,
    pub created_at: u64,
    pub messages: Vec<Turn>,
}

impl SavedChat {
    /// Snapshot the current transcript. The title comes from the first
    /// user message, truncated, or falls back to the character name.
    pub fn snapshot(character: &str, persona: &str, image: &str, messages: &[Turn]) -> Self {
        let first_user = messages
            .iter()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.text.as_str())
            .unwrap_or("");
        let base = if first_user.is_empty() {
            format!("{character} chat")
        } else {
            first_user.to_string()
        };

        SavedChat {
            id: format!("saved-{}", Uuid::new_v4()),
            title: truncate_title(&base),
            character: character.to_string(),
            persona: persona.to_string(),
            image: image.to_string(),
            created_at: unix_millis(),
            messages: messages.to_vec(),
        }
    }
}

fn truncate_title(base: &str) -> String {
    if base.chars().count() > MAX_TITLE_CHARS {
        let cut: String = base.chars().take(MAX_TITLE_CHARS).collect();
        format!("{cut}...")
    } else {
        base.to_string()
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Wholesale persistence for the saved-chat list: one JSON file holding the
/// full ordered list, newest first. Every mutation is an explicit
/// read-modify-write of the whole file, last writer wins; a missing or
/// unparsable file reads as an empty list.
pub struct SavedChatStore {
    path: PathBuf,
}

impl SavedChatStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "neon-chat")
            .map(|dirs| dirs.data_dir().join("saved-chats.json"))
            .unwrap_or_else(|| PathBuf::from("saved-chats.json"))
    }

    pub fn load(&self) -> Vec<SavedChat> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    pub fn push(&self, chat: SavedChat) -> Result<()> {
        let mut chats = self.load();
        chats.insert(0, chat);
        self.write_all(&chats)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let mut chats = self.load();
        chats.retain(|chat| chat.id != id);
        self.write_all(&chats)
    }

    pub fn clear(&self) -> Result<()> {
        self.write_all(&[])
    }

    fn write_all(&self, chats: &[SavedChat]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let raw = serde_json::to_string_pretty(chats)?;
        fs::write(&self.path, raw).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
