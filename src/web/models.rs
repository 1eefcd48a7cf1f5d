use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_CHARACTER: &str = "Neon";
pub const DEFAULT_PERSONA: &str = "cool";

/// Conversation role. Inbound role strings are coerced totally: exactly
/// "assistant" becomes `Assistant`, every other value becomes `User`, so
/// unknown roles are never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn from_wire(role: &str) -> Self {
        if role == "assistant" {
            Role::Assistant
        } else {
            Role::User
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Gemini knows only two roles: assistant turns become "model" and
    /// everything else is "user".
    pub fn gemini_role(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "model",
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Role::from_wire(&role)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_wire().to_string()
    }
}

/// One message exchange unit. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Normalized chat request. Built from the raw JSON body with field-wise
/// coercion so a malformed field never fails the whole request: history
/// entries without a string `text` are dropped, non-string optionals fall
/// back to their defaults, and the persona tag is lowercased.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<Turn>,
    pub character: String,
    pub persona: String,
}

impl ChatRequest {
    pub fn from_value(body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let history = body
            .get("history")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let text = item.get("text").and_then(Value::as_str)?;
                        let role = item.get("role").and_then(Value::as_str).unwrap_or_default();
                        Some(Turn {
                            role: Role::from_wire(role),
                            text: text.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let character = body
            .get("character")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_CHARACTER)
            .to_string();

        let persona = body
            .get("persona")
            .and_then(Value::as_str)
            .map(|p| p.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());

        ChatRequest {
            message,
            history,
            character,
            persona,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trims_message_and_defaults_optionals() {
        let request = ChatRequest::from_value(&json!({ "message": "  hello  " }));
        assert_eq!(request.message, "hello");
        assert!(request.history.is_empty());
        assert_eq!(request.character, "Neon");
        assert_eq!(request.persona, "cool");
    }

    #[test]
    fn non_string_fields_fall_back() {
        let request = ChatRequest::from_value(&json!({
            "message": 42,
            "history": "nope",
            "character": 7,
            "persona": ["x"],
        }));
        assert_eq!(request.message, "");
        assert!(request.history.is_empty());
        assert_eq!(request.character, "Neon");
        assert_eq!(request.persona, "cool");
    }

    #[test]
    fn drops_history_entries_without_string_text() {
        let request = ChatRequest::from_value(&json!({
            "message": "hi",
            "history": [
                { "role": "user", "text": "one" },
                { "role": "assistant" },
                { "role": "assistant", "text": 3 },
                "garbage",
                { "role": "assistant", "text": "two" },
            ],
        }));
        let texts: Vec<_> = request.history.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["one", "two"]);
        assert_eq!(request.history[1].role, Role::Assistant);
    }

    #[test]
    fn persona_is_lowercased() {
        let request = ChatRequest::from_value(&json!({ "message": "hi", "persona": "FUNNY" }));
        assert_eq!(request.persona, "funny");
    }

    #[test]
    fn role_coercion_is_total() {
        assert_eq!(Role::from_wire("assistant"), Role::Assistant);
        for other in ["user", "system", "model", "", "ASSISTANT"] {
            assert_eq!(Role::from_wire(other), Role::User);
        }
    }

    #[test]
    fn role_round_trips_through_serde() {
        assert_eq!(
            serde_json::to_value(Role::Assistant).unwrap(),
            json!("assistant")
        );
        let turn: Turn = serde_json::from_value(json!({ "role": "weird", "text": "x" })).unwrap();
        assert_eq!(turn.role, Role::User);
    }
}
