use crate::gemini::{Content, Part};
use crate::web::models::ChatRequest;

const CONCISENESS_DIRECTIVE: &str =
    "Keep responses conversational and concise unless asked for detail.";

/// Fixed tone table. Anything outside it gets the "cool" text.
pub fn persona_instruction(persona: &str) -> &'static str {
    match persona {
        "spicy" => "Use a bold, teasing, high-energy tone with sharp lines but do not be rude.",
        "funny" => "Use a playful, witty tone with light humor.",
        "nonchalant" => "Use a detached, minimal, nonchalant tone with short responses.",
        _ => "Use a calm, confident, smooth tone. Keep it chill and clear.",
    }
}

/// Assemble the full conversational context for one generation call:
/// a leading character/persona instruction block, the surviving history
/// turns in their original order, then the current message. Deterministic,
/// and the sole source of context — the relay keeps no session memory.
pub fn build_contents(request: &ChatRequest) -> Vec<Content> {
    let mut contents = Vec::with_capacity(request.history.len() + 2);

    contents.push(Content {
        role: "user",
        parts: vec![Part {
            text: format!(
                "You are roleplaying as {} in a cyberpunk chat app. {} {}",
                request.character,
                persona_instruction(&request.persona),
                CONCISENESS_DIRECTIVE,
            ),
        }],
    });

    for turn in &request.history {
        contents.push(Content {
            role: turn.role.gemini_role(),
            parts: vec![Part {
                text: turn.text.clone(),
            }],
        });
    }

    contents.push(Content {
        role: "user",
        parts: vec![Part {
            text: request.message.clone(),
        }],
    });

    contents
}
