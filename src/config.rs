use std::env;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Relay configuration, read once at startup. The API key may be absent;
/// that is a per-request failure, not a startup failure.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let api_key = env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_base =
            env::var("GEMINI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        RelayConfig {
            port,
            api_key,
            model,
            api_base,
        }
    }
}
