pub mod prompt;

use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::RelayConfig;
use crate::error::RelayError;

const TEMPERATURE: f32 = 0.8;
const MAX_OUTPUT_TOKENS: u32 = 512;

/// One role-tagged block of the conversational context sent upstream.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

// Response shapes. Every level of the candidate/parts path defaults to
// empty so a missing level yields zero fragments rather than a parse error.
#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

/// Thin wrapper around the Gemini generateContent endpoint. Stateless:
/// every call carries its full conversational context.
pub struct GeminiClient {
    http: Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            http: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Issue one generation call and return the extracted reply text.
    /// No retry, no relay-side timeout; any hang is bounded only by the
    /// transport's defaults.
    pub async fn generate_reply(&self, contents: Vec<Content>) -> Result<String, RelayError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RelayError::Upstream("Missing GEMINI_API_KEY. Add it to your .env file.".to_string())
        })?;

        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let payload = GenerateRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        info!("Calling Gemini model {}", self.model);
        debug!(
            "Gemini payload: {}",
            serde_json::to_string(&payload).unwrap_or_default()
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::Upstream(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Upstream(e.to_string()))?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| RelayError::Upstream(format!("Unreadable Gemini response: {e}")))?;

        if !status.is_success() {
            let message = parsed
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Gemini API request failed.".to_string());
            return Err(RelayError::Upstream(message));
        }

        let reply = extract_reply(&parsed);
        if reply.is_empty() {
            return Err(RelayError::Upstream(
                "Gemini returned an empty response.".to_string(),
            ));
        }
        Ok(reply)
    }
}

/// First candidate's fragments, concatenated in order and trimmed. A
/// missing candidate, content, or parts level contributes nothing.
fn extract_reply(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .map(|candidate| {
            candidate
                .content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::http::StatusCode;
    use actix_web::{web, App, HttpResponse, HttpServer};

    /// Serve one fixed JSON body on every path from an OS-assigned port and
    /// return the base URL. The server lives for the rest of the test.
    pub async fn spawn_stub(body: &'static str, status: StatusCode) -> String {
        let server = HttpServer::new(move || {
            App::new().default_service(web::route().to(move || async move {
                HttpResponse::build(status)
                    .content_type("application/json")
                    .body(body)
            }))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind stub upstream");
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{addr}")
    }
}
