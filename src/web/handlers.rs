use actix_web::error::JsonPayloadError;
use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::{json, Value};

use crate::error::RelayError;
use crate::gemini::{prompt, GeminiClient};
use crate::web::models::{ChatRequest, ChatResponse};

// Chat endpoint: coerce, validate, assemble, relay. Validation failures
// never reach the upstream call.
pub async fn chat(
    client: web::Data<GeminiClient>,
    body: web::Json<Value>,
) -> Result<HttpResponse, RelayError> {
    let request = ChatRequest::from_value(&body);

    if request.message.is_empty() {
        return Err(RelayError::InvalidRequest("Message is required.".to_string()));
    }

    info!(
        "Chat request for {} ({} persona, {} history turns)",
        request.character,
        request.persona,
        request.history.len()
    );

    let contents = prompt::build_contents(&request);
    match client.generate_reply(contents).await {
        Ok(reply) => Ok(HttpResponse::Ok().json(ChatResponse { reply })),
        Err(err) => {
            error!("Gemini call failed: {}", err);
            Err(err)
        }
    }
}

// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Catch-all for unmatched paths and methods. OPTIONS short-circuits to an
// empty success on every path so cross-origin preflight always passes;
// everything else is a 404.
pub async fn fallback(request: HttpRequest) -> Result<HttpResponse, RelayError> {
    if request.method() == Method::OPTIONS {
        return Ok(HttpResponse::NoContent().finish());
    }
    Err(RelayError::NotFound)
}

/// Map JSON body failures onto the transport error variant: an oversized
/// body aborts the read with a fixed message, anything else surfaces the
/// parse failure text.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let relay_error = match &err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            RelayError::Transport("Request body is too large.".to_string())
        }
        _ => RelayError::Transport(err.to_string()),
    };
    relay_error.into()
}
