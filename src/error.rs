use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for the relay. Every variant maps to one HTTP status
/// and serializes as `{"error": "<message>"}`; nothing is retried and no
/// failure takes the process down.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Client input failed validation (empty message).
    #[error("{0}")]
    InvalidRequest(String),

    /// The upstream call failed, returned a non-success status, produced an
    /// unparsable body, or yielded an empty reply. Also covers a missing
    /// API key at call time.
    #[error("{0}")]
    Upstream(String),

    /// The request body could not be read: oversized or malformed JSON.
    #[error("{0}")]
    Transport(String),

    /// No route matched.
    #[error("Not found.")]
    NotFound,
}

impl actix_web::ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) | RelayError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    #[test]
    fn variants_map_to_expected_statuses() {
        assert_eq!(
            RelayError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::Upstream("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Transport("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(RelayError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn body_is_an_error_object() {
        let response = RelayError::Upstream("rate limited".into()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "rate limited" }));
    }
}
