use actix_web::middleware::DefaultHeaders;
use actix_web::web;

use crate::web::handlers;

/// Incoming bodies above this many bytes abort the read.
pub const MAX_BODY_BYTES: usize = 1_000_000;

/// Permissive CORS on every response, error responses included.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
}

/// Route table. Each resource and scope falls back to the shared handler so
/// an unmatched method lands on the same OPTIONS/404 logic as an unmatched
/// path.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(handlers::json_error_handler),
    )
    .service(
        web::scope("/api")
            .service(
                web::resource("/chat")
                    .route(web::post().to(handlers::chat))
                    .default_service(web::route().to(handlers::fallback)),
            )
            .default_service(web::route().to(handlers::fallback)),
    )
    .service(
        web::resource("/health")
            .route(web::get().to(handlers::health_check))
            .default_service(web::route().to(handlers::fallback)),
    )
    .default_service(web::route().to(handlers::fallback));
}
