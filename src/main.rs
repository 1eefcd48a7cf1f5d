use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use log::{info, warn};

use neon_chat::config::RelayConfig;
use neon_chat::gemini::GeminiClient;
use neon_chat::web::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = RelayConfig::from_env();
    if config.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; chat requests will fail until it is configured");
    }
    info!(
        "Starting chat relay for model {} on http://127.0.0.1:{}",
        config.model, config.port
    );

    let client = Data::new(GeminiClient::new(&config));
    let port = config.port;

    HttpServer::new(move || {
        App::new()
            .app_data(client.clone())
            .wrap(routes::cors_headers())
            .configure(routes::configure)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
