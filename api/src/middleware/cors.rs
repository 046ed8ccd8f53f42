//! CORS middleware configuration for browser clients
//!
//! Outside production any origin may call the API unless `ALLOWED_ORIGINS`
//! narrows it. Production only accepts the configured origins.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use otp_shared::CorsConfig;

/// Build the CORS middleware for the configured policy
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::info!("CORS: accepting any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            tracing::info!(origin = %origin, "CORS: adding allowed origin");
            cors = cors.allowed_origin(origin);
        }
    }

    // Credentials cannot be combined with a wildcard origin
    if config.allow_credentials && !config.allows_any_origin() {
        cors = cors.supports_credentials();
    }

    cors
}
