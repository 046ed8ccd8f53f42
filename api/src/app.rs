//! Application factory
//!
//! Builds the actix-web `App` for one worker: shared state, request tracing,
//! CORS, JSON limits and the route table.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use tracing_actix_web::TracingLogger;

use otp_core::{DeliveryChannel, OtpStore};
use otp_shared::AppConfig;

use crate::handlers::{json_error_handler, not_found};
use crate::middleware::create_cors;
use crate::routes::health::health_check;
use crate::routes::otp::{send_otp, verify_otp};
use crate::routes::AppState;

/// Create and configure the application with all dependencies
pub fn create_app<S, D>(
    app_state: web::Data<AppState<S, D>>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: OtpStore + ?Sized + 'static,
    D: DeliveryChannel + ?Sized + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(config.server.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // The last wrap sees requests first, so CORS answers preflights untraced
        .wrap(TracingLogger::default())
        .wrap(create_cors(&config.cors))
        .route("/health", web::get().to(health_check::<S, D>))
        .route("/send-otp", web::post().to(send_otp::<S, D>))
        .route("/verify-otp", web::post().to(verify_otp::<S, D>))
        .default_service(web::route().to(not_found))
}
