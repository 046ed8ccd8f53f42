use actix_web::{web, HttpResponse};
use chrono::Utc;

use otp_core::{DeliveryChannel, OtpStore};

use crate::dto::HealthResponse;
use crate::routes::AppState;

pub const SERVICE_NAME: &str = "dual-otp-api";

/// Handler for GET /health
pub async fn health_check<S, D>(state: web::Data<AppState<S, D>>) -> HttpResponse
where
    S: OtpStore + ?Sized + 'static,
    D: DeliveryChannel + ?Sized + 'static,
{
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.otp_service.store().backend_name().to_string(),
        timestamp: Utc::now(),
    })
}
