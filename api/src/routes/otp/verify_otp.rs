use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_core::{DeliveryChannel, OtpStore};

use crate::dto::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::{domain_error_response, validation_error_response};
use crate::routes::AppState;

/// Handler for POST /verify-otp
///
/// Every verification outcome is a 200; `verified` tells the client whether
/// both codes matched a live record.
///
/// ```json
/// { "mobile": "555-0100", "email": "a@x.com", "mobileOtp": "123456", "emailOtp": "654321" }
/// ```
pub async fn verify_otp<S, D>(
    state: web::Data<AppState<S, D>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    S: OtpStore + ?Sized + 'static,
    D: DeliveryChannel + ?Sized + 'static,
{
    let request = request.into_inner().trimmed();

    if let Err(errors) = request.validate() {
        let fields: Vec<String> = errors.field_errors().keys().map(|f| f.to_string()).collect();
        tracing::warn!(
            fields = ?fields,
            event = "verify_otp_rejected",
            "Invalid verify-otp request"
        );
        return validation_error_response(&errors);
    }

    let outcome = state
        .otp_service
        .verify_otp(&request.identity(), &request.mobile_otp, &request.email_otp)
        .await;

    match outcome {
        Ok(outcome) => HttpResponse::Ok().json(VerifyOtpResponse {
            verified: outcome.is_verified(),
            message: outcome.message().to_string(),
        }),
        Err(error) => domain_error_response(&error),
    }
}
