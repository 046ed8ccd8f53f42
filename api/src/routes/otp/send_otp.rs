use actix_web::{web, HttpResponse};
use validator::Validate;

use otp_core::{DeliveryChannel, OtpStore, SEND_SUCCESS_MESSAGE};

use crate::dto::{SendOtpRequest, SendOtpResponse};
use crate::handlers::{domain_error_response, validation_error_response};
use crate::routes::AppState;

/// Handler for POST /send-otp
///
/// Issues a fresh mobile code and email code for the identity pair, replacing
/// any codes still pending for it.
///
/// # Request Body
///
/// ```json
/// { "mobile": "555-0100", "email": "a@x.com" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "success": true, "message": "OTPs generated and sent." }
/// ```
///
/// ## Errors
/// - 400 when a field fails validation
/// - 500 when the store is unavailable
pub async fn send_otp<S, D>(
    state: web::Data<AppState<S, D>>,
    request: web::Json<SendOtpRequest>,
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
            event = "send_otp_rejected",
            "Invalid send-otp request"
        );
        return validation_error_response(&errors);
    }

    match state.otp_service.send_otp(&request.identity()).await {
        Ok(_) => HttpResponse::Ok().json(SendOtpResponse {
            success: true,
            message: SEND_SUCCESS_MESSAGE.to_string(),
        }),
        Err(error) => domain_error_response(&error),
    }
}
