use std::collections::HashMap;

use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};
use validator::ValidationErrors;

use otp_core::DomainError;
use otp_shared::{error_codes, ErrorResponse};

/// Map a core failure to an HTTP response
///
/// Store and internal failures become 500s with a generic message; the cause is
/// logged here and never echoed to the client.
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Validation { message } => HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::VALIDATION_ERROR,
            message.clone(),
        )),
        DomainError::Storage { message } => {
            tracing::error!(error = %message, event = "storage_failure", "OTP store failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::STORAGE_ERROR,
                "OTP storage is temporarily unavailable",
            ))
        }
        DomainError::Internal { message } => {
            tracing::error!(error = %message, event = "internal_failure", "Internal error");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "An internal error occurred",
            ))
        }
    }
}

/// 400 with one entry per invalid field
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data");

    let mut fields: HashMap<String, Vec<String>> = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        fields.insert(field.to_string(), messages);
    }
    for (field, messages) in fields {
        response = response.add_detail(field, messages);
    }

    HttpResponse::BadRequest().json(response)
}

/// Turn malformed JSON bodies into the standard 400 body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Malformed request body")
            .add_detail("body", err.to_string()),
    );
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Default service for unknown routes
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        format!("No route for {} {}", req.method(), req.path()),
    ))
}
