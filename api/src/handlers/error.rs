//! Mapping of domain errors and verification outcomes to HTTP responses

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use std::collections::HashMap;
use validator::ValidationErrors;

use nt_core::errors::DomainError;
use nt_core::services::otp::VerifyOutcome;

use crate::dto::ErrorResponse;

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::Notifier { .. } => StatusCode::BAD_GATEWAY,
        DomainError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::RandomnessUnavailable { .. } | DomainError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Only validation messages reach the client; everything else gets a fixed
/// message and the detail stays in the logs.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        tracing::error!(error = %error, code = error.error_code(), "Request failed");
    } else {
        tracing::warn!(error = %error, code = error.error_code(), "Request rejected");
    }

    let message = match error {
        DomainError::Validation { message } => message.clone(),
        DomainError::Notifier { .. } => "Failed to deliver OTP".to_string(),
        DomainError::StorageUnavailable { .. } => {
            "OTP storage is temporarily unavailable".to_string()
        }
        DomainError::RandomnessUnavailable { .. } | DomainError::Internal { .. } => {
            "An internal error occurred".to_string()
        }
    };

    ErrorResponse::new(error.error_code(), message).to_response(status)
}

/// Response for a non-successful verification outcome
pub fn handle_rejected_outcome(outcome: VerifyOutcome) -> HttpResponse {
    ErrorResponse::new(outcome.code(), outcome.message()).to_response(StatusCode::UNAUTHORIZED)
}

/// 400 response listing the failing fields
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let fields: HashMap<String, serde_json::Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), serde_json::json!(messages))
        })
        .collect();

    ErrorResponse::new("VALIDATION_ERROR", "Invalid request data")
        .with_details(fields)
        .to_response(StatusCode::BAD_REQUEST)
}

/// Turn malformed JSON bodies into the standard 400 error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error = %err, "Malformed request body");
    let response = ErrorResponse::new("VALIDATION_ERROR", "Malformed JSON request body")
        .to_response(StatusCode::BAD_REQUEST);
    actix_web::error::InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&DomainError::validation("bad email")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&DomainError::Notifier {
                message: "smtp down".to_string()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&DomainError::storage("db down")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&DomainError::RandomnessUnavailable {
                message: "no entropy".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejected_outcomes_are_unauthorized() {
        for outcome in [
            VerifyOutcome::NoCodeFound,
            VerifyOutcome::IncorrectCode,
            VerifyOutcome::Expired,
        ] {
            assert_eq!(handle_rejected_outcome(outcome).status(), StatusCode::UNAUTHORIZED);
        }
    }
}
