use actix_web::{web, HttpResponse};
use validator::Validate;

use nt_core::services::otp::{Notifier, OtpStore};
use nt_shared::email::mask_email;

use super::AppState;
use crate::dto::{SendOtpRequest, SendOtpResponse};
use crate::handlers::{handle_domain_error, handle_validation_errors};

/// Handler for POST /send-otp
///
/// Issues a fresh passcode for the address and mails it, replacing any
/// passcode still pending for that address.
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "message": "OTP sent", "expires_at": "2025-01-01T12:05:00Z" }
/// ```
///
/// ## Errors
/// - 400 `VALIDATION_ERROR` for a malformed body or address
/// - 502 `NOTIFIER_ERROR` when the passcode was stored but mail failed
/// - 503 `STORAGE_UNAVAILABLE`
/// - 500 `RANDOMNESS_UNAVAILABLE`
pub async fn send_otp<S, N>(
    state: web::Data<AppState<S, N>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse
where
    S: OtpStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        tracing::warn!(
            email = %mask_email(&request.email),
            "Validation failed for send_otp request"
        );
        return handle_validation_errors(&errors);
    }

    match state.otp_service.issue(&request.email).await {
        Ok(receipt) => HttpResponse::Ok().json(SendOtpResponse {
            message: "OTP sent".to_string(),
            expires_at: receipt.record.expires_at,
        }),
        Err(e) => handle_domain_error(&e),
    }
}
