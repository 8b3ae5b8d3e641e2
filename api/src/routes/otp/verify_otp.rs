use actix_web::{web, HttpResponse};
use validator::Validate;

use nt_core::services::otp::{Notifier, OtpStore};

use super::AppState;
use crate::dto::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::{handle_domain_error, handle_rejected_outcome, handle_validation_errors};

/// Handler for POST /verify-otp
///
/// A passcode verifies at most once; on success it is consumed.
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com", "otp": "123456" }
/// ```
///
/// # Response
///
/// - 200 `{ "message": "OTP verified successfully" }`
/// - 401 with `NO_CODE_FOUND`, `INCORRECT_CODE` or `CODE_EXPIRED`
/// - 400 `VALIDATION_ERROR`, 503 `STORAGE_UNAVAILABLE`
pub async fn verify_otp<S, N>(
    state: web::Data<AppState<S, N>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    S: OtpStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    match state.otp_service.verify(&request.email, &request.otp).await {
        Ok(outcome) if outcome.is_verified() => HttpResponse::Ok().json(VerifyOtpResponse {
            message: "OTP verified successfully".to_string(),
        }),
        Ok(outcome) => handle_rejected_outcome(outcome),
        Err(e) => handle_domain_error(&e),
    }
}
