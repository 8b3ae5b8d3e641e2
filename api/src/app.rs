//! Application factory
//!
//! Builds the Actix-web application around an already-constructed passcode
//! service, so the binary and the tests share one routing table.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use nt_core::services::otp::{Notifier, OtpStore};

use crate::dto::ErrorResponse;
use crate::handlers::json_error_handler;
use crate::routes::otp::{send_otp, verify_otp, AppState};

/// Default limit for JSON request bodies in bytes
pub const DEFAULT_JSON_LIMIT: usize = 16 * 1024;

/// Create and configure the application with all dependencies
pub fn create_app<S, N>(
    app_state: web::Data<AppState<S, N>>,
    json_limit: usize,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: OtpStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(json_limit)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .wrap(Logger::default())
        .route("/health", web::get().to(health_check::<S, N>))
        .route("/send-otp", web::post().to(send_otp::<S, N>))
        .route("/verify-otp", web::post().to(verify_otp::<S, N>))
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
///
/// Reports 503 while the passcode store is unreachable.
async fn health_check<S, N>(state: web::Data<AppState<S, N>>) -> HttpResponse
where
    S: OtpStore + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    let (mut response, status, storage) = match state.otp_service.health_check().await {
        Ok(()) => (HttpResponse::Ok(), "healthy", "up"),
        Err(_) => (HttpResponse::ServiceUnavailable(), "unhealthy", "down"),
    };

    response.json(serde_json::json!({
        "status": status,
        "storage": storage,
        "service": "notification-otp",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "NOT_FOUND",
        "The requested resource was not found",
    ))
}
