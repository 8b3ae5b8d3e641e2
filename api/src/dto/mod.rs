//! Request and response bodies

pub mod error_dto;
pub mod otp_dto;

pub use error_dto::ErrorResponse;
pub use otp_dto::{SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse};
