//! HTTP route handlers

pub mod otp;
