//! Passcode table schema

/// Name of the passcode table
pub const OTP_TABLE: &str = "otp_codes";

/// DDL for the passcode table; one row per identity
pub const OTP_CODES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS otp_codes (
    identity VARCHAR(320) NOT NULL,
    code VARCHAR(16) NOT NULL,
    issued_at DATETIME(6) NOT NULL,
    expires_at DATETIME(6) NOT NULL,
    PRIMARY KEY (identity),
    INDEX idx_otp_codes_expires_at (expires_at)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin
"#;
