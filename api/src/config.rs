//! Layered configuration loading
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults and the legacy plain environment variables
//!    (`DATABASE_URL`, `SMTP_HOST`, `OTP_EXPIRY_MINUTES`, ...)
//! 2. `config/config.<environment>.toml`, if present
//! 3. `NT__`-prefixed variables, e.g. `NT__OTP__TTL_MINUTES=10`

use config::{Config, ConfigError, Environment as EnvSource, File};
use nt_shared::config::AppConfig;

/// Directory searched for environment config files
pub const CONFIG_DIR: &str = "config";

/// Load the application configuration for the current environment
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let base = AppConfig::from_env();
    let file = format!("{}/{}", CONFIG_DIR, base.environment.config_file());
    build_config(&base, Some(&file))
}

/// Layer an optional file and `NT__` overrides on top of `base`
pub fn build_config(base: &AppConfig, file: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder().add_source(Config::try_from(base)?);

    if let Some(file) = file {
        builder = builder.add_source(File::with_name(file).required(false));
    }

    builder
        .add_source(
            EnvSource::with_prefix("NT")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_shared::config::StorageBackend;

    #[test]
    fn test_defaults_round_trip_through_builder() {
        let base = AppConfig::default();
        let loaded = build_config(&base, None).unwrap();

        assert_eq!(loaded.otp.code_length, 6);
        assert_eq!(loaded.otp.ttl_minutes, 5);
        assert_eq!(loaded.server.port, base.server.port);
        assert_eq!(loaded.storage.backend, StorageBackend::Mysql);
    }

    #[test]
    fn test_missing_file_is_optional() {
        let loaded = build_config(&AppConfig::default(), Some("config/does-not-exist")).unwrap();
        assert_eq!(loaded.otp.subject, "Your OTP Code");
    }
}
