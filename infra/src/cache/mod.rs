//! Cache module for Redis-based passcode storage
//!
//! This module provides the Redis client with retry logic and the
//! Redis-backed passcode store built on it.

pub mod redis_client;
pub mod redis_otp_store;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use redis_otp_store::RedisOtpStore;

// Re-export commonly used types
pub use nt_shared::config::CacheConfig;
