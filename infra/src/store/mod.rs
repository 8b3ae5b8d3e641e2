//! In-process passcode stores

pub mod memory;

pub use memory::MemoryOtpStore;
