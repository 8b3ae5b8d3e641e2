//! Passcode generation from the operating system's CSPRNG

use rand::rngs::OsRng;
use rand::RngCore;

use crate::errors::{DomainError, DomainResult};

/// Produces numeric passcodes
pub trait CodeGenerator: Send + Sync {
    /// Generate a passcode of exactly `length` ASCII digits
    fn generate(&self, length: usize) -> DomainResult<String>;
}

/// Generator backed by `OsRng`
///
/// Fails with `RandomnessUnavailable` when the OS cannot supply entropy;
/// there is no fallback to a weaker source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureCodeGenerator;

impl CodeGenerator for SecureCodeGenerator {
    fn generate(&self, length: usize) -> DomainResult<String> {
        generate_digits(&mut OsRng, length)
    }
}

/// Draw `length` independent uniform digits from `rng`
///
/// Bytes >= 250 are rejected so every digit keeps probability exactly 1/10.
pub(crate) fn generate_digits<R: RngCore + ?Sized>(
    rng: &mut R,
    length: usize,
) -> DomainResult<String> {
    if length == 0 {
        return Err(DomainError::validation("Passcode length must be positive"));
    }

    let mut code = String::with_capacity(length);
    let mut buffer = [0u8; 32];

    while code.len() < length {
        rng.try_fill_bytes(&mut buffer).map_err(|e| {
            tracing::error!(error = %e, event = "randomness_unavailable", "Secure random source failed");
            DomainError::RandomnessUnavailable {
                message: e.to_string(),
            }
        })?;

        for byte in buffer.iter().copied().filter(|b| *b < 250) {
            code.push(char::from(b'0' + byte % 10));
            if code.len() == length {
                break;
            }
        }
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {}

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source offline"))
        }
    }

    /// Yields only rejected bytes until `good_after` fills, then digits
    struct SkewedRng {
        fills: usize,
        good_after: usize,
    }

    impl RngCore for SkewedRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let byte = if self.fills < self.good_after { 255 } else { 7 };
            self.fills += 1;
            dest.iter_mut().for_each(|b| *b = byte);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_code_length_and_digits() {
        let generator = SecureCodeGenerator;
        for length in [1, 4, 6, 8, 40, 100] {
            let code = generator.generate(length).unwrap();
            assert_eq!(code.len(), length);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_zero_length_is_rejected() {
        let result = SecureCodeGenerator.generate(0);
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_code_randomness() {
        let codes: HashSet<String> = (0..100)
            .map(|_| SecureCodeGenerator.generate(6).unwrap())
            .collect();
        assert!(codes.len() > 95, "Should generate mostly unique codes");
    }

    #[test]
    fn test_every_digit_appears() {
        let code = SecureCodeGenerator.generate(2000).unwrap();
        for digit in '0'..='9' {
            assert!(code.contains(digit), "digit {} never generated", digit);
        }
    }

    #[test]
    fn test_entropy_failure_is_reported() {
        let result = generate_digits(&mut BrokenRng, 6);
        match result {
            Err(DomainError::RandomnessUnavailable { message }) => {
                assert!(message.contains("entropy source offline"));
            }
            other => panic!("Expected RandomnessUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_biased_bytes_are_rejected() {
        let mut rng = SkewedRng {
            fills: 0,
            good_after: 3,
        };
        let code = generate_digits(&mut rng, 6).unwrap();
        assert_eq!(code, "777777");
        assert_eq!(rng.fills, 4);
    }
}
