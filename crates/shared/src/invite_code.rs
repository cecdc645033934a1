//! Invite code generation.
//!
//! Codes are drawn uniformly from `[A-Za-z0-9]` using the thread-local CSPRNG.
//! At the default length of 8 that is 62^8 (about 2.2e14) possible codes.

use rand::distributions::{Alphanumeric, DistString};

/// Default length of an invite code.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Shortest code the generator will produce.
pub const MIN_CODE_LENGTH: usize = 6;

/// Longest code the generator will produce.
pub const MAX_CODE_LENGTH: usize = 32;

/// Generate a random alphanumeric invite code of the given length.
///
/// The length is clamped to `MIN_CODE_LENGTH..=MAX_CODE_LENGTH`.
pub fn generate_invite_code(length: usize) -> String {
    let length = length.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH);
    Alphanumeric.sample_string(&mut rand::thread_rng(), length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_length() {
        let code = generate_invite_code(DEFAULT_CODE_LENGTH);
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_custom_length() {
        assert_eq!(generate_invite_code(12).len(), 12);
        assert_eq!(generate_invite_code(32).len(), 32);
    }

    #[test]
    fn test_length_is_clamped() {
        assert_eq!(generate_invite_code(0).len(), MIN_CODE_LENGTH);
        assert_eq!(generate_invite_code(500).len(), MAX_CODE_LENGTH);
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes: HashSet<String> = (0..1000)
            .map(|_| generate_invite_code(DEFAULT_CODE_LENGTH))
            .collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_uses_mixed_case() {
        // 200 codes of 8 chars: the chance of never seeing a lowercase letter is negligible
        let joined: String = (0..200)
            .map(|_| generate_invite_code(DEFAULT_CODE_LENGTH))
            .collect();
        assert!(joined.chars().any(|c| c.is_ascii_lowercase()));
        assert!(joined.chars().any(|c| c.is_ascii_uppercase()));
        assert!(joined.chars().any(|c| c.is_ascii_digit()));
    }
}
