//! Short identifier generation.
//!
//! Generation is probabilistic, so callers must be prepared for collisions and
//! retry. The [`CodeGenerator`] trait lets the retry loop be driven by a
//! deterministic generator in tests.

use base64::Engine as _;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 6;

/// Path segments routed by the service itself; never usable as short identifiers.
pub const RESERVED_CODES: &[&str] = &["api", "health"];

/// Produces candidate short identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Returns a fresh candidate. Uniqueness is not guaranteed.
    fn generate(&self) -> String;
}

/// Random URL-safe generator backed by the OS entropy source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing an 8-character code.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Returns true if `code` collides with a routed path segment.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}
