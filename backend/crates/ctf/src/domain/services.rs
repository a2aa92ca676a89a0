//! Domain Services
//!
//! Pure domain logic for flag checking.

use platform::crypto::secrets_match;

use crate::domain::value_objects::Flag;

/// Compare a submitted flag with the expected one
///
/// Exact match, no trimming or case folding. Runs in constant time over
/// SHA-256 digests so neither content nor length leaks through timing.
pub fn flag_matches(submitted: &str, expected: &Flag) -> bool {
    secrets_match(submitted, expected.expose())
}
