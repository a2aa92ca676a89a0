//! Cryptographic Utilities

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Compare two secrets in time independent of where they differ
///
/// Both sides are hashed first so the comparison length does not leak the
/// secret's length either.
pub fn secrets_match(candidate: &str, expected: &str) -> bool {
    constant_time_eq(&sha256(candidate.as_bytes()), &sha256(expected.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        // SHA-256 of empty string
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);

        let hash = sha256(b"flag{test}");
        assert_eq!(hash.len(), 32);
        assert_ne!(hash, sha256(b"flag{Test}"));
    }

    #[test]
    fn test_constant_time_eq() {
        let a = [1u8, 2, 3, 4];
        let b = [1u8, 2, 3, 4];
        let c = [1u8, 2, 3, 5];
        assert!(constant_time_eq(&a, &b));
        assert!(!constant_time_eq(&a, &c));
        assert!(!constant_time_eq(&a, &c[..3]));
    }

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("flag{s3cr3t}", "flag{s3cr3t}"));
        assert!(!secrets_match("flag{s3cr3t}", "flag{s3cr3t} "));
        assert!(!secrets_match("", "flag{s3cr3t}"));
    }
}
