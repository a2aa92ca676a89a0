//! Domain Value Objects
//!
//! Immutable value types for the CTF domain.

use std::fmt;

/// Points awarded for solving a challenge; always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Points(i32);

impl Points {
    pub const MIN: i32 = 1;

    pub fn new(value: i32) -> Option<Self> {
        (value >= Self::MIN).then_some(Self(value))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Expected flag of a challenge
///
/// Never serialised and redacted in `Debug`; compare with
/// [`crate::domain::services::flag_matches`].
#[derive(Clone, PartialEq, Eq)]
pub struct Flag(String);

impl Flag {
    /// Rejects empty and whitespace-only flags
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        (!value.trim().is_empty()).then_some(Self(value))
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Flag(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_minimum() {
        assert!(Points::new(0).is_none());
        assert!(Points::new(-5).is_none());
        assert_eq!(Points::new(1).map(|p| p.value()), Some(1));
        assert_eq!(Points::new(500).map(|p| p.value()), Some(500));
    }

    #[test]
    fn test_flag_rejects_blank() {
        assert!(Flag::new("").is_none());
        assert!(Flag::new("   ").is_none());
        assert_eq!(Flag::new("CTF{x}").unwrap().expose(), "CTF{x}");
    }

    #[test]
    fn test_flag_debug_redacted() {
        let flag = Flag::new("CTF{secret}").unwrap();
        assert!(!format!("{flag:?}").contains("secret"));
    }
}
