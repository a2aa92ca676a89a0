use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Account role
///
/// Stored as the `is_admin` flag; only two levels exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    #[display("user")]
    User,
    #[display("admin")]
    Admin,
}

impl UserRole {
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    #[inline]
    pub const fn from_is_admin(is_admin: bool) -> Self {
        if is_admin {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_flag_mapping() {
        assert_eq!(UserRole::from_is_admin(true), UserRole::Admin);
        assert_eq!(UserRole::from_is_admin(false), UserRole::User);
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::User.to_string(), "user");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
