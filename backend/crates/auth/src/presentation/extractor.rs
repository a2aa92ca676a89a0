//! Identity Extractors
//!
//! Handlers receive the request identity as a typed argument instead of
//! reading request extensions themselves.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::entity::identity::{AdminUser, AuthenticatedUser};
use crate::error::AuthError;

/// Identity set by the authenticate middleware
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Identity that passed the admin guard
#[derive(Debug, Clone)]
pub struct Admin(pub AdminUser);

impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(admin) = parts.extensions.get::<AdminUser>() {
            return Ok(Admin(admin.clone()));
        }
        if parts.extensions.get::<AuthenticatedUser>().is_some() {
            Err(AuthError::InsufficientPrivilege)
        } else {
            Err(AuthError::Unauthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use kernel::id::UserId;

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let (mut parts, ()) = Request::builder().uri("/").body(()).unwrap().into_parts();
        if let Some(user) = user {
            if let Ok(admin) = AdminUser::try_from(user.clone()) {
                parts.extensions.insert(admin);
            }
            parts.extensions.insert(user);
        }
        parts
    }

    fn user(is_admin: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: UserId::new(7),
            user_name: "erin".into(),
            is_admin,
        }
    }

    #[tokio::test]
    async fn test_admin_without_identity_is_unauthenticated() {
        let mut parts = parts_with(None);
        let err = Admin::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
        assert_eq!(err.status_code().as_u16(), 401);
        assert_eq!(err.code(), "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_admin_for_plain_user_is_forbidden() {
        let mut parts = parts_with(Some(user(false)));
        let err = Admin::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AuthError::InsufficientPrivilege));
        assert_eq!(err.status_code().as_u16(), 403);
    }

    #[tokio::test]
    async fn test_admin_and_current_user_extracted() {
        let mut parts = parts_with(Some(user(true)));
        let Admin(admin) = Admin::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(admin.user_id(), UserId::new(7));

        let CurrentUser(current) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(current.user_name, "erin");
    }

    #[tokio::test]
    async fn test_current_user_missing_is_unauthenticated() {
        let mut parts = parts_with(None);
        assert!(matches!(
            CurrentUser::from_request_parts(&mut parts, &()).await,
            Err(AuthError::Unauthenticated)
        ));
    }
}
