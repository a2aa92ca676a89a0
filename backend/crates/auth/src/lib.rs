//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Token service, authorization gate, use cases
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, extractors, middleware, router
//!
//! ## Features
//! - Registration and login with user name + password
//! - HS256 session tokens (24h) with refresh
//! - Bearer authentication that re-checks the user on every request
//! - Admin-only route guard
//! - Per-client sliding-window rate limit on auth endpoints
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Only HS256 tokens from the configured issuer are accepted
//! - Expiry enforced with no clock-skew grace

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{AuthGate, AuthServices, TokenService};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::claims::*;
    pub use crate::domain::entity::identity::*;
    pub use crate::domain::entity::user::*;
    pub use crate::domain::value_object::{email::*, user_name::*, user_role::*};
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::domain::repository::UserRepository;
    pub use crate::infra::memory::InMemoryUserRepository as MemoryUserStore;
    pub use crate::infra::postgres::PgUserRepository as UserStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::extractor::*;
    pub use crate::presentation::middleware::*;
}
