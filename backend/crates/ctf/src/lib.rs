//! CTF (Capture The Flag) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, flag comparison, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers
//!
//! ## Rules
//! - Players only ever see active challenges, and never a flag
//! - One correct submission per user and challenge; the store enforces it
//! - Points are awarded through the auth crate's user store
//! - Flag submission is rate limited per client address

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{CtfConfig, CtfServices};
pub use error::{CtfError, CtfResult};
pub use infra::{InMemoryCtfRepository, PgCtfRepository};
pub use presentation::router::ctf_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::domain::repository::{ChallengeRepository, SubmissionRepository};
    pub use crate::infra::memory::InMemoryCtfRepository as MemoryCtfStore;
    pub use crate::infra::postgres::PgCtfRepository as CtfStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

#[cfg(test)]
mod tests;
