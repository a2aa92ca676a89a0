//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and middleware.

pub mod dto;
pub mod extractor;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extractor::{Admin, CurrentUser};
pub use handlers::AuthAppState;
pub use middleware::{RateLimitState, authenticate, bearer_token, enforce_rate_limit};
pub use router::{auth_router, auth_router_generic};
