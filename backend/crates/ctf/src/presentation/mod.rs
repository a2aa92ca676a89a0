//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, and router.

pub mod dto;
pub mod extractor;
pub mod handlers;
pub mod router;

pub use extractor::ClientIp;
pub use handlers::CtfAppState;
pub use router::{ctf_router, ctf_router_generic};
