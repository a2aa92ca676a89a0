//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod gate;
pub mod services;
pub mod sign_in;
pub mod sign_up;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use gate::{AuthGate, authorize_admin};
pub use services::AuthServices;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token::TokenService;
