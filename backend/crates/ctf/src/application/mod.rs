//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod admin;
pub mod browse;
pub mod config;
pub mod leaderboard;
pub mod manage_challenge;
pub mod services;
pub mod submit_flag;

// Re-exports
pub use admin::{Dashboard, DashboardUseCase, ListUsersUseCase, RecentSubmission};
pub use browse::{GetChallengeUseCase, ListChallengesUseCase};
pub use config::CtfConfig;
pub use leaderboard::{LeaderboardEntry, LeaderboardUseCase};
pub use manage_challenge::{
    CreateChallengeInput, CreateChallengeUseCase, DeleteChallengeUseCase, UpdateChallengeInput,
    UpdateChallengeUseCase,
};
pub use services::CtfServices;
pub use submit_flag::{SubmitFlagInput, SubmitFlagOutput, SubmitFlagUseCase};
