//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Injectable time source
//! - Sliding-window rate limiting
//! - Client address extraction
//! - Cryptographic utilities (SHA-256, constant-time comparison)
//! - Password hashing (Argon2id)

pub mod client;
pub mod clock;
pub mod crypto;
pub mod password;
pub mod rate_limit;
