//! Entity Module

pub mod claims;
pub mod identity;
pub mod user;
