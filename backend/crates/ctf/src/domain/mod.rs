//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Challenge, Submission)
//! - Domain value objects (Points, Flag)
//! - Domain services (flag comparison)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
