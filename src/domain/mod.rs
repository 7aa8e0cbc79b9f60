//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Only records, trait definitions, membership rules and error types.

pub mod errors;
pub mod membership;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;
