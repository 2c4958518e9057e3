//! Domain layer for the Guard Manager backend.
//!
//! This crate contains:
//! - Domain models (guards, clients, locations, shifts, schedules, attendance, incidents)
//! - Business rules (access policy, schedule overlap, incident lifecycle, dashboard aggregation)
//! - Storage abstractions implemented by the persistence crate
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
pub mod store;

pub use errors::DomainError;
pub use store::{PhotoStore, StoreError, StoreResult, StoredPhoto, WorkforceStore};
