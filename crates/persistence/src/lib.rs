//! Persistence layer for Guard Manager.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - [`PgStore`] and [`MemoryStore`], the two `WorkforceStore` backends

pub mod db;
pub mod entities;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod pg_store;
pub mod repositories;

pub use memory::MemoryStore;
pub use pg_store::PgStore;
