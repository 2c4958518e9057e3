//! Shared utilities and common types for the Guard Manager backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Content hashing for stored uploads
//! - Password hashing with Argon2id
//! - JWT issuance and verification
//! - Common field validation

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
