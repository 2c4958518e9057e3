//! Domain error taxonomy.

use thiserror::Error;

use crate::store::StoreError;

/// Errors produced by domain rules and service operations.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Schedule overlaps existing schedule {conflicting_schedule_id}")]
    ScheduleConflict { conflicting_schedule_id: i64 },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Access denied: {0}")]
    Authorization(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => {
                DomainError::Conflict(format!("A record with this {} already exists", field))
            }
            StoreError::MissingReference(entity) => DomainError::NotFound(entity),
            StoreError::ScheduleConflict(id) => DomainError::ScheduleConflict {
                conflicting_schedule_id: id,
            },
            StoreError::Conflict(message) => DomainError::Conflict(message),
            StoreError::NotFound(entity) => DomainError::NotFound(entity),
            StoreError::Backend(message) => DomainError::Internal(message),
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();

        DomainError::Validation(messages.join(", "))
    }
}
