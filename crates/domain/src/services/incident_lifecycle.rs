//! Incident status transitions and photo batch checks.

use crate::errors::DomainError;
use crate::models::incident::{IncidentStatus, PhotoUpload};

/// Whether moving from `from` to `to` follows the linear lifecycle.
///
/// Staying in the same state is allowed; only the next state is reachable.
pub fn is_forward_step(from: IncidentStatus, to: IncidentStatus) -> bool {
    from == to || from.next() == Some(to)
}

/// Checks a status change. With `can_override` any transition is accepted.
pub fn check_transition(
    from: IncidentStatus,
    to: IncidentStatus,
    can_override: bool,
) -> Result<(), DomainError> {
    if can_override || is_forward_step(from, to) {
        return Ok(());
    }

    Err(DomainError::Validation(format!(
        "Incident cannot move from {} to {}",
        from.as_str(),
        to.as_str()
    )))
}

/// Limits applied to an upload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoLimits {
    pub max_photos: usize,
    pub max_photo_bytes: usize,
}

impl Default for PhotoLimits {
    fn default() -> Self {
        Self {
            max_photos: 5,
            max_photo_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Validates the whole batch before any file is stored.
pub fn validate_photo_batch(photos: &[PhotoUpload], limits: &PhotoLimits) -> Result<(), DomainError> {
    if photos.len() > limits.max_photos {
        return Err(DomainError::Validation(format!(
            "At most {} photos may be attached",
            limits.max_photos
        )));
    }

    for (index, photo) in photos.iter().enumerate() {
        let is_image = photo
            .content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(DomainError::Validation(format!(
                "Photo {} is not an image",
                index + 1
            )));
        }

        if photo.bytes.is_empty() {
            return Err(DomainError::Validation(format!(
                "Photo {} is empty",
                index + 1
            )));
        }

        if photo.bytes.len() > limits.max_photo_bytes {
            return Err(DomainError::Validation(format!(
                "Photo {} exceeds the {} byte limit",
                index + 1,
                limits.max_photo_bytes
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use IncidentStatus::*;

    fn photo(content_type: &str, len: usize) -> PhotoUpload {
        PhotoUpload {
            file_name: Some("photo.jpg".to_string()),
            content_type: Some(content_type.to_string()),
            bytes: vec![0xFF; len],
        }
    }

    #[test]
    fn test_forward_steps() {
        assert!(is_forward_step(Open, Investigating));
        assert!(is_forward_step(Investigating, Resolved));
        assert!(is_forward_step(Resolved, Closed));
        assert!(is_forward_step(Open, Open));
        assert!(is_forward_step(Closed, Closed));
    }

    #[test]
    fn test_jumps_and_regressions_rejected() {
        assert!(!is_forward_step(Open, Resolved));
        assert!(!is_forward_step(Open, Closed));
        assert!(!is_forward_step(Investigating, Closed));
        assert!(!is_forward_step(Resolved, Open));
        assert!(!is_forward_step(Closed, Investigating));

        assert!(matches!(
            check_transition(Closed, Open, false),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_override_allows_any_transition() {
        assert!(check_transition(Closed, Open, true).is_ok());
        assert!(check_transition(Open, Closed, true).is_ok());
    }

    #[test]
    fn test_photo_batch_within_limits() {
        let limits = PhotoLimits::default();
        let photos = vec![photo("image/jpeg", 1024), photo("image/png", 2048)];
        assert!(validate_photo_batch(&photos, &limits).is_ok());
        assert!(validate_photo_batch(&[], &limits).is_ok());
    }

    #[test]
    fn test_photo_batch_too_many() {
        let limits = PhotoLimits::default();
        let photos: Vec<_> = (0..6).map(|_| photo("image/jpeg", 10)).collect();
        assert!(validate_photo_batch(&photos, &limits).is_err());
    }

    #[test]
    fn test_photo_batch_rejects_non_image() {
        let limits = PhotoLimits::default();
        let photos = vec![photo("image/jpeg", 10), photo("application/pdf", 10)];
        let err = validate_photo_batch(&photos, &limits).unwrap_err();
        assert_eq!(err, DomainError::Validation("Photo 2 is not an image".to_string()));

        let missing = PhotoUpload {
            file_name: None,
            content_type: None,
            bytes: vec![1],
        };
        assert!(validate_photo_batch(&[missing], &limits).is_err());
    }

    #[test]
    fn test_photo_batch_rejects_oversized() {
        let limits = PhotoLimits {
            max_photos: 5,
            max_photo_bytes: 100,
        };
        assert!(validate_photo_batch(&[photo("image/gif", 100)], &limits).is_ok());
        assert!(validate_photo_batch(&[photo("image/gif", 101)], &limits).is_err());
    }
}
