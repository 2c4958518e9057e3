//! Incident report extractor.
//!
//! Reports arrive as `multipart/form-data` (text fields plus `photos` files)
//! or as a plain JSON body without photos.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use domain::models::incident::{CreateIncidentRequest, IncidentPriority, PhotoUpload};
use std::str::FromStr;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

/// Form field carrying photo files.
pub const PHOTOS_FIELD: &str = "photos";

/// A parsed incident report and its attached photos.
#[derive(Debug)]
pub struct IncidentForm {
    pub request: CreateIncidentRequest,
    pub photos: Vec<PhotoUpload>,
}

#[async_trait]
impl FromRequest<AppState> for IncidentForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let ApiJson(request) = ApiJson::<CreateIncidentRequest>::from_request(req, state).await?;
            return Ok(IncidentForm {
                request,
                photos: Vec::new(),
            });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;
        read_multipart(multipart, state.config.uploads.max_photos).await
    }
}

async fn read_multipart(mut multipart: Multipart, max_photos: usize) -> Result<IncidentForm, ApiError> {
    let mut request = CreateIncidentRequest::default();
    let mut photos = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == PHOTOS_FIELD {
            // Stop reading as soon as the batch is known to be too large.
            if photos.len() >= max_photos {
                return Err(ApiError::Validation(format!(
                    "At most {} photos may be attached",
                    max_photos
                )));
            }
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            photos.push(PhotoUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;
        apply_text_field(&mut request, &name, value.trim())?;
    }

    Ok(IncidentForm { request, photos })
}

/// Copies one text field into the request. Unknown fields, including any
/// reporter the client supplies, are ignored.
fn apply_text_field(
    request: &mut CreateIncidentRequest,
    name: &str,
    value: &str,
) -> Result<(), ApiError> {
    match name {
        "title" => request.title = value.to_string(),
        "description" => request.description = value.to_string(),
        "locationId" => request.location_id = parse_optional(name, value)?,
        "categoryId" => request.category_id = parse_optional(name, value)?,
        "latitude" => request.latitude = parse_optional(name, value)?,
        "longitude" => request.longitude = parse_optional(name, value)?,
        "priority" => {
            request.priority = if value.is_empty() {
                None
            } else {
                Some(IncidentPriority::from_str(value).map_err(ApiError::Validation)?)
            }
        }
        "date" => {
            request.date = if value.is_empty() {
                None
            } else {
                Some(parse_report_date(value).ok_or_else(|| {
                    ApiError::Validation(format!("Invalid date: {}", value))
                })?)
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_optional<T: FromStr>(name: &str, value: &str) -> Result<Option<T>, ApiError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| ApiError::Validation(format!("Invalid value for {}", name)))
}

/// Accepts RFC 3339, a naive date-time (taken as UTC) or a bare date
/// (midnight UTC).
pub fn parse_report_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_report_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 22, 15, 0).unwrap();
        assert_eq!(parse_report_date("2024-03-01T22:15:00Z"), Some(expected));
        assert_eq!(parse_report_date("2024-03-01T23:15:00+01:00"), Some(expected));
        assert_eq!(parse_report_date("2024-03-01T22:15:00"), Some(expected));
        assert_eq!(parse_report_date("2024-03-01T22:15"), Some(expected));
        assert_eq!(
            parse_report_date("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_report_date("yesterday"), None);
    }

    #[test]
    fn test_text_fields_fill_request() {
        let mut request = CreateIncidentRequest::default();
        apply_text_field(&mut request, "title", "Broken window").unwrap();
        apply_text_field(&mut request, "locationId", "4").unwrap();
        apply_text_field(&mut request, "categoryId", "").unwrap();
        apply_text_field(&mut request, "priority", "high").unwrap();
        apply_text_field(&mut request, "latitude", "51.5").unwrap();
        apply_text_field(&mut request, "reportedBy", "99").unwrap();

        assert_eq!(request.title, "Broken window");
        assert_eq!(request.location_id, Some(4));
        assert_eq!(request.category_id, None);
        assert_eq!(request.priority, Some(IncidentPriority::High));
        assert_eq!(request.latitude, Some(51.5));
    }

    #[test]
    fn test_text_field_rejects_garbage() {
        let mut request = CreateIncidentRequest::default();
        assert!(matches!(
            apply_text_field(&mut request, "locationId", "north"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            apply_text_field(&mut request, "priority", "urgent"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            apply_text_field(&mut request, "date", "03/01/2024"),
            Err(ApiError::Validation(_))
        ));
    }
}
