use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Schedule overlaps existing schedule {0}")]
    ScheduleConflict(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflicting_schedule_id: Option<i64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut conflicting_schedule_id = None;

        let (status, error_code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::ScheduleConflict(id) => {
                conflicting_schedule_id = Some(id);
                (
                    StatusCode::CONFLICT,
                    "schedule_conflict",
                    format!("Guard is already scheduled during this shift (schedule {})", id),
                )
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            conflicting_schedule_id,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::ScheduleConflict {
                conflicting_schedule_id,
            } => ApiError::ScheduleConflict(conflicting_schedule_id),
            DomainError::Authentication(msg) => ApiError::Unauthorized(msg),
            DomainError::Authorization(msg) => ApiError::Forbidden(msg),
            DomainError::NotFound(entity) => ApiError::NotFound(format!("{} not found", entity)),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::ScheduleConflict(3), StatusCode::CONFLICT),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_from_domain_error() {
        assert!(matches!(
            ApiError::from(DomainError::Authentication("bad token".into())),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::Authorization("no".into())),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(DomainError::ScheduleConflict {
                conflicting_schedule_id: 9
            }),
            ApiError::ScheduleConflict(9)
        ));

        match ApiError::from(DomainError::NotFound("Location".into())) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Location not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_schedule_conflict_body_names_schedule() {
        let body = body_json(ApiError::ScheduleConflict(42).into_response()).await;
        assert_eq!(body["error"], "schedule_conflict");
        assert_eq!(body["conflictingScheduleId"], 42);
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::Internal("relation \"guards\" does not exist".into()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");
        assert!(body.get("conflictingScheduleId").is_none());
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(
            format!("{}", ApiError::ScheduleConflict(5)),
            "Schedule overlaps existing schedule 5"
        );
        assert_eq!(format!("{}", ApiError::RateLimited), "Rate limited");
    }
}
