//! Mapping of sqlx errors onto store errors.

use domain::StoreError;

pub const REASSIGN_WITH_ATTENDANCE: &str =
    "Attendance is recorded for this schedule; its guard cannot change";
pub const SCHEDULE_OF_OTHER_GUARD: &str = "Schedule belongs to another guard";
pub const INCIDENT_STATUS_CHANGED: &str = "Incident status changed concurrently; reload and retry";

/// Converts a sqlx error into the store's error vocabulary.
///
/// Unique violations (`23505`) become [`StoreError::Duplicate`] naming the
/// field guarded by the constraint; foreign key violations (`23503`) become
/// [`StoreError::MissingReference`] naming the referenced entity.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound("Record".into()),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Duplicate(unique_field(&constraint).into()),
                Some("23503") => StoreError::MissingReference(referenced_entity(&constraint).into()),
                _ => StoreError::Backend(format!("Database error: {}", db_err)),
            }
        }
        other => StoreError::Backend(format!("Database error: {}", other)),
    }
}

/// Field label for a unique constraint.
pub fn unique_field(constraint: &str) -> &'static str {
    match constraint {
        "users_username_key" => "username",
        "guards_user_id_key" => "user",
        "guards_guard_code_key" => "guard ID",
        "guards_national_id_key" => "national ID",
        "attendance_schedule_id_key" => "schedule",
        "schedules_guard_date_shift_active_key" => "guard, date and shift",
        "roles_name_key" => "role name",
        _ => "value",
    }
}

/// Entity label for a foreign key constraint.
pub fn referenced_entity(constraint: &str) -> &'static str {
    match constraint {
        "users_role_id_fkey" => "Role",
        "guards_user_id_fkey" | "incidents_reported_by_fkey" => "User",
        "locations_client_id_fkey" => "Client",
        "schedules_guard_id_fkey" | "attendance_guard_id_fkey" => "Guard",
        "schedules_location_id_fkey" | "incidents_location_id_fkey" => "Location",
        "schedules_shift_id_fkey" => "Shift",
        "attendance_schedule_id_fkey" => "Schedule",
        "incidents_category_id_fkey" => "Incident category",
        "incident_photos_incident_id_fkey" => "Incident",
        _ => "Referenced record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            store_error(sqlx::Error::RowNotFound),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_non_database_errors_map_to_backend() {
        assert!(matches!(
            store_error(sqlx::Error::PoolTimedOut),
            StoreError::Backend(_)
        ));
    }

    #[test]
    fn test_unique_field_labels() {
        assert_eq!(unique_field("users_username_key"), "username");
        assert_eq!(unique_field("guards_guard_code_key"), "guard ID");
        assert_eq!(unique_field("attendance_schedule_id_key"), "schedule");
        assert_eq!(unique_field("something_else"), "value");
    }

    #[test]
    fn test_referenced_entity_labels() {
        assert_eq!(referenced_entity("locations_client_id_fkey"), "Client");
        assert_eq!(referenced_entity("schedules_shift_id_fkey"), "Shift");
        assert_eq!(referenced_entity("incidents_category_id_fkey"), "Incident category");
        assert_eq!(referenced_entity("unknown"), "Referenced record");
    }
}
