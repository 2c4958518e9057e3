//! Dashboard aggregation rules.
//!
//! The store gathers raw facts; these functions turn them into the views the
//! dashboard serves. Nothing here is cached.

use chrono::{DateTime, Utc};

use crate::models::dashboard::{
    ActivityItem, ActivityType, DashboardCounts, DashboardStats, GuardLocationStatus,
    LocationFacts, LocationSnapshot, StaffFacts, StaffPerformance, UpcomingShift,
    UpcomingShiftFacts,
};
use crate::models::incident::Incident;

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 5;
pub const DEFAULT_PERFORMANCE_LIMIT: i64 = 5;
pub const DEFAULT_UPCOMING_LIMIT: i64 = 3;
pub const DEFAULT_MAP_LIMIT: i64 = 5;
pub const MAX_LIMIT: i64 = 50;

/// Days ahead (inclusive) covered by the upcoming shifts view.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

const DEFAULT_POSITION: &str = "Guard";

/// Clamps a requested limit to `1..=MAX_LIMIT`, using `default` when absent.
pub fn effective_limit(requested: Option<i64>, default: i64) -> i64 {
    requested.unwrap_or(default).clamp(1, MAX_LIMIT)
}

/// Percentage of on-time rows; `0.0` when there are no rows.
pub fn attendance_rate(on_time: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    100.0 * on_time as f64 / total as f64
}

pub fn build_stats(counts: &DashboardCounts) -> DashboardStats {
    DashboardStats {
        total_guards: counts.total_guards,
        active_clients: counts.active_clients,
        pending_reports: counts.open_incidents,
        attendance_rate: attendance_rate(counts.attendance_on_time, counts.attendance_total),
    }
}

pub fn build_staff_performance(facts: Vec<StaffFacts>) -> Vec<StaffPerformance> {
    facts
        .into_iter()
        .map(|f| {
            let position = if f.guard.position.trim().is_empty() {
                DEFAULT_POSITION.to_string()
            } else {
                f.guard.position.clone()
            };

            StaffPerformance {
                id: f.guard.id,
                name: f.name.display(),
                guard_id: f.guard.guard_code.clone(),
                position,
                location: f.last_location,
                attendance_rate: attendance_rate(f.attendance_on_time, f.attendance_total),
                incidents_reported: f.incidents_reported,
                performance: f.guard.performance,
            }
        })
        .collect()
}

pub fn build_upcoming_shifts(facts: Vec<UpcomingShiftFacts>) -> Vec<UpcomingShift> {
    facts
        .into_iter()
        .map(|f| UpcomingShift {
            schedule_id: f.schedule_id,
            date: f.date,
            location: f.location_name,
            shift: f.shift_name,
            start_time: f.start_time,
            end_time: f.end_time,
            guard_name: f.guard.display(),
        })
        .collect()
}

/// An unresolved incident outranks a late check-in.
pub fn location_status(has_unresolved_incident: bool, has_late_check_in: bool) -> GuardLocationStatus {
    if has_unresolved_incident {
        GuardLocationStatus::IncidentReported
    } else if has_late_check_in {
        GuardLocationStatus::LateCheckIn
    } else {
        GuardLocationStatus::OnDuty
    }
}

pub fn build_location_snapshot(facts: Vec<LocationFacts>) -> Vec<LocationSnapshot> {
    facts
        .into_iter()
        .map(|f| LocationSnapshot {
            id: f.location_id,
            name: f.name,
            latitude: f.latitude,
            longitude: f.longitude,
            status: location_status(f.has_unresolved_incident, f.has_late_check_in),
            guard_name: f.guard_on_site.map(|name| name.display()),
        })
        .collect()
}

/// Human-readable age such as "5 minutes ago".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();

    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }

    plural(elapsed.num_days(), "day")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

pub fn build_activity(incidents: Vec<Incident>, now: DateTime<Utc>) -> Vec<ActivityItem> {
    incidents
        .into_iter()
        .map(|incident| ActivityItem {
            id: incident.id,
            activity_type: ActivityType::Incident,
            time_ago: time_ago(incident.created_at, now),
            time: incident.created_at,
            title: incident.title,
            description: incident.description,
            status: incident.status,
            priority: incident.priority,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dashboard::PersonName;
    use crate::models::guard::{Guard, GuardStatus};
    use crate::models::incident::{IncidentPriority, IncidentStatus};
    use chrono::{Duration, NaiveDate, NaiveTime};
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;

    fn guard(id: i64, position: &str, performance: f64) -> Guard {
        let now = Utc::now();
        Guard {
            id,
            user_id: id + 100,
            guard_code: format!("G-2024-{:03}", id),
            national_id: format!("NID{}", id),
            date_of_birth: None,
            address: None,
            emergency_contact: None,
            join_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            position: position.to_string(),
            status: GuardStatus::Active,
            performance,
            created_at: now,
            updated_at: now,
        }
    }

    fn random_name() -> PersonName {
        PersonName {
            first_name: Some(FirstName().fake()),
            last_name: Some(LastName().fake()),
            username: "user".to_string(),
        }
    }

    #[test]
    fn test_attendance_rate() {
        assert_eq!(attendance_rate(0, 0), 0.0);
        assert_eq!(attendance_rate(3, 4), 75.0);
        assert_eq!(attendance_rate(4, 4), 100.0);
        assert!((attendance_rate(2, 3) - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(None, 5), 5);
        assert_eq!(effective_limit(Some(10), 5), 10);
        assert_eq!(effective_limit(Some(0), 5), 1);
        assert_eq!(effective_limit(Some(-3), 5), 1);
        assert_eq!(effective_limit(Some(500), 5), MAX_LIMIT);
    }

    #[test]
    fn test_build_stats() {
        let stats = build_stats(&DashboardCounts {
            total_guards: 12,
            active_clients: 4,
            open_incidents: 2,
            attendance_total: 10,
            attendance_on_time: 9,
        });
        assert_eq!(stats.total_guards, 12);
        assert_eq!(stats.active_clients, 4);
        assert_eq!(stats.pending_reports, 2);
        assert_eq!(stats.attendance_rate, 90.0);

        let empty = build_stats(&DashboardCounts::default());
        assert_eq!(empty.attendance_rate, 0.0);
    }

    #[test]
    fn test_build_staff_performance() {
        let name = random_name();
        let expected_name = name.display();

        let rows = build_staff_performance(vec![
            StaffFacts {
                guard: guard(1, "Team Leader", 92.5),
                name,
                last_location: Some("North Gate".to_string()),
                attendance_total: 4,
                attendance_on_time: 3,
                incidents_reported: 2,
            },
            StaffFacts {
                guard: guard(2, "", 0.0),
                name: random_name(),
                last_location: None,
                attendance_total: 0,
                attendance_on_time: 0,
                incidents_reported: 0,
            },
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, expected_name);
        assert_eq!(rows[0].guard_id, "G-2024-001");
        assert_eq!(rows[0].position, "Team Leader");
        assert_eq!(rows[0].attendance_rate, 75.0);
        assert_eq!(rows[0].incidents_reported, 2);
        assert_eq!(rows[0].performance, 92.5);
        assert_eq!(rows[1].position, "Guard");
        assert_eq!(rows[1].attendance_rate, 0.0);
        assert!(rows[1].location.is_none());
    }

    #[test]
    fn test_build_upcoming_shifts() {
        let rows = build_upcoming_shifts(vec![UpcomingShiftFacts {
            schedule_id: 8,
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            location_name: "Harbour Office".to_string(),
            shift_name: "Night".to_string(),
            start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            guard: PersonName {
                first_name: Some("Ada".to_string()),
                last_name: Some("Okafor".to_string()),
                username: "aokafor".to_string(),
            },
        }]);

        assert_eq!(rows[0].guard_name, "Ada Okafor");
        assert_eq!(rows[0].location, "Harbour Office");
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["startTime"], "22:00");
        assert_eq!(json["endTime"], "06:00");
    }

    #[test]
    fn test_location_status_precedence() {
        assert_eq!(location_status(true, true), GuardLocationStatus::IncidentReported);
        assert_eq!(location_status(true, false), GuardLocationStatus::IncidentReported);
        assert_eq!(location_status(false, true), GuardLocationStatus::LateCheckIn);
        assert_eq!(location_status(false, false), GuardLocationStatus::OnDuty);
    }

    #[test]
    fn test_build_location_snapshot() {
        let rows = build_location_snapshot(vec![
            LocationFacts {
                location_id: 1,
                name: "Mall".to_string(),
                latitude: 51.5,
                longitude: -0.12,
                has_unresolved_incident: false,
                has_late_check_in: true,
                guard_on_site: Some(PersonName {
                    first_name: Some("Li".to_string()),
                    last_name: Some("Wei".to_string()),
                    username: "lwei".to_string(),
                }),
            },
            LocationFacts {
                location_id: 2,
                name: "Depot".to_string(),
                latitude: 51.4,
                longitude: -0.2,
                has_unresolved_incident: false,
                has_late_check_in: false,
                guard_on_site: None,
            },
        ]);

        assert_eq!(rows[0].status, GuardLocationStatus::LateCheckIn);
        assert_eq!(rows[0].guard_name.as_deref(), Some("Li Wei"));
        assert_eq!(rows[1].status, GuardLocationStatus::OnDuty);
        assert!(rows[1].guard_name.is_none());
    }

    #[test]
    fn test_time_ago() {
        let now = Utc::now();
        assert_eq!(time_ago(now, now), "just now");
        assert_eq!(time_ago(now - Duration::seconds(30), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(time_ago(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(time_ago(now - Duration::days(3), now), "3 days ago");
    }

    #[test]
    fn test_time_ago_future_is_just_now() {
        let now = Utc::now();
        assert_eq!(time_ago(now + Duration::minutes(5), now), "just now");
    }

    #[test]
    fn test_build_activity() {
        let now = Utc::now();
        let created = now - Duration::hours(2);
        let items = build_activity(
            vec![Incident {
                id: 3,
                reported_by: 1,
                location_id: Some(1),
                category_id: None,
                title: "Suspicious vehicle".to_string(),
                description: "Van parked by loading bay for an hour".to_string(),
                date: created,
                status: IncidentStatus::Investigating,
                priority: IncidentPriority::Medium,
                latitude: None,
                longitude: None,
                created_at: created,
                updated_at: created,
            }],
            now,
        );

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].activity_type, ActivityType::Incident);
        assert_eq!(items[0].time_ago, "2 hours ago");
        assert_eq!(items[0].time, created);
    }
}
