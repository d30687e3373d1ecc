use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::schedule::types::{hours_for, Day, ScheduleRequest};

/// A weekly target can never exceed the hours in a week
pub const MAX_DURATION_HOURS: f64 = 168.0;

/// Loads and validates a generation request from a JSON file
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<ScheduleRequest> {
    let raw = fs::read(path.as_ref())?;
    debug!(path = %path.as_ref().display(), bytes = raw.len(), "loaded request file");
    parse_request(&raw)
}

/// Parses a JSON body, collapses duplicate days and validates the result
pub fn parse_request(body: &[u8]) -> Result<ScheduleRequest> {
    let request: ScheduleRequest = serde_json::from_slice(body)?;
    prepare_request(request)
}

/// Normalizes and validates an already deserialized request
pub fn prepare_request(mut request: ScheduleRequest) -> Result<ScheduleRequest> {
    request.days = dedup_days(&request.days);
    for subject in &mut request.subjects {
        subject.available_days = dedup_days(&subject.available_days);
    }
    validate_request(&request).map_err(PlannerError::InvalidRequest)?;
    Ok(request)
}

/// Keeps the first occurrence of every day
fn dedup_days(days: &[Day]) -> Vec<Day> {
    let mut result = Vec::with_capacity(days.len());
    for day in days {
        if !result.contains(day) {
            result.push(*day);
        }
    }
    result
}

/// Validates a generation request
pub fn validate_request(req: &ScheduleRequest) -> std::result::Result<(), String> {
    if req.days.is_empty() {
        return Err("At least one day must be selected".to_string());
    }

    for day in &req.days {
        let hours = hours_for(&req.daily_hours, *day);
        if hours.enabled && hours.start_time >= hours.end_time {
            return Err(format!("Working hours for {} must start before they end", day));
        }
    }

    let mut rest_ids = HashSet::new();
    for rest in &req.rest_periods {
        if !rest_ids.insert(&rest.id) {
            return Err(format!("Duplicate rest period id: {}", rest.id));
        }
        if rest.start_time >= rest.end_time {
            return Err(format!("Rest period \"{}\" must start before it ends", rest.name));
        }
    }

    let mut subject_ids = HashSet::new();
    for subject in &req.subjects {
        if !subject_ids.insert(&subject.id) {
            return Err(format!("Duplicate subject id: {}", subject.id));
        }
        if subject.name.trim().is_empty() {
            return Err("Subject name is required".to_string());
        }
        // Durations are whole half-hours so every target maps onto slots
        let halves = subject.duration * 2.0;
        if !subject.duration.is_finite() || subject.duration <= 0.0 || halves.fract() != 0.0 {
            return Err(format!(
                "Duration of \"{}\" must be a positive multiple of 0.5 hours",
                subject.name
            ));
        }
        if subject.duration > MAX_DURATION_HOURS {
            return Err(format!(
                "Duration of \"{}\" cannot exceed {} hours",
                subject.name, MAX_DURATION_HOURS
            ));
        }
        for range in &subject.unavailable_times {
            if range.start_time >= range.end_time {
                return Err(format!(
                    "Unavailable time {}-{} of \"{}\" must start before it ends",
                    range.start_time, range.end_time, subject.name
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::Priority;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn minimal() -> serde_json::Value {
        json!({
            "days": ["monday", "tuesday"],
            "subjects": [
                { "id": 1, "name": "Write", "duration": 1, "availableDays": ["monday"] }
            ]
        })
    }

    #[test]
    fn test_parses_with_defaults() {
        let request = parse_request(&body(minimal())).unwrap();
        assert_eq!(request.days, vec![Day::Monday, Day::Tuesday]);
        assert!(request.rest_periods.is_empty());
        assert!(request.proceed_with_warnings);
        let subject = &request.subjects[0];
        assert_eq!(subject.priority, Priority::Medium);
        assert!(subject.unavailable_times.is_empty());
        assert_eq!(subject.required_minutes(), 60);
    }

    #[test]
    fn test_parses_full_request() {
        let request = parse_request(&body(json!({
            "days": ["wednesday", "monday", "wednesday"],
            "dailyHours": {
                "monday": { "enabled": true, "startTime": "8:30", "endTime": "12:00" },
                "sunday": { "enabled": false, "startTime": "09:00", "endTime": "17:00" }
            },
            "restPeriods": [
                { "id": 1712, "name": "Lunch", "startTime": "12:00", "endTime": "13:00",
                  "days": ["monday"], "applyToAll": true }
            ],
            "subjects": [
                { "id": "essay", "name": "Essay", "duration": 2.5, "priority": "HIGH",
                  "availableDays": ["monday", "monday", "wednesday"],
                  "unavailableTimes": [
                      { "days": ["monday"], "startTime": "10:00", "endTime": "11:00" }
                  ] },
                { "id": 2, "name": "Chores", "duration": 1, "priority": "urgent",
                  "availableDays": ["wednesday"] }
            ]
        })))
        .unwrap();

        assert_eq!(request.days, vec![Day::Wednesday, Day::Monday]);
        let monday = request.daily_hours[&Day::Monday];
        assert!(monday.enabled);
        assert_eq!(monday.start_time.to_string(), "08:30");
        assert_eq!(request.subjects[0].priority, Priority::High);
        assert_eq!(request.subjects[0].available_days, vec![Day::Monday, Day::Wednesday]);
        assert_eq!(request.subjects[1].priority, Priority::Medium);
    }

    #[test]
    fn test_non_string_priorities_read_as_medium() {
        let request = parse_request(&body(json!({
            "days": ["monday"],
            "subjects": [
                { "id": 1, "name": "A", "duration": 1, "priority": 3 },
                { "id": 2, "name": "B", "duration": 1, "priority": null },
                { "id": 3, "name": "C", "duration": 1, "priority": { "level": "high" } },
                { "id": 4, "name": "D", "duration": 1, "priority": " low " }
            ]
        })))
        .unwrap();
        let priorities: Vec<Priority> = request.subjects.iter().map(|s| s.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::Medium, Priority::Medium, Priority::Medium, Priority::Low]
        );
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(parse_request(b"{\"days\": ["), Err(PlannerError::Json(_))));
        assert!(matches!(
            parse_request(&body(json!({ "days": ["funday"] }))),
            Err(PlannerError::Json(_))
        ));
        assert!(matches!(
            parse_request(&body(json!({ "days": ["monday"], "restPeriods": [
                { "id": 1, "name": "Lunch", "startTime": "noon", "endTime": "13:00" }
            ] }))),
            Err(PlannerError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_requests() {
        let cases = vec![
            json!({ "days": [] }),
            json!({ "days": ["monday"], "dailyHours": {
                "monday": { "enabled": true, "startTime": "17:00", "endTime": "09:00" } } }),
            json!({ "days": ["monday"], "restPeriods": [
                { "id": 1, "name": "Lunch", "startTime": "13:00", "endTime": "12:00" } ] }),
            json!({ "days": ["monday"], "restPeriods": [
                { "id": 1, "name": "A", "startTime": "12:00", "endTime": "13:00" },
                { "id": 1, "name": "B", "startTime": "15:00", "endTime": "16:00" } ] }),
            json!({ "days": ["monday"], "subjects": [
                { "id": 1, "name": "Write", "duration": 0, "availableDays": ["monday"] } ] }),
            json!({ "days": ["monday"], "subjects": [
                { "id": 1, "name": "Write", "duration": 1.25, "availableDays": ["monday"] } ] }),
            json!({ "days": ["monday"], "subjects": [
                { "id": 1, "name": "  ", "duration": 1, "availableDays": ["monday"] } ] }),
            json!({ "days": ["monday"], "subjects": [
                { "id": 1, "name": "Write", "duration": 40000000, "availableDays": ["monday"] } ] }),
            json!({ "days": ["monday"], "subjects": [
                { "id": 1, "name": "Write", "duration": 168.5, "availableDays": ["monday"] } ] }),
            json!({ "days": ["monday"], "subjects": [
                { "id": 1, "name": "A", "duration": 1 },
                { "id": 1, "name": "B", "duration": 1 } ] }),
            json!({ "days": ["monday"], "subjects": [
                { "id": 1, "name": "A", "duration": 1, "unavailableTimes": [
                    { "days": ["monday"], "startTime": "11:00", "endTime": "11:00" } ] } ] }),
        ];
        for case in cases {
            let result = parse_request(&body(case.clone()));
            assert!(
                matches!(result, Err(PlannerError::InvalidRequest(_))),
                "expected validation failure for {}",
                case
            );
        }
    }

    #[test]
    fn test_accepts_a_full_week_of_hours() {
        let request = parse_request(&body(json!({ "days": ["monday"], "subjects": [
            { "id": 1, "name": "Write", "duration": 168, "availableDays": ["monday"] } ] })))
        .unwrap();
        assert_eq!(request.subjects[0].required_minutes(), 168 * 60);
    }

    #[test]
    fn test_load_request_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(&path, body(minimal())).unwrap();
        let request = load_request(&path).unwrap();
        assert_eq!(request.subjects.len(), 1);

        let missing = load_request(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(PlannerError::Io(_))));
    }
}
