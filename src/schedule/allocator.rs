use tracing::debug;

use super::availability::work_slots;
use super::slot_utils::{all_slots, slots_between, SLOT_MINUTES};
use super::types::{EntityId, Entry, EntryKind, ScheduleGrid, ScheduleRequest, Subject, TimeOfDay};

/// Colour of every rest entry
pub const REST_COLOR: &str = "#f39c12";

/// Task colours, picked by the subject's position in the request
pub const TASK_PALETTE: [&str; 5] = ["#3498db", "#2ecc71", "#9b59b6", "#e74c3c", "#1abc9c"];

/// Deterministic colour for a subject.
///
/// Numeric ids take a palette colour by input position; text ids get a
/// colour derived from an FNV-1a hash of the id.
pub fn color_for(id: &EntityId, index: usize) -> String {
    match id {
        EntityId::Number(_) => TASK_PALETTE[index % TASK_PALETTE.len()].to_string(),
        EntityId::Text(text) => {
            let mut hash: u32 = 0x811c_9dc5;
            for byte in text.bytes() {
                hash ^= byte as u32;
                hash = hash.wrapping_mul(0x0100_0193);
            }
            format!("#{:06x}", hash & 0x00ff_ffff)
        }
    }
}

/// Builds the weekly grid: rest periods first, then subjects greedily in
/// priority order.
///
/// Runs unconditionally; callers gate on the conflict report beforehand.
pub fn allocate(request: &ScheduleRequest) -> ScheduleGrid {
    let slots = all_slots();
    let mut grid = ScheduleGrid::new(&request.days, &slots);

    stamp_rest_periods(request, &slots, &mut grid);

    // Stable sort keeps input order between equal priorities
    let mut ordered: Vec<(usize, &Subject)> = request.subjects.iter().enumerate().collect();
    ordered.sort_by(|a, b| b.1.priority.weight().cmp(&a.1.priority.weight()));

    for (index, subject) in ordered {
        let color = color_for(&subject.id, index);
        let scheduled = place_subject(request, subject, &color, &slots, &mut grid);
        debug!(
            subject = %subject.name,
            required = subject.required_minutes(),
            scheduled,
            "subject placed"
        );
    }

    grid
}

fn stamp_rest_periods(request: &ScheduleRequest, slots: &[TimeOfDay], grid: &mut ScheduleGrid) {
    for rest in &request.rest_periods {
        let rest_slots = slots_between(rest.start_time, rest.end_time, slots);
        for day in rest.applicable_days(&request.days) {
            for slot in &rest_slots {
                grid.push(
                    day,
                    *slot,
                    Entry {
                        kind: EntryKind::Rest,
                        name: rest.name.clone(),
                        subject_id: None,
                        color: REST_COLOR.to_string(),
                    },
                );
            }
        }
    }
}

/// Fills one subject day by day until its weekly target is met or its days
/// run out. Returns the minutes placed.
fn place_subject(
    request: &ScheduleRequest,
    subject: &Subject,
    color: &str,
    slots: &[TimeOfDay],
    grid: &mut ScheduleGrid,
) -> u32 {
    let target = subject.required_minutes();
    let mut scheduled = 0;

    for day in subject.scheduling_days(&request.days) {
        if scheduled >= target {
            break;
        }
        let candidates: Vec<_> = work_slots(&request.daily_hours, day, slots)
            .into_iter()
            .filter(|slot| !subject.is_unavailable(day, *slot) && grid.is_free(day, *slot))
            .collect();

        for slot in candidates {
            if scheduled >= target {
                break;
            }
            grid.push(
                day,
                slot,
                Entry {
                    kind: EntryKind::Task,
                    name: subject.name.clone(),
                    subject_id: Some(subject.id.clone()),
                    color: color.to_string(),
                },
            );
            scheduled += SLOT_MINUTES as u32;
        }
    }

    scheduled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::{Day, DailyHours, Priority, RestPeriod, TimeRange};
    use std::collections::HashMap;

    fn t(value: &str) -> TimeOfDay {
        TimeOfDay::parse(value).unwrap()
    }

    fn request(days: Vec<Day>, subjects: Vec<Subject>) -> ScheduleRequest {
        ScheduleRequest {
            days,
            daily_hours: HashMap::new(),
            rest_periods: Vec::new(),
            subjects,
            proceed_with_warnings: true,
        }
    }

    fn subject(id: u64, name: &str, duration: f64, priority: Priority, days: Vec<Day>) -> Subject {
        Subject {
            id: EntityId::Number(id),
            name: name.to_string(),
            duration,
            priority,
            available_days: days,
            unavailable_times: Vec::new(),
        }
    }

    fn task_slots(grid: &ScheduleGrid, name: &str) -> Vec<(Day, TimeOfDay)> {
        grid.cells()
            .filter(|(_, _, entries)| entries.iter().any(|e| e.kind == EntryKind::Task && e.name == name))
            .map(|(day, slot, _)| (day, slot))
            .collect()
    }

    #[test]
    fn test_one_hour_task_takes_two_slots() {
        let req = request(
            vec![Day::Monday, Day::Tuesday],
            vec![subject(1, "Write", 1.0, Priority::High, vec![Day::Monday, Day::Tuesday])],
        );
        let grid = allocate(&req);
        assert_eq!(
            task_slots(&grid, "Write"),
            vec![(Day::Monday, t("09:00")), (Day::Monday, t("09:30"))]
        );
    }

    #[test]
    fn test_rest_periods_are_stamped_and_skipped() {
        let mut req = request(
            vec![Day::Monday],
            vec![subject(1, "Write", 4.0, Priority::Medium, vec![Day::Monday])],
        );
        req.rest_periods.push(RestPeriod {
            id: EntityId::Number(7),
            name: "Lunch".to_string(),
            start_time: t("10:00"),
            end_time: t("11:00"),
            apply_to_all: true,
            days: Vec::new(),
        });
        let grid = allocate(&req);

        assert_eq!(grid.entries(Day::Monday, t("10:00"))[0].kind, EntryKind::Rest);
        assert_eq!(grid.entries(Day::Monday, t("10:30"))[0].color, REST_COLOR);
        let placed = task_slots(&grid, "Write");
        assert_eq!(placed.len(), 8);
        assert!(!placed.contains(&(Day::Monday, t("10:00"))));
        assert_eq!(placed.last(), Some(&(Day::Monday, t("13:30"))));
    }

    #[test]
    fn test_overlapping_rests_stack_in_a_slot() {
        let mut req = request(vec![Day::Monday], Vec::new());
        for (id, start, end) in [(1, "12:00", "13:00"), (2, "12:30", "13:30")] {
            req.rest_periods.push(RestPeriod {
                id: EntityId::Number(id),
                name: format!("Break {}", id),
                start_time: t(start),
                end_time: t(end),
                apply_to_all: true,
                days: Vec::new(),
            });
        }
        let grid = allocate(&req);
        assert_eq!(grid.entries(Day::Monday, t("12:30")).len(), 2);
        assert_eq!(grid.entries(Day::Monday, t("13:00")).len(), 1);
    }

    #[test]
    fn test_higher_priority_fills_first_under_scarcity() {
        let mut req = request(
            vec![Day::Monday],
            vec![
                subject(1, "Chores", 6.0, Priority::Low, vec![Day::Monday]),
                subject(2, "Exam", 6.0, Priority::High, vec![Day::Monday]),
            ],
        );
        req.daily_hours.insert(
            Day::Monday,
            DailyHours { enabled: true, start_time: t("09:00"), end_time: t("17:00") },
        );
        let grid = allocate(&req);
        assert_eq!(task_slots(&grid, "Exam").len(), 12);
        assert_eq!(task_slots(&grid, "Chores").len(), 4);
        assert_eq!(task_slots(&grid, "Exam")[0], (Day::Monday, t("09:00")));
    }

    #[test]
    fn test_equal_priority_keeps_input_order() {
        let req = request(
            vec![Day::Monday],
            vec![
                subject(1, "First", 1.0, Priority::Medium, vec![Day::Monday]),
                subject(2, "Second", 1.0, Priority::Medium, vec![Day::Monday]),
            ],
        );
        let grid = allocate(&req);
        assert_eq!(task_slots(&grid, "First")[0].1, t("09:00"));
        assert_eq!(task_slots(&grid, "Second")[0].1, t("10:00"));
    }

    #[test]
    fn test_spills_to_next_available_day() {
        let req = request(
            vec![Day::Monday, Day::Wednesday],
            vec![subject(1, "Project", 10.0, Priority::High, vec![Day::Wednesday, Day::Monday])],
        );
        let grid = allocate(&req);
        let placed = task_slots(&grid, "Project");
        assert_eq!(placed.len(), 20);
        // wednesday is listed first by the subject
        assert_eq!(placed.iter().filter(|(d, _)| *d == Day::Wednesday).count(), 16);
        assert_eq!(placed.iter().filter(|(d, _)| *d == Day::Monday).count(), 4);
    }

    #[test]
    fn test_blackout_covering_work_day_places_nothing() {
        let mut writing = subject(1, "Write", 2.0, Priority::High, vec![Day::Monday]);
        writing.unavailable_times.push(TimeRange {
            days: vec![Day::Monday],
            start_time: t("09:00"),
            end_time: t("17:00"),
        });
        let req = request(vec![Day::Monday, Day::Tuesday], vec![writing]);
        let grid = allocate(&req);
        assert!(task_slots(&grid, "Write").is_empty());
    }

    #[test]
    fn test_unselected_days_are_ignored() {
        let req = request(
            vec![Day::Monday],
            vec![subject(1, "Write", 1.0, Priority::High, vec![Day::Sunday, Day::Monday])],
        );
        let grid = allocate(&req);
        assert_eq!(grid.days().collect::<Vec<_>>(), vec![Day::Monday]);
        assert_eq!(task_slots(&grid, "Write").len(), 2);
    }

    #[test]
    fn test_allocation_is_deterministic() {
        let req = request(
            vec![Day::Monday, Day::Tuesday],
            vec![
                subject(1, "A", 3.0, Priority::Low, vec![Day::Monday, Day::Tuesday]),
                subject(2, "B", 5.5, Priority::High, vec![Day::Tuesday, Day::Monday]),
                subject(3, "C", 2.0, Priority::Medium, vec![Day::Monday]),
            ],
        );
        assert_eq!(allocate(&req), allocate(&req));
    }

    #[test]
    fn test_colors() {
        assert_eq!(color_for(&EntityId::Number(42), 0), "#3498db");
        assert_eq!(color_for(&EntityId::Number(42), 6), "#2ecc71");
        let text = color_for(&EntityId::Text("reading".to_string()), 0);
        assert_eq!(text.len(), 7);
        assert!(text.starts_with('#'));
        assert_eq!(text, color_for(&EntityId::Text("reading".to_string()), 3));
    }
}
