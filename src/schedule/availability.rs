use std::collections::HashMap;

use super::slot_utils::{all_slots, slots_between, SLOT_MINUTES};
use super::types::{hours_for, DailyHours, Day, RestPeriod, Subject, TimeOfDay};

/// Grid slots inside a day's work window
pub fn work_slots(daily_hours: &HashMap<Day, DailyHours>, day: Day, slots: &[TimeOfDay]) -> Vec<TimeOfDay> {
    let (start, end) = hours_for(daily_hours, day).work_window();
    slots_between(start, end, slots)
}

pub fn rest_covers(rest_periods: &[RestPeriod], day: Day, selected_days: &[Day], time: TimeOfDay) -> bool {
    rest_periods
        .iter()
        .any(|rest| rest.covers(day, selected_days, time))
}

fn free_minutes_on<F>(
    day: Day,
    days: &[Day],
    daily_hours: &HashMap<Day, DailyHours>,
    rest_periods: &[RestPeriod],
    slots: &[TimeOfDay],
    blocked: F,
) -> u32
where
    F: Fn(TimeOfDay) -> bool,
{
    let free = work_slots(daily_hours, day, slots)
        .into_iter()
        .filter(|slot| !rest_covers(rest_periods, day, days, *slot) && !blocked(*slot))
        .count();
    free as u32 * SLOT_MINUTES as u32
}

/// Free working minutes across all selected days once rest periods are removed
pub fn total_available_minutes(
    days: &[Day],
    daily_hours: &HashMap<Day, DailyHours>,
    rest_periods: &[RestPeriod],
) -> u32 {
    let slots = all_slots();
    let mut seen = Vec::new();
    let mut total = 0;
    for day in days {
        if seen.contains(day) {
            continue;
        }
        seen.push(*day);
        total += free_minutes_on(*day, days, daily_hours, rest_periods, &slots, |_| false);
    }
    total
}

/// Capacity ceiling for one subject: its selected available days minus rest
/// periods and its own blackout blocks
pub fn subject_available_minutes(
    subject: &Subject,
    days: &[Day],
    daily_hours: &HashMap<Day, DailyHours>,
    rest_periods: &[RestPeriod],
) -> u32 {
    let slots = all_slots();
    subject
        .scheduling_days(days)
        .into_iter()
        .map(|day| {
            free_minutes_on(day, days, daily_hours, rest_periods, &slots, |slot| {
                subject.is_unavailable(day, slot)
            })
        })
        .sum()
}
