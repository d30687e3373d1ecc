use super::types::TimeOfDay;

/// Length of one grid slot in minutes
pub const SLOT_MINUTES: u16 = 30;

/// First slot of every day (08:00)
pub const FIRST_SLOT: TimeOfDay = TimeOfDay::from_hm(8, 0);

/// Last slot of every day (20:30)
pub const LAST_SLOT: TimeOfDay = TimeOfDay::from_hm(20, 30);

/// Generates the fixed daily slot sequence: 08:00, 08:30, ... 20:30
pub fn all_slots() -> Vec<TimeOfDay> {
    (FIRST_SLOT.minutes()..=LAST_SLOT.minutes())
        .step_by(SLOT_MINUTES as usize)
        .map(TimeOfDay::from_minutes)
        .collect()
}

/// Slots starting inside the half-open interval [start, end)
pub fn slots_between(start: TimeOfDay, end: TimeOfDay, slots: &[TimeOfDay]) -> Vec<TimeOfDay> {
    slots
        .iter()
        .copied()
        .filter(|slot| in_range(*slot, start, end))
        .collect()
}

pub fn in_range(time: TimeOfDay, start: TimeOfDay, end: TimeOfDay) -> bool {
    start <= time && time < end
}

/// Strict half-open overlap; ranges that only touch do not overlap
pub fn ranges_overlap(s1: TimeOfDay, e1: TimeOfDay, s2: TimeOfDay, e2: TimeOfDay) -> bool {
    s1 < e2 && s2 < e1
}

/// Formats a range as "HH:MM-HH:MM"
pub fn format_range(start: TimeOfDay, end: TimeOfDay) -> String {
    format!("{}-{}", start, end)
}

/// Converts minutes to hours for messages, e.g. 90 -> 1.5
pub fn minutes_to_hours(minutes: u32) -> f64 {
    minutes as f64 / 60.0
}
