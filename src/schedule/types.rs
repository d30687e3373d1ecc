use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveTime, Timelike};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Day of the week, lowercase on the wire ("monday")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    /// Three-letter column label used by the timetable views
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Time of day stored as minutes since midnight.
///
/// Parsed from and rendered as `HH:MM`. Input without zero padding ("9:00")
/// is accepted, so ordering never depends on string layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const fn from_hm(hours: u16, minutes: u16) -> Self {
        TimeOfDay(hours * 60 + minutes)
    }

    pub const fn from_minutes(minutes: u16) -> Self {
        TimeOfDay(minutes)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn parse(value: &str) -> Option<Self> {
        let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()?;
        Some(TimeOfDay((time.hour() * 60 + time.minute()) as u16))
    }

    /// Formats as a 12-hour clock label, e.g. "1:30 PM"
    pub fn to_12h(self) -> String {
        let hours = self.0 / 60;
        let minutes = self.0 % 60;
        let suffix = if hours >= 12 { "PM" } else { "AM" };
        let display_hour = match hours % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display_hour, minutes, suffix)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid time '{}', expected HH:MM", raw))
        })
    }
}

pub const DEFAULT_WORK_START: TimeOfDay = TimeOfDay::from_hm(9, 0);
pub const DEFAULT_WORK_END: TimeOfDay = TimeOfDay::from_hm(17, 0);

/// Identifier of a subject or rest period. Clients send either numbers
/// (timestamps) or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(u64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

fn default_work_start() -> TimeOfDay {
    DEFAULT_WORK_START
}

fn default_work_end() -> TimeOfDay {
    DEFAULT_WORK_END
}

fn default_true() -> bool {
    true
}

/// Working-hour window for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHours {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_work_start")]
    pub start_time: TimeOfDay,
    #[serde(default = "default_work_end")]
    pub end_time: TimeOfDay,
}

impl Default for DailyHours {
    fn default() -> Self {
        DailyHours {
            enabled: false,
            start_time: DEFAULT_WORK_START,
            end_time: DEFAULT_WORK_END,
        }
    }
}

impl DailyHours {
    /// The window used for capacity and placement; disabled days fall back to 09:00-17:00
    pub fn work_window(&self) -> (TimeOfDay, TimeOfDay) {
        if self.enabled {
            (self.start_time, self.end_time)
        } else {
            (DEFAULT_WORK_START, DEFAULT_WORK_END)
        }
    }
}

/// Looks up the working hours for a day, defaulting when the day has no entry
pub fn hours_for(daily_hours: &HashMap<Day, DailyHours>, day: Day) -> DailyHours {
    daily_hours.get(&day).copied().unwrap_or_default()
}

/// A recurring break stamped into the grid before any task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestPeriod {
    pub id: EntityId,
    pub name: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default)]
    pub apply_to_all: bool,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl RestPeriod {
    pub fn applies_to(&self, day: Day, selected_days: &[Day]) -> bool {
        selected_days.contains(&day) && (self.apply_to_all || self.days.contains(&day))
    }

    /// Selected days this period applies to, in selection order
    pub fn applicable_days<'a>(&'a self, selected_days: &'a [Day]) -> impl Iterator<Item = Day> + 'a {
        selected_days
            .iter()
            .copied()
            .filter(move |day| self.apply_to_all || self.days.contains(day))
    }

    pub fn covers(&self, day: Day, selected_days: &[Day], time: TimeOfDay) -> bool {
        self.applies_to(day, selected_days)
            && super::slot_utils::in_range(time, self.start_time, self.end_time)
    }
}

/// A subject-specific blackout block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    #[serde(default)]
    pub days: Vec<Day>,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl TimeRange {
    pub fn covers(&self, day: Day, time: TimeOfDay) -> bool {
        self.days.contains(&day) && super::slot_utils::in_range(time, self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

// Missing, null, non-string or unrecognised priorities all read as medium
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let label = raw.as_str().map(|s| s.trim().to_lowercase());
        Ok(match label.as_deref() {
            Some("high") => Priority::High,
            Some("low") => Priority::Low,
            _ => Priority::Medium,
        })
    }
}

/// A task with a weekly time budget to place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: EntityId,
    pub name: String,
    /// Weekly hours, in half-hour steps
    pub duration: f64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub available_days: Vec<Day>,
    #[serde(default)]
    pub unavailable_times: Vec<TimeRange>,
}

impl Subject {
    pub fn required_minutes(&self) -> u32 {
        (self.duration * 60.0).round().max(0.0) as u32
    }

    pub fn is_unavailable(&self, day: Day, time: TimeOfDay) -> bool {
        self.unavailable_times.iter().any(|range| range.covers(day, time))
    }

    /// Available days that are also selected, in the subject's own order
    pub fn scheduling_days(&self, selected_days: &[Day]) -> Vec<Day> {
        let mut days = Vec::new();
        for day in &self.available_days {
            if selected_days.contains(day) && !days.contains(day) {
                days.push(*day);
            }
        }
        days
    }
}

/// Everything the engine needs for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub days: Vec<Day>,
    #[serde(default)]
    pub daily_hours: HashMap<Day, DailyHours>,
    #[serde(default)]
    pub rest_periods: Vec<RestPeriod>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// When false, warnings block generation the same way critical findings do
    #[serde(default = "default_true")]
    pub proceed_with_warnings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Rest,
    Task,
}

/// One occupant of a grid slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<EntityId>,
    pub color: String,
}

/// Weekly timetable: day -> slot start -> entries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleGrid {
    days: IndexMap<Day, IndexMap<TimeOfDay, Vec<Entry>>>,
}

impl ScheduleGrid {
    pub fn new(days: &[Day], slots: &[TimeOfDay]) -> Self {
        let mut grid = IndexMap::new();
        for day in days {
            grid.entry(*day).or_insert_with(|| {
                slots.iter().map(|slot| (*slot, Vec::new())).collect::<IndexMap<_, _>>()
            });
        }
        ScheduleGrid { days: grid }
    }

    pub fn days(&self) -> impl Iterator<Item = Day> + '_ {
        self.days.keys().copied()
    }

    /// Slot starts of the first day; every day carries the same slots
    pub fn slots(&self) -> Vec<TimeOfDay> {
        self.days
            .values()
            .next()
            .map(|slots| slots.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn entries(&self, day: Day, slot: TimeOfDay) -> &[Entry] {
        self.days
            .get(&day)
            .and_then(|slots| slots.get(&slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_free(&self, day: Day, slot: TimeOfDay) -> bool {
        self.entries(day, slot).is_empty()
    }

    /// Appends an entry; returns false when the day or slot is not on the grid
    pub fn push(&mut self, day: Day, slot: TimeOfDay, entry: Entry) -> bool {
        match self.days.get_mut(&day).and_then(|slots| slots.get_mut(&slot)) {
            Some(cell) => {
                cell.push(entry);
                true
            }
            None => false,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = (Day, TimeOfDay, &[Entry])> + '_ {
        self.days.iter().flat_map(|(day, slots)| {
            slots
                .iter()
                .map(move |(slot, entries)| (*day, *slot, entries.as_slice()))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_ranges: Vec<String>,
}

/// Outcome of the feasibility checks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub critical: Vec<Finding>,
    pub warnings: Vec<Finding>,
    #[serde(default)]
    pub info: Vec<Finding>,
    #[serde(default)]
    pub has_critical: bool,
}

impl ConflictReport {
    pub fn push(&mut self, severity: Severity, finding: Finding) {
        match severity {
            Severity::Critical => {
                self.critical.push(finding);
                self.has_critical = true;
            }
            Severity::Warning => self.warnings.push(finding),
            Severity::Info => self.info.push(finding),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub subject_id: EntityId,
    pub name: String,
    pub required_minutes: u32,
    pub scheduled_minutes: u32,
    pub fully_scheduled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub total_scheduled_hours: f64,
    pub tasks_scheduled: usize,
    pub efficiency: u32,
    #[serde(default)]
    pub subjects: Vec<SubjectSummary>,
}
