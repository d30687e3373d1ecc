pub mod types;
pub mod slot_utils;
pub mod availability;
pub mod conflicts;
pub mod allocator;
pub mod stats;
pub mod planner;

pub use types::{
    ConflictReport, Day, EntityId, Entry, EntryKind, Finding, ScheduleGrid, ScheduleRequest,
    ScheduleStats, Subject, TimeOfDay,
};
pub use slot_utils::{all_slots, slots_between};
pub use availability::{subject_available_minutes, total_available_minutes};
pub use conflicts::analyze_conflicts;
pub use allocator::allocate;
pub use stats::summarize;
pub use planner::{plan_week, GeneratedSchedule, GenerationResponse, PlanOutcome};
