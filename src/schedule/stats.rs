use std::collections::HashMap;

use super::slot_utils::SLOT_MINUTES;
use super::types::{EntityId, EntryKind, ScheduleGrid, ScheduleStats, Subject, SubjectSummary};

/// Aggregates a filled grid into summary metrics
pub fn summarize(grid: &ScheduleGrid, subjects: &[Subject]) -> ScheduleStats {
    let mut task_slots = 0usize;
    let mut per_subject: HashMap<&EntityId, u32> = HashMap::new();

    for (_, _, entries) in grid.cells() {
        for entry in entries.iter().filter(|e| e.kind == EntryKind::Task) {
            task_slots += 1;
            if let Some(id) = &entry.subject_id {
                *per_subject.entry(id).or_insert(0) += SLOT_MINUTES as u32;
            }
        }
    }

    let breakdown: Vec<SubjectSummary> = subjects
        .iter()
        .map(|subject| {
            let required = subject.required_minutes();
            let scheduled = per_subject.get(&subject.id).copied().unwrap_or(0);
            SubjectSummary {
                subject_id: subject.id.clone(),
                name: subject.name.clone(),
                required_minutes: required,
                scheduled_minutes: scheduled,
                fully_scheduled: scheduled >= required,
            }
        })
        .collect();

    let required_total = breakdown.iter().map(|s| s.required_minutes).fold(0u32, u32::saturating_add);
    let scheduled_total = breakdown.iter().map(|s| s.scheduled_minutes).fold(0u32, u32::saturating_add);
    let efficiency = if required_total == 0 {
        0
    } else {
        (scheduled_total as f64 / required_total as f64 * 100.0).round() as u32
    };

    let hours = task_slots as f64 * 0.5;
    ScheduleStats {
        total_scheduled_hours: (hours * 10.0).round() / 10.0,
        tasks_scheduled: breakdown.iter().filter(|s| s.scheduled_minutes > 0).count(),
        efficiency,
        subjects: breakdown,
    }
}
