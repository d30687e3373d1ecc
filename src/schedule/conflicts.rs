use tracing::debug;

use super::availability::{subject_available_minutes, total_available_minutes};
use super::slot_utils::{format_range, minutes_to_hours, ranges_overlap};
use super::types::{hours_for, ConflictReport, Day, Finding, ScheduleRequest, Severity};

fn day_list(days: &[Day]) -> String {
    days.iter().map(|d| d.name()).collect::<Vec<_>>().join(", ")
}

/// Runs every feasibility and overlap check over a request.
///
/// Critical findings mean generation must not proceed. Warnings are advisory
/// and the caller may override them. Info findings never block.
pub fn analyze_conflicts(request: &ScheduleRequest) -> ConflictReport {
    let mut report = ConflictReport::default();
    let days = &request.days;

    check_total_capacity(request, &mut report);

    for subject in &request.subjects {
        if subject.available_days.is_empty() {
            report.push(
                Severity::Critical,
                Finding {
                    title: format!("\"{}\" Has No Available Days", subject.name),
                    message: "Task cannot be scheduled without available days".to_string(),
                    details: vec!["Select at least one available day for this task".to_string()],
                    affected_names: vec![subject.name.clone()],
                    time_ranges: Vec::new(),
                },
            );
        }
    }

    for subject in &request.subjects {
        let required = subject.required_minutes();
        let available =
            subject_available_minutes(subject, days, &request.daily_hours, &request.rest_periods);
        if required > available {
            report.push(
                Severity::Critical,
                Finding {
                    title: format!("\"{}\" Cannot Be Scheduled", subject.name),
                    message: format!(
                        "Task requires {:.1}h but only {:.1}h are available on its days",
                        minutes_to_hours(required),
                        minutes_to_hours(available)
                    ),
                    details: vec![
                        "Add more available days for this task".to_string(),
                        "Reduce the task duration or remove unavailable times".to_string(),
                    ],
                    affected_names: vec![subject.name.clone()],
                    time_ranges: Vec::new(),
                },
            );
        }
    }

    check_rest_overlaps(request, &mut report);
    check_unavailable_during_rest(request, &mut report);
    check_unavailable_self_overlaps(request, &mut report);
    check_work_hour_intrusions(request, &mut report);

    debug!(
        critical = report.critical.len(),
        warnings = report.warnings.len(),
        info = report.info.len(),
        "conflict analysis finished"
    );
    report
}

fn check_total_capacity(request: &ScheduleRequest, report: &mut ConflictReport) {
    let required = request
        .subjects
        .iter()
        .map(|s| s.required_minutes())
        .fold(0u32, u32::saturating_add);
    let available =
        total_available_minutes(&request.days, &request.daily_hours, &request.rest_periods);
    if required > available {
        report.push(
            Severity::Critical,
            Finding {
                title: "Not Enough Time Available".to_string(),
                message: format!(
                    "You need {:.1}h but only have {:.1}h available",
                    minutes_to_hours(required),
                    minutes_to_hours(available)
                ),
                details: vec![
                    "Reduce task durations or add more days".to_string(),
                    "Extend daily working hours or shorten rest periods".to_string(),
                ],
                affected_names: request.subjects.iter().map(|s| s.name.clone()).collect(),
                time_ranges: Vec::new(),
            },
        );
    }
}

fn check_rest_overlaps(request: &ScheduleRequest, report: &mut ConflictReport) {
    let rests = &request.rest_periods;
    for (i, first) in rests.iter().enumerate() {
        for second in &rests[i + 1..] {
            let shared: Vec<Day> = first
                .applicable_days(&request.days)
                .filter(|day| second.applies_to(*day, &request.days))
                .collect();
            if shared.is_empty()
                || !ranges_overlap(first.start_time, first.end_time, second.start_time, second.end_time)
            {
                continue;
            }
            report.push(
                Severity::Warning,
                Finding {
                    title: "Overlapping Rest Periods".to_string(),
                    message: format!("\"{}\" and \"{}\" overlap", first.name, second.name),
                    details: vec![
                        format!("Affected days: {}", day_list(&shared)),
                        "Both periods will be shown in the overlapping slots".to_string(),
                    ],
                    affected_names: vec![first.name.clone(), second.name.clone()],
                    time_ranges: vec![
                        format_range(first.start_time, first.end_time),
                        format_range(second.start_time, second.end_time),
                    ],
                },
            );
        }
    }
}

fn check_unavailable_during_rest(request: &ScheduleRequest, report: &mut ConflictReport) {
    for subject in &request.subjects {
        for blackout in &subject.unavailable_times {
            for rest in &request.rest_periods {
                if !ranges_overlap(blackout.start_time, blackout.end_time, rest.start_time, rest.end_time) {
                    continue;
                }
                let shared: Vec<Day> = rest
                    .applicable_days(&request.days)
                    .filter(|day| blackout.days.contains(day))
                    .collect();
                if shared.is_empty() {
                    continue;
                }
                report.push(
                    Severity::Warning,
                    Finding {
                        title: "Task Unavailable During Rest Period".to_string(),
                        message: format!(
                            "\"{}\" is marked unavailable during \"{}\"",
                            subject.name, rest.name
                        ),
                        details: vec![
                            format!("Affected days: {}", day_list(&shared)),
                            "That time is already blocked by the rest period".to_string(),
                        ],
                        affected_names: vec![subject.name.clone(), rest.name.clone()],
                        time_ranges: vec![
                            format_range(blackout.start_time, blackout.end_time),
                            format_range(rest.start_time, rest.end_time),
                        ],
                    },
                );
            }
        }
    }
}

fn check_unavailable_self_overlaps(request: &ScheduleRequest, report: &mut ConflictReport) {
    for subject in &request.subjects {
        let blocks = &subject.unavailable_times;
        for (i, first) in blocks.iter().enumerate() {
            for second in &blocks[i + 1..] {
                let shared: Vec<Day> = request
                    .days
                    .iter()
                    .copied()
                    .filter(|day| first.days.contains(day) && second.days.contains(day))
                    .collect();
                if shared.is_empty()
                    || !ranges_overlap(first.start_time, first.end_time, second.start_time, second.end_time)
                {
                    continue;
                }
                report.push(
                    Severity::Warning,
                    Finding {
                        title: "Overlapping Unavailable Times".to_string(),
                        message: format!("\"{}\" has unavailable times that overlap", subject.name),
                        details: vec![
                            format!("Affected days: {}", day_list(&shared)),
                            "Merge the overlapping blocks into one".to_string(),
                        ],
                        affected_names: vec![subject.name.clone()],
                        time_ranges: vec![
                            format_range(first.start_time, first.end_time),
                            format_range(second.start_time, second.end_time),
                        ],
                    },
                );
            }
        }
    }
}

fn check_work_hour_intrusions(request: &ScheduleRequest, report: &mut ConflictReport) {
    for subject in &request.subjects {
        for blackout in &subject.unavailable_times {
            let affected: Vec<Day> = request
                .days
                .iter()
                .copied()
                .filter(|day| blackout.days.contains(day))
                .filter(|day| {
                    let hours = hours_for(&request.daily_hours, *day);
                    hours.enabled
                        && ranges_overlap(blackout.start_time, blackout.end_time, hours.start_time, hours.end_time)
                })
                .collect();
            if affected.is_empty() {
                continue;
            }
            report.push(
                Severity::Info,
                Finding {
                    title: "Unavailable Time During Work Hours".to_string(),
                    message: format!(
                        "\"{}\" is unavailable for part of the working day",
                        subject.name
                    ),
                    details: vec![format!("Affected days: {}", day_list(&affected))],
                    affected_names: vec![subject.name.clone()],
                    time_ranges: vec![format_range(blackout.start_time, blackout.end_time)],
                },
            );
        }
    }
}
