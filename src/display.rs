use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::schedule::types::{ConflictReport, Entry, Finding, ScheduleGrid, ScheduleStats, TimeOfDay};

const CELL_WIDTH: usize = 18;

/// Morning / Afternoon / Evening band a slot belongs to
pub fn period_of(slot: TimeOfDay) -> &'static str {
    match slot.minutes() / 60 {
        h if h < 12 => "Morning",
        h if h < 17 => "Afternoon",
        _ => "Evening",
    }
}

/// Cell text: entry names joined, or "Free" for an empty slot
pub fn cell_label(entries: &[Entry]) -> String {
    if entries.is_empty() {
        "Free".to_string()
    } else {
        entries
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{:<width$}", text, width = width)
    } else {
        let mut clipped: String = text.chars().take(width - 1).collect();
        clipped.push('~');
        clipped
    }
}

/// Renders the timetable as a plain-text table grouped by period of day
pub fn render_schedule(grid: &ScheduleGrid, stats: &ScheduleStats) -> String {
    let mut out = String::new();
    let days: Vec<_> = grid.days().collect();

    let _ = writeln!(out, "=== Weekly Schedule ===");
    let _ = writeln!(out, "Total scheduled: {}h", stats.total_scheduled_hours);
    let _ = writeln!(out, "Tasks scheduled: {}", stats.tasks_scheduled);
    let _ = writeln!(out, "Efficiency: {}%", stats.efficiency);

    let under: Vec<_> = stats.subjects.iter().filter(|s| !s.fully_scheduled).collect();
    if !under.is_empty() {
        let _ = writeln!(out, "Under-scheduled tasks ({}):", under.len());
        for summary in under {
            let _ = writeln!(
                out,
                "  - {} ({:.1}h of {:.1}h)",
                summary.name,
                summary.scheduled_minutes as f64 / 60.0,
                summary.required_minutes as f64 / 60.0
            );
        }
    }

    let mut header = fit("Time", 10);
    for day in &days {
        header.push_str(&fit(day.short_name(), CELL_WIDTH));
    }

    let mut current_period = "";
    for slot in grid.slots() {
        let period = period_of(slot);
        if period != current_period {
            current_period = period;
            let _ = writeln!(out, "\n-- {} --", period);
            let _ = writeln!(out, "{}", header.trim_end());
        }
        let mut line = fit(&slot.to_12h(), 10);
        for day in &days {
            line.push_str(&fit(&cell_label(grid.entries(*day, slot)), CELL_WIDTH));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    out
}

/// Prints the timetable to stdout
pub fn print_schedule(grid: &ScheduleGrid, stats: &ScheduleStats) {
    print!("{}", render_schedule(grid, stats));
}

/// Writes the rendered timetable to a text file
pub fn write_schedule_to_file<P: AsRef<Path>>(grid: &ScheduleGrid, stats: &ScheduleStats, path: P) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(render_schedule(grid, stats).as_bytes())?;
    Ok(())
}

fn render_finding(out: &mut String, marker: &str, finding: &Finding) {
    let _ = writeln!(out, "[{}] {}", marker, finding.title);
    let _ = writeln!(out, "    {}", finding.message);
    if !finding.time_ranges.is_empty() {
        let _ = writeln!(out, "    Times: {}", finding.time_ranges.join(", "));
    }
    for detail in &finding.details {
        let _ = writeln!(out, "    • {}", detail);
    }
}

/// Renders a conflict report, most severe first
pub fn render_conflicts(report: &ConflictReport) -> String {
    let mut out = String::new();
    if report.critical.is_empty() && report.warnings.is_empty() && report.info.is_empty() {
        let _ = writeln!(out, "No conflicts found.");
        return out;
    }
    if report.has_critical {
        let _ = writeln!(out, "Schedule conflicts - please fix these issues to continue:");
    }
    for finding in &report.critical {
        render_finding(&mut out, "CRITICAL", finding);
    }
    for finding in &report.warnings {
        render_finding(&mut out, "WARNING", finding);
    }
    for finding in &report.info {
        render_finding(&mut out, "INFO", finding);
    }
    out
}
