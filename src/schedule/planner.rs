use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::allocator::allocate;
use super::conflicts::analyze_conflicts;
use super::stats::summarize;
use super::types::{ConflictReport, ScheduleGrid, ScheduleRequest, ScheduleStats};

/// A filled timetable with its stats and any non-blocking findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    pub schedule: ScheduleGrid,
    pub stats: ScheduleStats,
    pub conflicts: ConflictReport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    Scheduled(GeneratedSchedule),
    /// Generation was withheld; the report explains why
    Blocked(ConflictReport),
}

/// Analyze, gate, allocate and summarize one request
pub fn plan_week(request: &ScheduleRequest) -> PlanOutcome {
    let conflicts = analyze_conflicts(request);

    if conflicts.has_critical {
        warn!(critical = conflicts.critical.len(), "generation blocked by critical conflicts");
        return PlanOutcome::Blocked(conflicts);
    }
    if conflicts.has_warnings() && !request.proceed_with_warnings {
        warn!(warnings = conflicts.warnings.len(), "generation blocked by unaccepted warnings");
        return PlanOutcome::Blocked(conflicts);
    }

    let schedule = allocate(request);
    let stats = summarize(&schedule, &request.subjects);
    info!(
        days = request.days.len(),
        subjects = request.subjects.len(),
        hours = stats.total_scheduled_hours,
        efficiency = stats.efficiency,
        "schedule generated"
    );

    PlanOutcome::Scheduled(GeneratedSchedule {
        schedule,
        stats,
        conflicts,
    })
}

/// Wire shape shared by the HTTP service and the remote client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ScheduleStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<ConflictReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<PlanOutcome> for GenerationResponse {
    fn from(outcome: PlanOutcome) -> Self {
        match outcome {
            PlanOutcome::Scheduled(generated) => GenerationResponse {
                success: true,
                schedule: Some(generated.schedule),
                stats: Some(generated.stats),
                conflicts: Some(generated.conflicts),
                error: None,
            },
            PlanOutcome::Blocked(report) => {
                let error = if report.has_critical {
                    "Schedule has critical conflicts"
                } else {
                    "Schedule has warnings that were not accepted"
                };
                GenerationResponse {
                    success: false,
                    schedule: None,
                    stats: None,
                    conflicts: Some(report),
                    error: Some(error.to_string()),
                }
            }
        }
    }
}

impl GenerationResponse {
    /// Recovers a generated schedule from a successful response
    pub fn into_generated(self) -> Option<GeneratedSchedule> {
        if !self.success {
            return None;
        }
        Some(GeneratedSchedule {
            schedule: self.schedule?,
            stats: self.stats?,
            conflicts: self.conflicts.unwrap_or_default(),
        })
    }
}
