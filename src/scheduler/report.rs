//! Generation results.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::models::{GradeId, GroupId, SlotKey, TeacherId};
use crate::projection::ScheduleDocument;

/// Why a group was left unscheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapReason {
    /// No trial placed every curriculum hour.
    AttemptsExhausted,
    /// A trial succeeded but a teacher slot was taken at commit time.
    CommitConflict { teacher: TeacherId, slot: SlotKey },
}

/// A group that could not be fully scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingGap {
    /// Group label.
    pub group: GroupId,
    /// Grade the group follows.
    pub grade: GradeId,
    /// Trials made.
    pub attempts: usize,
    /// Fewest unplaced hours over all trials (the full demand if none ran).
    pub remaining_hours: u32,
    /// Why the group was left unscheduled.
    pub reason: GapReason,
}

/// Per-run summary of the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Fully scheduled groups, in processing order.
    pub scheduled: Vec<GroupId>,
    /// Unscheduled groups, in processing order.
    pub gaps: Vec<SchedulingGap>,
    /// Trial cap applied to each group.
    pub attempt_budget: usize,
    /// Lessons written to teacher timetables.
    pub committed_lessons: usize,
}

impl GenerationReport {
    /// Whether every group was scheduled.
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Gap recorded for `group`, if any.
    pub fn gap_for(&self, group: &str) -> Option<&SchedulingGap> {
        self.gaps.iter().find(|g| g.group == group)
    }

    /// Whether `group` was fully scheduled.
    pub fn is_scheduled(&self, group: &str) -> bool {
        self.scheduled.iter().any(|g| g == group)
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Teacher schedule for the serializer.
    pub schedule: ScheduleDocument,
    /// Scheduled groups and gaps.
    pub report: GenerationReport,
    /// Loading conditions.
    pub diagnostics: Vec<Diagnostic>,
}
