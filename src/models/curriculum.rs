//! Curriculum model.
//!
//! A curriculum line states how many weekly hours a grade studies a subject
//! and on which weekdays the subject may appear. The hour counter is the
//! mutable part: the search decrements it as lessons are placed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{SubjectId, WeekdaySet};

/// Grade portion of a group label (e.g. `"5"` for group `"5А"`).
pub type GradeId = String;

/// Curriculum lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurriculumKey {
    /// Grade the line belongs to.
    pub grade: GradeId,
    /// Subject taught.
    pub subject: SubjectId,
}

impl CurriculumKey {
    /// Creates a key.
    pub fn new(grade: impl Into<GradeId>, subject: SubjectId) -> Self {
        Self {
            grade: grade.into(),
            subject,
        }
    }
}

/// Weekly demand for one subject in one grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumEntry {
    /// Weekly hours still to be placed.
    pub hours: u32,
    /// Weekdays on which the subject may be taught.
    pub weekdays: WeekdaySet,
}

impl CurriculumEntry {
    /// Creates an entry with `hours` per week on `weekdays`.
    pub fn new(hours: u32, weekdays: WeekdaySet) -> Self {
        Self { hours, weekdays }
    }
}

/// Curriculum of every grade.
pub type Curriculum = BTreeMap<CurriculumKey, CurriculumEntry>;

/// Curriculum of a single grade, keyed by subject.
///
/// The search works on a private copy of this per attempt so that a failed
/// attempt leaves the shared curriculum untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradePlan {
    entries: BTreeMap<SubjectId, CurriculumEntry>,
}

impl GradePlan {
    /// Extracts the lines of `grade` from a full curriculum.
    pub fn for_grade(curriculum: &Curriculum, grade: &str) -> Self {
        let entries = curriculum
            .iter()
            .filter(|(key, _)| key.grade == grade)
            .map(|(key, entry)| (key.subject, *entry))
            .collect();
        Self { entries }
    }

    /// Entry of `subject`, if the grade studies it.
    pub fn get(&self, subject: SubjectId) -> Option<&CurriculumEntry> {
        self.entries.get(&subject)
    }

    /// Whether the grade studies `subject`.
    pub fn contains(&self, subject: SubjectId) -> bool {
        self.entries.contains_key(&subject)
    }

    /// Hours still to be placed for `subject` (0 when absent).
    pub fn hours(&self, subject: SubjectId) -> u32 {
        self.entries.get(&subject).map_or(0, |e| e.hours)
    }

    /// Takes `count` hours off `subject`.
    ///
    /// Saturates at zero; callers check the budget first.
    pub fn consume(&mut self, subject: SubjectId, count: u32) {
        if let Some(entry) = self.entries.get_mut(&subject) {
            entry.hours = entry.hours.saturating_sub(count);
        }
    }

    /// Sum of remaining hours over all subjects.
    pub fn remaining_hours(&self) -> u32 {
        self.entries.values().map(|e| e.hours).sum()
    }

    /// Whether the grade has no curriculum lines.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(subject, entry)` pairs in subject order.
    pub fn iter(&self) -> impl Iterator<Item = (SubjectId, &CurriculumEntry)> {
        self.entries.iter().map(|(s, e)| (*s, e))
    }
}
