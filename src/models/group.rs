//! Student group model.

use super::{GradeId, GroupTimetable, Shift, TeacherId};

/// Free-form group label, e.g. `"5А"`.
pub type GroupId = String;

/// A cohort of students scheduled as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Grade whose curriculum the group follows.
    pub grade: GradeId,
    /// Shift the group studies in.
    pub shift: Shift,
    /// Teacher who declared the group.
    pub class_master: TeacherId,
    /// Lessons placed for the group.
    pub timetable: GroupTimetable,
}

impl Group {
    /// Creates a group with an empty timetable; the grade is derived from the label.
    pub fn new(label: &str, shift: Shift, class_master: TeacherId) -> Self {
        Self {
            grade: grade_of(label),
            shift,
            class_master,
            timetable: GroupTimetable::new(),
        }
    }

    /// Overrides the derived grade.
    pub fn with_grade(mut self, grade: impl Into<GradeId>) -> Self {
        self.grade = grade.into();
        self
    }

    /// Whether any lesson has been placed for the group.
    ///
    /// A group with an empty curriculum is scheduled without lessons; use
    /// [`GenerationReport::is_scheduled`](crate::scheduler::GenerationReport::is_scheduled)
    /// for the outcome of a run.
    pub fn has_lessons(&self) -> bool {
        !self.timetable.is_empty()
    }
}

/// Grade portion of a group label.
///
/// The leading run of decimal digits (`"10Б"` → `"10"`); labels that do not
/// start with a digit use their first character.
pub fn grade_of(label: &str) -> GradeId {
    let digits: String = label.chars().take_while(char::is_ascii_digit).collect();
    if !digits.is_empty() {
        return digits;
    }
    label.chars().next().map(String::from).unwrap_or_default()
}
