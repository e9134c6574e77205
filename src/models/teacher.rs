//! Teacher model.
//!
//! A teacher either teaches a subject to a fixed set of groups, or is
//! willing to take any group that needs the subject ("auto-select").

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::{GroupId, SubjectId, TeacherTimetable, Weekday};

/// Teacher identity. `0` is reserved for "no teacher".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TeacherId(pub u32);

impl TeacherId {
    /// Placeholder for a lesson without a teacher.
    pub const UNASSIGNED: TeacherId = TeacherId(0);

    /// Whether this is a real teacher rather than `UNASSIGNED`.
    #[inline]
    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "teacher#{}", self.0)
    }
}

/// How a teacher covers one subject.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeacherSubject {
    /// Teacher is drawn from the pool for any group.
    pub autoselect_groups: bool,
    /// Fixed groups; empty when `autoselect_groups` is set.
    pub groups: BTreeSet<GroupId>,
}

impl TeacherSubject {
    /// Auto-select occupation.
    pub fn any_groups() -> Self {
        Self {
            autoselect_groups: true,
            groups: BTreeSet::new(),
        }
    }

    /// Occupation bound to explicit groups.
    pub fn for_groups(groups: impl IntoIterator<Item = GroupId>) -> Self {
        Self {
            autoselect_groups: false,
            groups: groups.into_iter().collect(),
        }
    }
}

/// A teacher and their weekly commitments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Teacher {
    /// Teacher name.
    pub name: String,
    /// Subjects taught, with the groups each applies to.
    pub subjects: BTreeMap<SubjectId, TeacherSubject>,
    /// Lessons committed for the teacher.
    pub timetable: TeacherTimetable,
}

impl Teacher {
    /// Creates a teacher with no subjects and an empty timetable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds or replaces a subject occupation.
    pub fn with_subject(mut self, subject: SubjectId, occupation: TeacherSubject) -> Self {
        self.subjects.insert(subject, occupation);
        self
    }

    /// Whether the teacher teaches `subject`.
    pub fn teaches(&self, subject: SubjectId) -> bool {
        self.subjects.contains_key(&subject)
    }

    /// Whether the teacher already has a lesson on `weekday`.
    pub fn is_busy_on(&self, weekday: Weekday) -> bool {
        self.timetable.has_lessons_on(weekday)
    }
}
