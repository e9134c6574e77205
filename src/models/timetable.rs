//! Timetables.
//!
//! A timetable maps lesson slots to lessons with at most one lesson per
//! slot. Groups and teachers each own one; they differ only in what a
//! lesson records (the teacher for a group, the group for a teacher).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{GroupId, LessonNumber, Shift, SubjectId, TeacherId, Weekday};

/// Address of a lesson slot in the week.
///
/// Orders by weekday, then shift, then lesson number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    /// Day of the week.
    pub weekday: Weekday,
    /// Morning or afternoon.
    pub shift: Shift,
    /// Lesson number within the shift, starting at 1.
    pub number: LessonNumber,
}

impl SlotKey {
    /// Creates a slot key.
    pub fn new(weekday: Weekday, shift: Shift, number: LessonNumber) -> Self {
        Self {
            weekday,
            shift,
            number,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/#{}", self.weekday, self.shift, self.number)
    }
}

/// A lesson in a group timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLesson {
    /// Subject taught.
    pub subject: SubjectId,
    /// Teacher giving the lesson.
    pub teacher: TeacherId,
}

/// A lesson in a teacher timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherLesson {
    /// Subject taught.
    pub subject: SubjectId,
    /// Group attending the lesson.
    pub group: GroupId,
}

/// Attempt to place a second lesson into an occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("slot {key} is already occupied")]
pub struct SlotTaken {
    /// The occupied slot.
    pub key: SlotKey,
}

/// Slot → lesson mapping with at most one lesson per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable<T> {
    slots: BTreeMap<SlotKey, T>,
}

/// Timetable of a group.
pub type GroupTimetable = Timetable<GroupLesson>;

/// Timetable of a teacher.
pub type TeacherTimetable = Timetable<TeacherLesson>;

impl<T> Default for Timetable<T> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<T> Timetable<T> {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a lesson into a free slot.
    pub fn insert(&mut self, key: SlotKey, lesson: T) -> Result<(), SlotTaken> {
        if self.slots.contains_key(&key) {
            return Err(SlotTaken { key });
        }
        self.slots.insert(key, lesson);
        Ok(())
    }

    /// Lesson at `key`, if any.
    pub fn get(&self, key: &SlotKey) -> Option<&T> {
        self.slots.get(key)
    }

    /// Whether the slot holds a lesson.
    #[inline]
    pub fn is_occupied(&self, key: &SlotKey) -> bool {
        self.slots.contains_key(key)
    }

    /// Whether any lesson falls on `weekday`, in either shift.
    pub fn has_lessons_on(&self, weekday: Weekday) -> bool {
        self.on_day(weekday).next().is_some()
    }

    /// Lessons of one weekday in slot order.
    pub fn on_day(&self, weekday: Weekday) -> impl Iterator<Item = (&SlotKey, &T)> {
        self.slots.iter().filter(move |(key, _)| key.weekday == weekday)
    }

    /// All lessons in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &T)> {
        self.slots.iter()
    }

    /// Number of lessons.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no lesson is placed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Removes every lesson.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl GroupTimetable {
    /// Number of lessons of `subject` over the week.
    pub fn count_subject(&self, subject: SubjectId) -> usize {
        self.slots.values().filter(|l| l.subject == subject).count()
    }
}
