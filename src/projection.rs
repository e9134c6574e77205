//! Schedule document.
//!
//! The external shape of a generated timetable: one entry per teacher, a
//! fixed slot per weekday, and per day an optional morning and afternoon
//! part listing lessons by number. The serializer of the front end
//! consumes this; [`ScheduleDocument::to_json_pretty`] is provided for
//! tooling and tests.
//!
//! Mapping is lossless in both directions for the lesson tuples
//! `(teacher, weekday, shift, number, subject, group)`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    LessonNumber, Program, Shift, SlotKey, SlotTaken, TeacherId, TeacherLesson, TeacherTimetable,
    Weekday,
};

/// Teacher schedules of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    /// One entry per teacher, in identity order.
    pub teachers: Vec<TeacherSchedule>,
}

/// Week of one teacher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherSchedule {
    /// Teacher name.
    pub name: String,
    /// Indexed by [`Weekday::index`].
    pub days: [DaySchedule; 7],
}

/// One day with its two optional shift parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Morning lessons, absent when the teacher has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning: Option<Vec<Lesson>>,
    /// Afternoon lessons, absent when the teacher has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afternoon: Option<Vec<Lesson>>,
}

/// A lesson as seen by a teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Lesson number within the shift.
    pub number: LessonNumber,
    /// Subject name.
    pub subject: String,
    /// Group label.
    pub group: String,
}

/// Flat form of a scheduled lesson, used to compare timetables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LessonRecord {
    /// Teacher name.
    pub teacher: String,
    /// Weekday of the lesson.
    pub weekday: Weekday,
    /// Shift of the lesson.
    pub shift: Shift,
    /// Lesson number within the shift.
    pub number: LessonNumber,
    /// Subject name.
    pub subject: String,
    /// Group label.
    pub group: String,
}

/// Failure to map a document back onto a program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("unknown teacher '{0}'")]
    UnknownTeacher(String),
    #[error("unknown subject '{0}'")]
    UnknownSubject(String),
    #[error("teacher '{teacher}': {source}")]
    DoubleBooked {
        teacher: String,
        #[source]
        source: SlotTaken,
    },
}

impl DaySchedule {
    /// Lessons of one shift, if the part exists.
    pub fn part(&self, shift: Shift) -> Option<&[Lesson]> {
        match shift {
            Shift::Morning => self.morning.as_deref(),
            Shift::Afternoon => self.afternoon.as_deref(),
        }
    }

    /// Lessons of one shift, creating the part when missing.
    pub fn part_mut(&mut self, shift: Shift) -> &mut Vec<Lesson> {
        match shift {
            Shift::Morning => self.morning.get_or_insert_with(Vec::new),
            Shift::Afternoon => self.afternoon.get_or_insert_with(Vec::new),
        }
    }

    /// Whether neither shift part exists.
    pub fn is_empty(&self) -> bool {
        self.morning.is_none() && self.afternoon.is_none()
    }
}

impl TeacherSchedule {
    /// Creates a schedule with seven empty days.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Schedule of one weekday.
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        &self.days[weekday.index()]
    }

    /// Mutable schedule of one weekday.
    pub fn day_mut(&mut self, weekday: Weekday) -> &mut DaySchedule {
        &mut self.days[weekday.index()]
    }

    /// `(slot, lesson)` pairs in document order.
    pub fn lessons(&self) -> impl Iterator<Item = (SlotKey, &Lesson)> {
        Weekday::ALL.into_iter().flat_map(move |weekday| {
            Shift::ALL.into_iter().flat_map(move |shift| {
                self.day(weekday)
                    .part(shift)
                    .unwrap_or_default()
                    .iter()
                    .map(move |l| (SlotKey::new(weekday, shift, l.number), l))
            })
        })
    }

    /// Number of lessons over the week.
    pub fn lesson_count(&self) -> usize {
        self.lessons().count()
    }
}

impl ScheduleDocument {
    /// Projects the teacher timetables of `program`.
    ///
    /// Teachers appear in identity order, including those without lessons.
    pub fn from_program(program: &Program) -> Self {
        let teachers = program
            .teachers
            .values()
            .map(|teacher| {
                let mut schedule = TeacherSchedule::new(teacher.name.clone());
                for (slot, lesson) in teacher.timetable.iter() {
                    schedule
                        .day_mut(slot.weekday)
                        .part_mut(slot.shift)
                        .push(Lesson {
                            number: slot.number,
                            subject: program
                                .subject_name(lesson.subject)
                                .unwrap_or_default()
                                .to_string(),
                            group: lesson.group.clone(),
                        });
                }
                schedule
            })
            .collect();
        Self { teachers }
    }

    /// Maps the document back to teacher timetables of `program`.
    pub fn to_teacher_timetables(
        &self,
        program: &Program,
    ) -> Result<BTreeMap<TeacherId, TeacherTimetable>, ProjectionError> {
        let mut result = BTreeMap::new();
        for schedule in &self.teachers {
            let id = program
                .teacher_id(&schedule.name)
                .ok_or_else(|| ProjectionError::UnknownTeacher(schedule.name.clone()))?;
            let mut timetable = TeacherTimetable::new();
            for (slot, lesson) in schedule.lessons() {
                let subject = program
                    .subject_id(&lesson.subject)
                    .ok_or_else(|| ProjectionError::UnknownSubject(lesson.subject.clone()))?;
                let entry = TeacherLesson {
                    subject,
                    group: lesson.group.clone(),
                };
                timetable
                    .insert(slot, entry)
                    .map_err(|source| ProjectionError::DoubleBooked {
                        teacher: schedule.name.clone(),
                        source,
                    })?;
            }
            result.insert(id, timetable);
        }
        Ok(result)
    }

    /// Every lesson as a flat record.
    pub fn records(&self) -> BTreeSet<LessonRecord> {
        self.teachers
            .iter()
            .flat_map(|t| {
                t.lessons().map(move |(slot, l)| LessonRecord {
                    teacher: t.name.clone(),
                    weekday: slot.weekday,
                    shift: slot.shift,
                    number: slot.number,
                    subject: l.subject.clone(),
                    group: l.group.clone(),
                })
            })
            .collect()
    }

    /// Number of lessons over all teachers.
    pub fn lesson_count(&self) -> usize {
        self.teachers.iter().map(TeacherSchedule::lesson_count).sum()
    }

    /// Serializes the document as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a document from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Every lesson in the teacher timetables of `program` as a flat record.
pub fn program_records(program: &Program) -> BTreeSet<LessonRecord> {
    program
        .teachers
        .values()
        .flat_map(|teacher| {
            teacher.timetable.iter().map(move |(slot, lesson)| LessonRecord {
                teacher: teacher.name.clone(),
                weekday: slot.weekday,
                shift: slot.shift,
                number: slot.number,
                subject: program
                    .subject_name(lesson.subject)
                    .unwrap_or_default()
                    .to_string(),
                group: lesson.group.clone(),
            })
        })
        .collect()
}
