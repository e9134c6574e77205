//! Timetabling domain models.
//!
//! Plain data plus the bookkeeping that keeps it consistent: identities,
//! the weekly calendar, curricula, lesson-order templates, groups, teachers
//! and their timetables. No search logic lives here.
//!
//! # Ownership
//!
//! | Type | Owned by | Mutated during search |
//! |------|----------|-----------------------|
//! | `Subject`, `Combination` | `Program` | never |
//! | `CurriculumEntry` | `Program` (copied per attempt as `GradePlan`) | the copy only |
//! | `GroupTimetable` | `Group` | on group success |
//! | `TeacherTimetable` | `Teacher` | on commit |

mod calendar;
mod combination;
mod curriculum;
mod group;
mod program;
mod subject;
mod teacher;
mod timetable;

pub use calendar::{Shift, Weekday, WeekdaySet};
pub use combination::{binomial, Combination, LessonNumber, MAX_LESSONS};
pub use curriculum::{Curriculum, CurriculumEntry, CurriculumKey, GradeId, GradePlan};
pub use group::{grade_of, Group, GroupId};
pub use program::{Program, SubjectAssignmentKey};
pub use subject::{Subject, SubjectId};
pub use teacher::{Teacher, TeacherId, TeacherSubject};
pub use timetable::{
    GroupLesson, GroupTimetable, SlotKey, SlotTaken, TeacherLesson, TeacherTimetable, Timetable,
};
