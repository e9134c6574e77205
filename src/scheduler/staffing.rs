//! Teacher selection for lessons without a fixed binding.
//!
//! Candidates come from the subject's auto-select pool and must be free in
//! the shared teacher timetable at every position the subject occupies that
//! day. A candidate who already teaches on the same weekday is preferred so
//! that teachers come in on fewer days; otherwise the pick is uniform.
//!
//! Selections are trial-local: nothing is written to teacher timetables
//! here.

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::models::{LessonNumber, Program, Shift, SlotKey, SubjectId, TeacherId, Weekday};

/// Whether `teacher` is free at every listed position.
pub(crate) fn is_vacant(
    program: &Program,
    teacher: TeacherId,
    weekday: Weekday,
    shift: Shift,
    positions: &[LessonNumber],
) -> bool {
    let Some(teacher) = program.teachers.get(&teacher) else {
        return false;
    };
    positions
        .iter()
        .all(|&n| !teacher.timetable.is_occupied(&SlotKey::new(weekday, shift, n)))
}

/// Picks a pool teacher for `subject` at `positions`.
///
/// Returns `None` when the pool is empty or nobody is free at all positions.
pub(crate) fn pick_teacher<R: Rng + ?Sized>(
    program: &Program,
    subject: SubjectId,
    weekday: Weekday,
    shift: Shift,
    positions: &[LessonNumber],
    rng: &mut R,
) -> Option<TeacherId> {
    let vacant: Vec<TeacherId> = program
        .autoselect_pool(subject)
        .iter()
        .copied()
        .filter(|&t| is_vacant(program, t, weekday, shift, positions))
        .collect();

    let same_day = vacant.iter().copied().find(|t| {
        program
            .teachers
            .get(t)
            .is_some_and(|teacher| teacher.is_busy_on(weekday))
    });
    same_day.or_else(|| vacant.choose(rng).copied())
}

/// Fills every unassigned teacher in `lessons`, one teacher per subject.
///
/// `lessons` holds `(position, subject, teacher)`. On failure the slice may
/// be partially filled and must be discarded.
pub(crate) fn resolve_unbound<R: Rng + ?Sized>(
    program: &Program,
    weekday: Weekday,
    shift: Shift,
    lessons: &mut [(LessonNumber, SubjectId, TeacherId)],
    rng: &mut R,
) -> bool {
    let mut unbound: BTreeMap<SubjectId, Vec<LessonNumber>> = BTreeMap::new();
    for &(n, subject, teacher) in lessons.iter() {
        if !teacher.is_assigned() {
            unbound.entry(subject).or_default().push(n);
        }
    }

    for (subject, positions) in unbound {
        let Some(teacher) = pick_teacher(program, subject, weekday, shift, &positions, rng) else {
            return false;
        };
        for lesson in lessons.iter_mut() {
            if lesson.1 == subject && !lesson.2.is_assigned() {
                lesson.2 = teacher;
            }
        }
    }
    true
}
