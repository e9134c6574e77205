//! Per-group randomized search.
//!
//! # Algorithm
//!
//! Each trial shuffles the template order and walks the week Monday to
//! Sunday. On each day the first unused template that passes every check is
//! placed:
//!
//! 1. All its subjects are in the grade's curriculum.
//! 2. No subject appears more often than it has hours left.
//! 3. The day is allowed for at least one of its subjects.
//! 4. Teachers bound to its lessons are free in the shared timetable.
//! 5. Every unbound lesson gets a free pool teacher.
//!
//! Templates with more lessons than a shift can number are never placed.
//!
//! A trial succeeds when no curriculum hours remain. Trials work on a copy
//! of the grade plan and never touch shared state; the caller commits the
//! winning timetable.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::staffing;
use crate::models::{
    Combination, GradePlan, GroupLesson, GroupTimetable, LessonNumber, Program, Shift, SlotKey,
    SubjectId, TeacherId, Weekday,
};

/// Result of searching one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GroupOutcome {
    Scheduled {
        timetable: GroupTimetable,
        attempts: usize,
    },
    Exhausted {
        attempts: usize,
        remaining_hours: u32,
    },
}

/// Searches a timetable for `group_id` with at most `attempts` trials.
///
/// Reads the shared teacher timetables through `program`; writes nothing.
pub(crate) fn schedule_group<R: Rng + ?Sized>(
    program: &Program,
    group_id: &str,
    attempts: usize,
    rng: &mut R,
) -> GroupOutcome {
    let Some(group) = program.groups.get(group_id) else {
        return GroupOutcome::Exhausted {
            attempts: 0,
            remaining_hours: 0,
        };
    };
    let search = GroupSearch {
        program,
        group_id,
        shift: group.shift,
        plan: program.grade_plan(&group.grade),
    };

    let mut order: Vec<usize> = (0..program.combinations.len()).collect();
    let mut best_remaining = search.plan.remaining_hours();

    for attempt in 1..=attempts {
        order.shuffle(rng);
        match search.trial(&order, rng) {
            Ok(timetable) => {
                debug!(group = group_id, attempt, lessons = timetable.len(), "group scheduled");
                return GroupOutcome::Scheduled {
                    timetable,
                    attempts: attempt,
                };
            }
            Err(remaining) => {
                best_remaining = best_remaining.min(remaining);
                debug!(group = group_id, attempt, remaining, "trial rejected");
            }
        }
    }

    GroupOutcome::Exhausted {
        attempts,
        remaining_hours: best_remaining,
    }
}

struct GroupSearch<'a> {
    program: &'a Program,
    group_id: &'a str,
    shift: Shift,
    plan: GradePlan,
}

impl GroupSearch<'_> {
    /// One pass over the week; `Err` carries the hours left unplaced.
    fn trial<R: Rng + ?Sized>(&self, order: &[usize], rng: &mut R) -> Result<GroupTimetable, u32> {
        let mut plan = self.plan.clone();
        let mut timetable = GroupTimetable::new();
        let mut used = vec![false; self.program.combinations.len()];

        for weekday in Weekday::ALL {
            for &index in order {
                if used[index] {
                    continue;
                }
                let combination = &self.program.combinations[index];
                if !combination.fits_shift() {
                    continue;
                }
                let counts = combination.subject_counts();
                if !fits_plan(&plan, &counts, weekday) {
                    continue;
                }
                let Some(lessons) = self.staff(combination, weekday, rng) else {
                    continue;
                };

                for (&subject, &count) in &counts {
                    plan.consume(subject, count);
                }
                for (number, subject, teacher) in lessons {
                    let inserted = timetable.insert(
                        SlotKey::new(weekday, self.shift, number),
                        GroupLesson { subject, teacher },
                    );
                    debug_assert!(inserted.is_ok(), "one template per day");
                }
                used[index] = true;
                debug!(group = self.group_id, %weekday, template = index, "template placed");
                break;
            }
        }

        match plan.remaining_hours() {
            0 => Ok(timetable),
            remaining => Err(remaining),
        }
    }

    /// Teachers for every lesson of `combination` on `weekday`, or `None`
    /// if some lesson cannot be staffed.
    fn staff<R: Rng + ?Sized>(
        &self,
        combination: &Combination,
        weekday: Weekday,
        rng: &mut R,
    ) -> Option<Vec<(LessonNumber, SubjectId, TeacherId)>> {
        let mut lessons: Vec<(LessonNumber, SubjectId, TeacherId)> = combination
            .lessons()
            .map(|(n, subject)| {
                let teacher = self
                    .program
                    .assigned_teacher(self.group_id, subject)
                    .unwrap_or(TeacherId::UNASSIGNED);
                (n, subject, teacher)
            })
            .collect();

        let bound_free = lessons
            .iter()
            .filter(|(_, _, teacher)| teacher.is_assigned())
            .all(|&(n, _, teacher)| {
                staffing::is_vacant(self.program, teacher, weekday, self.shift, &[n])
            });
        if !bound_free {
            return None;
        }

        staffing::resolve_unbound(self.program, weekday, self.shift, &mut lessons, rng)
            .then_some(lessons)
    }
}

/// Curriculum checks 1–3 for a template with the given subject counts.
fn fits_plan(plan: &GradePlan, counts: &BTreeMap<SubjectId, u32>, weekday: Weekday) -> bool {
    let mut allowed = false;
    for (&subject, &count) in counts {
        if !subject.is_assigned() {
            return false;
        }
        let Some(entry) = plan.get(subject) else {
            return false;
        };
        if count > entry.hours {
            return false;
        }
        allowed |= entry.weekdays.contains(weekday);
    }
    allowed
}
