//! Lesson-order templates.
//!
//! A combination lists subjects in lesson order for one shift: position 1 is
//! the first lesson. The same set of combinations is offered to every group.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::SubjectId;

/// Lesson number within a shift (1-based).
pub type LessonNumber = u8;

/// Most lessons a single template can place in one shift.
pub const MAX_LESSONS: usize = LessonNumber::MAX as usize;

/// One candidate arrangement of a shift's lessons.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Combination {
    subjects: Vec<SubjectId>,
}

impl Combination {
    /// Creates a template from subjects in lesson order.
    pub fn new(subjects: Vec<SubjectId>) -> Self {
        Self { subjects }
    }

    /// Subjects in lesson order.
    pub fn subjects(&self) -> &[SubjectId] {
        &self.subjects
    }

    /// Number of lessons.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the template has no lessons.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Whether every position has a lesson number, i.e. at most
    /// [`MAX_LESSONS`] lessons.
    pub fn fits_shift(&self) -> bool {
        self.subjects.len() <= MAX_LESSONS
    }

    /// `(lesson number, subject)` pairs in lesson order.
    ///
    /// Positions past [`MAX_LESSONS`] have no number and are not yielded;
    /// callers check [`fits_shift`](Self::fits_shift) first.
    pub fn lessons(&self) -> impl Iterator<Item = (LessonNumber, SubjectId)> + '_ {
        self.subjects
            .iter()
            .enumerate()
            .map_while(|(i, &subject)| LessonNumber::try_from(i + 1).ok().map(|n| (n, subject)))
    }

    /// How many lessons of each subject the combination contains.
    pub fn subject_counts(&self) -> BTreeMap<SubjectId, u32> {
        let mut counts = BTreeMap::new();
        for &subject in &self.subjects {
            *counts.entry(subject).or_insert(0) += 1;
        }
        counts
    }

    /// Whether any position refers to an unresolved subject.
    pub fn has_unresolved(&self) -> bool {
        self.subjects.iter().any(|s| !s.is_assigned())
    }
}

impl FromIterator<SubjectId> for Combination {
    fn from_iter<I: IntoIterator<Item = SubjectId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Number of `k`-element subsets of an `n`-element set.
///
/// Saturates at `usize::MAX` instead of overflowing.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
        if result > usize::MAX as u128 {
            return usize::MAX;
        }
    }
    result as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lessons_are_numbered_from_one() {
        let c: Combination = [SubjectId(2), SubjectId(1), SubjectId(2)].into_iter().collect();
        let lessons: Vec<_> = c.lessons().collect();
        assert_eq!(
            lessons,
            vec![(1, SubjectId(2)), (2, SubjectId(1)), (3, SubjectId(2))]
        );
    }

    #[test]
    fn test_shift_length_limit() {
        let longest = Combination::new(vec![SubjectId(1); MAX_LESSONS]);
        assert!(longest.fits_shift());
        assert_eq!(longest.lessons().count(), MAX_LESSONS);
        assert_eq!(longest.lessons().last(), Some((255, SubjectId(1))));

        let too_long = Combination::new(vec![SubjectId(1); MAX_LESSONS + 1]);
        assert!(!too_long.fits_shift());
    }

    #[test]
    fn test_subject_counts() {
        let c = Combination::new(vec![SubjectId(2), SubjectId(1), SubjectId(2)]);
        let counts = c.subject_counts();
        assert_eq!(counts[&SubjectId(2)], 2);
        assert_eq!(counts[&SubjectId(1)], 1);
        assert!(!c.has_unresolved());
        assert!(Combination::new(vec![SubjectId(0)]).has_unresolved());
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(0, 3), 0);
        assert_eq!(binomial(2, 3), 0);
        assert_eq!(binomial(3, 3), 1);
        assert_eq!(binomial(5, 3), 10);
        assert_eq!(binomial(10, 3), 120);
        assert_eq!(binomial(7, 0), 1);
    }
}
