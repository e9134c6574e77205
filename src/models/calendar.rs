//! Weekly calendar models.
//!
//! The school week has seven days and each day two shifts. Lesson slots are
//! addressed by `(weekday, shift, lesson number)`, see [`SlotKey`](super::SlotKey).
//!
//! # Weekday notation
//! Allowed weekdays are written as concatenated two-letter abbreviations:
//! `"ПнСрПт"` = Monday, Wednesday, Friday. Matching is case-insensitive and
//! any text that is not an abbreviation is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the school week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in calendar order (Monday first).
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based position in the week (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Two-letter abbreviation used in curriculum declarations.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Weekday::Monday => "Пн",
            Weekday::Tuesday => "Вт",
            Weekday::Wednesday => "Ср",
            Weekday::Thursday => "Чт",
            Weekday::Friday => "Пт",
            Weekday::Saturday => "Сб",
            Weekday::Sunday => "Вс",
        }
    }

    /// Full day name.
    pub fn title(self) -> &'static str {
        match self {
            Weekday::Monday => "Понедельник",
            Weekday::Tuesday => "Вторник",
            Weekday::Wednesday => "Среда",
            Weekday::Thursday => "Четверг",
            Weekday::Friday => "Пятница",
            Weekday::Saturday => "Суббота",
            Weekday::Sunday => "Воскресенье",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A set of weekdays, stored as a 7-bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// The empty set.
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    /// Every day of the week.
    pub const FULL_WEEK: WeekdaySet = WeekdaySet(0b0111_1111);

    /// Creates an empty set.
    pub fn new() -> Self {
        Self::EMPTY
    }

    /// Parses an abbreviation string such as `"ПнСрПт"`.
    pub fn parse(days: &str) -> Self {
        let upper = days.to_uppercase();
        Weekday::ALL
            .iter()
            .filter(|day| upper.contains(&day.abbreviation().to_uppercase()))
            .fold(Self::EMPTY, |set, &day| set.with(day))
    }

    /// Returns the set with `day` added.
    pub fn with(mut self, day: Weekday) -> Self {
        self.insert(day);
        self
    }

    /// Adds a day.
    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.index();
    }

    /// Whether `day` is in the set.
    #[inline]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.index()) != 0
    }

    /// Set union.
    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether no day is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of days in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Days in calendar order.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        Weekday::ALL.into_iter().filter(move |&day| self.contains(day))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |set, day| set.with(day))
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in self.iter() {
            f.write_str(day.abbreviation())?;
        }
        Ok(())
    }
}

/// Half-day session a group studies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shift {
    /// First shift.
    Morning,
    /// Second shift.
    Afternoon,
}

impl Shift {
    /// Both shifts, morning first.
    pub const ALL: [Shift; 2] = [Shift::Morning, Shift::Afternoon];

    /// Zero-based index (`Morning` = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Morning => f.write_str("Утро"),
            Shift::Afternoon => f.write_str("Вечер"),
        }
    }
}
