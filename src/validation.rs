//! Independent checks over a schedule document.
//!
//! Re-detects, from the document alone, the conflicts the generator must
//! never produce:
//! - A teacher listed twice
//! - A teacher with two lessons in one slot
//! - A group facing two lessons in one slot (from different teachers or
//!   the same one)
//!
//! Useful as an oracle over generated output and for documents edited by
//! hand.

use std::collections::{HashMap, HashSet};

use crate::models::SlotKey;
use crate::projection::ScheduleDocument;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A detected conflict.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Slot involved, when the conflict is slot-specific.
    pub slot: Option<SlotKey>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of schedule conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two teacher entries share a name.
    DuplicateTeacher,
    /// A teacher has more than one lesson in a slot.
    TeacherDoubleBooked,
    /// A group has more than one lesson in a slot.
    GroupDoubleBooked,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, slot: Option<SlotKey>, message: impl Into<String>) -> Self {
        Self {
            kind,
            slot,
            message: message.into(),
        }
    }
}

/// Checks a schedule document for double bookings.
///
/// # Returns
/// `Ok(())` if no conflicts exist, `Err(errors)` with every conflict found.
pub fn check_schedule(document: &ScheduleDocument) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for teacher in &document.teachers {
        if !names.insert(teacher.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTeacher,
                None,
                format!("Teacher '{}' appears more than once", teacher.name),
            ));
        }
    }

    // Group → slot → first teacher seen there.
    let mut group_slots: HashMap<(&str, SlotKey), &str> = HashMap::new();

    for teacher in &document.teachers {
        let mut own_slots = HashSet::new();
        for (slot, lesson) in teacher.lessons() {
            if !own_slots.insert(slot) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::TeacherDoubleBooked,
                    Some(slot),
                    format!("Teacher '{}' has two lessons at {slot}", teacher.name),
                ));
            }
            if let Some(other) = group_slots.insert((lesson.group.as_str(), slot), teacher.name.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::GroupDoubleBooked,
                    Some(slot),
                    format!(
                        "Group '{}' has lessons with '{other}' and '{}' at {slot}",
                        lesson.group, teacher.name
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
