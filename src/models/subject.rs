//! Subject model.
//!
//! Subjects are identified by small positive integers assigned in
//! first-seen order while loading. Identity `0` is reserved for references
//! that could not be resolved.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SubjectId(pub u32);

impl SubjectId {
    /// Identity of an unknown subject.
    pub const UNASSIGNED: SubjectId = SubjectId(0);

    /// Whether this identity refers to a declared subject.
    #[inline]
    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subject#{}", self.0)
    }
}

/// A taught subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Display name, unique within a program.
    pub name: String,
    /// The subject should not be taught twice on one day.
    ///
    /// Carried for forward compatibility; the search does not consult it.
    pub no_split: bool,
    /// A teacher should face only one group per shift for this subject.
    ///
    /// Carried for forward compatibility; the search does not consult it.
    pub one_group: bool,
}

impl Subject {
    /// Creates a subject with both flags cleared.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            no_split: false,
            one_group: false,
        }
    }

    /// Sets the no-split flag.
    pub fn with_no_split(mut self, no_split: bool) -> Self {
        self.no_split = no_split;
        self
    }

    /// Sets the one-group flag.
    pub fn with_one_group(mut self, one_group: bool) -> Self {
        self.one_group = one_group;
        self
    }
}
