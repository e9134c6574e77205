//! Configuration input.
//!
//! [`Settings`] mirrors the declarative program document: subjects,
//! lesson-order templates, per-grade curricula and teachers. Parsing the
//! document format is the front end's job; this module accepts the parsed
//! structure (or JSON with the same shape) and [`load`] turns it into a
//! [`Program`](crate::models::Program).
//!
//! # Document shape
//!
//! ```json
//! {
//!   "subjects": [{ "name": "Рисунок", "no_split": "Да", "one_group": "Нет" }],
//!   "combinations": [{ "day_plan": "Рисунок, Рисунок" }],
//!   "grades": [{ "name": "5", "curriculum": [
//!       { "name": "Рисунок", "hours": 4, "days_of_week": "ПнСрПт" }
//!   ]}],
//!   "teachers": [{ "name": "Иванова", "morning": "5А,5Б", "occupations": [
//!       { "name": "Рисунок" }
//!   ]}]
//! }
//! ```

mod error;
mod loader;

pub use error::ConfigurationError;
pub use loader::{load, LoadedProgram};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::MAX_LESSONS;

/// `"Да"` / `"Нет"` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YesNo {
    #[serde(rename = "Да")]
    Yes,
    #[default]
    #[serde(rename = "Нет")]
    No,
}

impl YesNo {
    /// Whether the flag is `"Да"`.
    #[inline]
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

/// Root of the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Subject declarations; identities follow this order.
    #[serde(default)]
    pub subjects: Vec<SubjectDecl>,
    /// Lesson-order templates shared by all groups.
    #[serde(default)]
    pub combinations: Vec<CombinationDecl>,
    /// Per-grade curricula.
    #[serde(default)]
    pub grades: Vec<GradeDecl>,
    /// Teachers with their shift groups and occupations.
    #[serde(default)]
    pub teachers: Vec<TeacherDecl>,
}

/// Subject declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectDecl {
    /// Subject name, unique across the document.
    pub name: String,
    /// Lessons of the subject must not be split across the day.
    #[serde(default)]
    pub no_split: YesNo,
    /// The subject is taught to one group at a time.
    #[serde(default)]
    pub one_group: YesNo,
}

/// Lesson-order template: comma-separated subject names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationDecl {
    /// Subjects in lesson order, e.g. `"Рисунок, Лепка"`.
    pub day_plan: String,
}

/// Curriculum of one grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeDecl {
    /// Grade name, matched against the leading part of group labels.
    pub name: String,
    /// Curriculum lines of the grade.
    #[serde(default)]
    pub curriculum: Vec<CurriculumDecl>,
}

/// One curriculum line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumDecl {
    /// Subject name.
    pub name: String,
    /// Weekly hours.
    pub hours: u32,
    /// Allowed weekdays, e.g. `"ПнСрПт"`.
    #[serde(default)]
    pub days_of_week: String,
}

/// Teacher declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherDecl {
    /// Teacher name, unique across the document.
    pub name: String,
    /// Morning groups, comma-separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning: Option<String>,
    /// Afternoon groups, comma-separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afternoon: Option<String>,
    /// Subjects the teacher teaches.
    #[serde(default)]
    pub occupations: Vec<OccupationDecl>,
}

/// A subject the teacher teaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationDecl {
    /// Subject name.
    pub name: String,
    /// Teacher may be matched to any group needing the subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_groups: Option<YesNo>,
    /// Explicit groups, comma-separated; defaults to the teacher's shift groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_list: Option<String>,
}

impl Settings {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Structural checks that make a document unusable.
    ///
    /// Duplicates and unknown names are not errors; they surface as
    /// diagnostics during [`load`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(index) = self.subjects.iter().position(|s| s.name.trim().is_empty()) {
            return Err(ConfigurationError::EmptyName {
                entity: "subject",
                index,
            });
        }
        if let Some(index) = self.grades.iter().position(|g| g.name.trim().is_empty()) {
            return Err(ConfigurationError::EmptyName {
                entity: "grade",
                index,
            });
        }
        if let Some(index) = self.teachers.iter().position(|t| t.name.trim().is_empty()) {
            return Err(ConfigurationError::EmptyName {
                entity: "teacher",
                index,
            });
        }
        if let Some(index) = self
            .combinations
            .iter()
            .position(|c| split_list(&c.day_plan).next().is_none())
        {
            return Err(ConfigurationError::EmptyTemplate { index });
        }
        for (index, decl) in self.combinations.iter().enumerate() {
            let len = split_list(&decl.day_plan).count();
            if len > MAX_LESSONS {
                return Err(ConfigurationError::TemplateTooLong {
                    index,
                    len,
                    max: MAX_LESSONS,
                });
            }
        }
        Ok(())
    }
}

/// Splits a comma-separated list, trimming items and skipping blanks.
pub(crate) fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|item| !item.is_empty())
}
