//! Weekly school timetable generator.
//!
//! Turns a parsed school configuration (subjects, per-grade curricula,
//! lesson-order templates, teachers and their teaching assignments) into a
//! weekly teacher timetable, resolving free-choice teacher assignments on
//! the fly. Groups that cannot be placed are reported as gaps instead of
//! failing the run.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Program`, `Group`, `Teacher`, `Subject`,
//!   `Combination`, `Timetable`, `Weekday`, `Shift`
//! - **`config`**: Configuration input (`Settings`) and the loader that builds a `Program`
//! - **`diagnostics`**: Non-fatal conditions found while loading
//! - **`scheduler`**: Per-group randomized search, teacher resolution, commit
//! - **`projection`**: `ScheduleDocument`, the per-teacher output shape
//! - **`validation`**: Double-booking checks over a `ScheduleDocument`
//!
//! # References
//!
//! - de Werra (1985), "An introduction to timetabling"
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//!
//! # Example
//!
//! ```
//! use u_timetable::config::Settings;
//! use u_timetable::scheduler::GeneratorConfig;
//!
//! let settings = Settings::from_json_str(r#"{
//!     "subjects": [{"name": "Рисунок"}],
//!     "combinations": [{"day_plan": "Рисунок"}],
//!     "grades": [{"name": "5", "curriculum": [{"name": "Рисунок", "hours": 1, "days_of_week": "ПнСр"}]}],
//!     "teachers": [{"name": "Иванова", "morning": "5А",
//!                   "occupations": [{"name": "Рисунок", "any_groups": "Нет", "group_list": "5А"}]}]
//! }"#).unwrap();
//!
//! // A single template yields C(1, 3) = 0 trials by default.
//! let config = GeneratorConfig::new().with_seed(7).with_fixed_attempts(3);
//! let outcome = u_timetable::generate_schedule(&settings, config).unwrap();
//! assert!(outcome.report.is_complete());
//! assert_eq!(outcome.schedule.lesson_count(), 1);
//! ```

pub mod config;
pub mod diagnostics;
pub mod models;
pub mod projection;
pub mod scheduler;
pub mod validation;

use config::{ConfigurationError, Settings};
use scheduler::{GenerationOutcome, Generator, GeneratorConfig};

/// Loads `settings`, generates every group and projects the teacher
/// timetables.
///
/// Only an invalid configuration is an error; unscheduled groups are listed
/// in the report of the returned outcome.
pub fn generate_schedule(
    settings: &Settings,
    config: GeneratorConfig,
) -> Result<GenerationOutcome, ConfigurationError> {
    Generator::new(config).run(settings)
}
