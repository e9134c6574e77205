//! Timetable search and commit.
//!
//! # Algorithm
//!
//! `Generator` visits groups in random order. For each group a randomized,
//! retry-bounded search tries to cover the grade's curriculum with one
//! lesson-order template per weekday, checking teacher vacancy against the
//! shared teacher timetables. A successful group is committed at once; a
//! group that exhausts its trials becomes a [`SchedulingGap`].
//!
//! The search is not exhaustive and not optimizing: it stops at the first
//! feasible week it finds, and the trial cap is a heuristic.
//!
//! # Shared state
//!
//! Teacher timetables are read by every vacancy check and written only by
//! [`merge_into_teacher_timetable`], which re-validates every slot before
//! writing.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod config;
mod engine;
mod group;
mod report;
mod staffing;

pub use config::{AttemptBudget, GeneratorConfig};
pub use engine::{merge_into_teacher_timetable, CommitConflict, Generator};
pub use report::{GapReason, GenerationOutcome, GenerationReport, SchedulingGap};
