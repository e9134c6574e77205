//! Non-fatal conditions found while loading a program.
//!
//! Loading never stops on a duplicate or an unknown name: the offending
//! declaration is dropped or resolved to identity `0`, and a [`Diagnostic`]
//! is recorded so the caller can decide whether to accept the run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recorded loading condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Condition category.
    pub kind: DiagnosticKind,
    /// Kind of entity involved ("subject", "teacher", "curriculum", ...).
    pub entity: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of loading conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A name or key was declared twice; the later declaration was dropped.
    DuplicateDeclaration,
    /// A subject name could not be resolved; identity `0` was used.
    UnresolvableReference,
}

impl Diagnostic {
    /// A second declaration of an existing entity.
    pub fn duplicate(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::DuplicateDeclaration,
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// A reference to an unknown subject name.
    pub fn unresolved(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::UnresolvableReference,
            entity: entity.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.kind, self.entity, self.message)
    }
}

/// Collects diagnostics and mirrors each one to the log.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and logs it at `warn` level.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = ?diagnostic.kind,
            entity = %diagnostic.entity,
            "{}",
            diagnostic.message
        );
        self.items.push(diagnostic);
    }

    /// Diagnostics in the order recorded.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Number of diagnostics of `kind`.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the collector.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
