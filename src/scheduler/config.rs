//! Generator configuration.

use serde::{Deserialize, Serialize};

use crate::models::binomial;

/// How many randomized trials a group gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptBudget {
    /// `C(T, choose)` trials for `T` templates; fewer than `choose`
    /// templates give no trials.
    Combinations { choose: usize },
    /// A fixed number of trials.
    Fixed(usize),
}

impl Default for AttemptBudget {
    fn default() -> Self {
        AttemptBudget::Combinations { choose: 3 }
    }
}

impl AttemptBudget {
    /// Trials for a program with `template_count` templates.
    pub fn attempts(self, template_count: usize) -> usize {
        match self {
            AttemptBudget::Combinations { choose } => binomial(template_count, choose),
            AttemptBudget::Fixed(n) => n,
        }
    }
}

/// Configuration for [`Generator`](super::Generator).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Per-group trial cap.
    #[serde(default)]
    pub attempt_budget: AttemptBudget,
    /// Seed for reproducible runs; `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Default configuration: `C(T, 3)` trials, OS-seeded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the trial cap.
    pub fn with_attempt_budget(mut self, budget: AttemptBudget) -> Self {
        self.attempt_budget = budget;
        self
    }

    /// Caps every group at `attempts` trials.
    pub fn with_fixed_attempts(self, attempts: usize) -> Self {
        self.with_attempt_budget(AttemptBudget::Fixed(attempts))
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
