use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems, raised before any scheduling starts.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The configuration file could not be read.
    #[error("cannot read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document does not match the configuration schema.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A declaration carries a blank name.
    #[error("{entity} #{index} has an empty name")]
    EmptyName { entity: &'static str, index: usize },

    /// A lesson-order template lists no subjects.
    #[error("lesson-order template #{index} is empty")]
    EmptyTemplate { index: usize },

    /// A lesson-order template has more lessons than a shift can number.
    #[error("lesson-order template #{index} has {len} lessons, at most {max} allowed")]
    TemplateTooLong { index: usize, len: usize, max: usize },
}
