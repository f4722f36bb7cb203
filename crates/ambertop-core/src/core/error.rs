use thiserror::Error;

/// Represents a violated contract while decoding a prmtop file.
///
/// Every variant is fatal: decoding stops at the first error and the caller
/// never receives a partially populated model. The enum is `Clone` so that a
/// memoized failure can be handed out to every later caller of the same
/// accessor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrmtopError {
    /// A `%FORMAT(...)` descriptor is absent or does not match the grammar.
    #[error("Invalid format descriptor for section '{flag}': '{descriptor}'")]
    Format { flag: String, descriptor: String },

    /// A required section is absent, or data appeared before any `%FLAG`.
    #[error("Missing section: {0}")]
    SectionMissing(String),

    /// A pointer label outside the fixed list of 30 was requested.
    #[error("Unknown pointer label: '{0}'")]
    PointerIndex(String),

    /// Counts, indices or orderings disagree with each other.
    #[error("Inconsistent data in section '{section}': {message}")]
    DataConsistency { section: String, message: String },

    /// The file uses a feature this decoder does not model.
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// A token could not be parsed as the expected numeric type.
    #[error("Invalid {expected} token '{token}' at position {position} of section '{section}'")]
    InvalidToken {
        section: String,
        position: usize,
        token: String,
        expected: &'static str,
    },
}

impl PrmtopError {
    pub(crate) fn inconsistent(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataConsistency {
            section: section.into(),
            message: message.into(),
        }
    }
}
