use serde::{Deserialize, Serialize};

/// Divisors applied to scaled 1-4 interactions.
///
/// Both values are used as given; a zero or negative divisor is the caller's
/// responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DecodeOptions {
    /// Electrostatic 1-4 divisor.
    pub scee: f64,
    /// Lennard-Jones 1-4 divisor.
    pub scnb: f64,
}

impl DecodeOptions {
    pub const DEFAULT_SCEE: f64 = 1.2;
    pub const DEFAULT_SCNB: f64 = 2.0;

    pub fn new(scee: f64, scnb: f64) -> Self {
        Self { scee, scnb }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            scee: Self::DEFAULT_SCEE,
            scnb: Self::DEFAULT_SCNB,
        }
    }
}
