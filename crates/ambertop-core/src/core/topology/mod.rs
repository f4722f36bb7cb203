//! # Topology Module
//!
//! Decodes the structural part of a prmtop file: the pointer table that sizes
//! every other section, the per-atom records and the residue partition.
//!
//! ## Key Components
//!
//! - [`pointers`] - The fixed table of 30 named counters
//! - [`atoms`] - Masses, charges, names and types of every atom
//! - [`residues`] - Residue labels, boundaries and atom membership

pub mod atoms;
pub mod pointers;
pub mod residues;

use crate::core::error::PrmtopError;
use crate::core::io::section::SectionFlag;

/// Keeps the first `count` values of a section, failing if there are fewer.
pub(crate) fn leading<T>(
    mut values: Vec<T>,
    count: usize,
    flag: &SectionFlag,
) -> Result<Vec<T>, PrmtopError> {
    if values.len() < count {
        return Err(PrmtopError::inconsistent(
            flag.name(),
            format!("expected at least {} values, found {}", count, values.len()),
        ));
    }
    values.truncate(count);
    Ok(values)
}
