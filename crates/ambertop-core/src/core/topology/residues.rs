use super::pointers::{Pointer, PointerTable};
use crate::core::error::PrmtopError;
use crate::core::io::section::{PrmtopSections, SectionFlag};
use crate::core::models::residue::Residue;

/// Decodes `RESIDUE_LABEL` and `RESIDUE_POINTER` into residues.
///
/// The pointers must start at the first atom, increase strictly and stay
/// within the atom range, so that residues partition the atoms contiguously.
pub fn decode_residues(
    sections: &PrmtopSections,
    pointers: &PointerTable,
) -> Result<Vec<Residue>, PrmtopError> {
    let natom = pointers.count(Pointer::Natom)?;
    let nres = pointers.count(Pointer::Nres)?;

    let starts = sections.integers(&SectionFlag::ResiduePointer)?;
    if starts.len() != nres {
        return Err(PrmtopError::inconsistent(
            SectionFlag::ResiduePointer.name(),
            format!("NRES is {} but {} residue pointers are present", nres, starts.len()),
        ));
    }
    let labels = sections.tokens(&SectionFlag::ResidueLabel)?;
    if labels.len() != nres {
        return Err(PrmtopError::inconsistent(
            SectionFlag::ResidueLabel.name(),
            format!("NRES is {} but {} residue labels are present", nres, labels.len()),
        ));
    }

    let mut previous: Option<i64> = None;
    for (position, &start) in starts.iter().enumerate() {
        let valid = match previous {
            None => start == 1,
            Some(prev) => start > prev,
        };
        if !valid || start > natom as i64 {
            return Err(PrmtopError::inconsistent(
                SectionFlag::ResiduePointer.name(),
                format!(
                    "pointer {} of residue {} breaks the contiguous, strictly increasing partition of {} atoms",
                    start, position, natom
                ),
            ));
        }
        previous = Some(start);
    }

    Ok(labels
        .iter()
        .zip(starts)
        .map(|(label, start)| Residue {
            label: label.clone(),
            first_atom_index: (start - 1) as usize,
        })
        .collect())
}

/// The residue containing `atom`: the last residue whose first atom is not
/// after it, found by binary search over the sorted residue starts.
pub fn residue_of(residues: &[Residue], atom: usize) -> usize {
    residues
        .partition_point(|residue| residue.first_atom_index <= atom)
        .saturating_sub(1)
}
