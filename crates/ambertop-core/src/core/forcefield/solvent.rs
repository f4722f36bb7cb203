use crate::core::error::PrmtopError;
use crate::core::io::section::{PrmtopSections, SectionFlag};
use crate::core::models::nonbonded::{PeriodicBox, SolventParticle};
use crate::core::topology::pointers::{Pointer, PointerTable};

/// Pairs `RADII` with `SCREEN` per atom.
///
/// Returns `Ok(None)` when neither section is present. A file carrying only
/// one of them is missing the other.
pub fn decode_solvent(
    sections: &PrmtopSections,
    pointers: &PointerTable,
) -> Result<Option<Vec<SolventParticle>>, PrmtopError> {
    match (
        sections.contains(&SectionFlag::Radii),
        sections.contains(&SectionFlag::Screen),
    ) {
        (false, false) => return Ok(None),
        (true, false) => return Err(PrmtopError::SectionMissing(SectionFlag::Screen.to_string())),
        (false, true) => return Err(PrmtopError::SectionMissing(SectionFlag::Radii.to_string())),
        (true, true) => {}
    }

    let natom = pointers.count(Pointer::Natom)?;
    let radii = sections.reals(&SectionFlag::Radii)?;
    let screen = sections.reals(&SectionFlag::Screen)?;
    for (flag, len) in [(SectionFlag::Radii, radii.len()), (SectionFlag::Screen, screen.len())] {
        if len != natom {
            return Err(PrmtopError::inconsistent(
                flag.name(),
                format!("expected {} values, found {}", natom, len),
            ));
        }
    }

    Ok(Some(
        radii
            .into_iter()
            .zip(screen)
            .map(|(radius, screening_factor)| SolventParticle {
                radius,
                screening_factor,
            })
            .collect(),
    ))
}

/// Reads `BOX_DIMENSIONS` as `(beta, x, y, z)`.
pub fn decode_periodic_box(sections: &PrmtopSections) -> Result<PeriodicBox, PrmtopError> {
    let values = sections.reals(&SectionFlag::BoxDimensions)?;
    match values[..] {
        [beta, x, y, z, ..] => Ok(PeriodicBox { beta, x, y, z }),
        _ => Err(PrmtopError::inconsistent(
            SectionFlag::BoxDimensions.name(),
            format!("expected 4 values, found {}", values.len()),
        )),
    }
}
