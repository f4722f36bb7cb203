use crate::core::error::PrmtopError;
use crate::core::io::section::{PrmtopSections, SectionFlag};
use crate::core::models::terms::{AngleTerm, BondTerm, DihedralTerm};
use crate::core::topology::pointers::{Pointer, PointerTable};

const BOND_WIDTH: usize = 3;
const ANGLE_WIDTH: usize = 4;
const DIHEDRAL_WIDTH: usize = 5;

/// Decodes the bonds of one hydrogen class.
///
/// Returned force constants are twice the stored values.
pub fn decode_bonds(
    sections: &PrmtopSections,
    pointers: &PointerTable,
    contains_hydrogen: bool,
) -> Result<Vec<BondTerm>, PrmtopError> {
    let (flag, count) = if contains_hydrogen {
        (SectionFlag::BondsIncHydrogen, Pointer::Nbonh)
    } else {
        (SectionFlag::BondsWithoutHydrogen, Pointer::Mbona)
    };
    let natom = pointers.count(Pointer::Natom)?;
    let force_constants = sections.reals(&SectionFlag::BondForceConstant)?;
    let equilibrium = sections.reals(&SectionFlag::BondEquilValue)?;

    let raw = sections.integers(&flag)?;
    let mut bonds = Vec::with_capacity(raw.len() / BOND_WIDTH);
    for record in records(&raw, BOND_WIDTH, pointers.count(count)?, &flag)? {
        let parameter = parameter_index(record[2], &force_constants, &equilibrium, &flag)?;
        bonds.push(BondTerm {
            atom_i: structural_index(record[0], natom, &flag)?,
            atom_j: structural_index(record[1], natom, &flag)?,
            force_constant: 2.0 * force_constants[parameter],
            equilibrium_length: equilibrium[parameter],
            contains_hydrogen,
        });
    }
    Ok(bonds)
}

/// Decodes all angles, hydrogen-containing ones first.
pub fn decode_angles(
    sections: &PrmtopSections,
    pointers: &PointerTable,
) -> Result<Vec<AngleTerm>, PrmtopError> {
    let natom = pointers.count(Pointer::Natom)?;
    let force_constants = sections.reals(&SectionFlag::AngleForceConstant)?;
    let equilibrium = sections.reals(&SectionFlag::AngleEquilValue)?;

    let mut angles = Vec::new();
    for (flag, count) in [
        (SectionFlag::AnglesIncHydrogen, Pointer::Ntheth),
        (SectionFlag::AnglesWithoutHydrogen, Pointer::Mtheta),
    ] {
        let raw = sections.integers(&flag)?;
        for record in records(&raw, ANGLE_WIDTH, pointers.count(count)?, &flag)? {
            let parameter = parameter_index(record[3], &force_constants, &equilibrium, &flag)?;
            angles.push(AngleTerm {
                atom_i: structural_index(record[0], natom, &flag)?,
                atom_j: structural_index(record[1], natom, &flag)?,
                atom_k: structural_index(record[2], natom, &flag)?,
                force_constant: 2.0 * force_constants[parameter],
                equilibrium_angle: equilibrium[parameter].to_degrees(),
            });
        }
    }
    Ok(angles)
}

/// Decodes all dihedrals, hydrogen-containing ones first.
///
/// The signs of the third and fourth raw indices carry the 1-4 and improper
/// flags; their magnitudes are the atom indices.
pub fn decode_dihedrals(
    sections: &PrmtopSections,
    pointers: &PointerTable,
) -> Result<Vec<DihedralTerm>, PrmtopError> {
    let natom = pointers.count(Pointer::Natom)?;
    let force_constants = sections.reals(&SectionFlag::DihedralForceConstant)?;
    let phases = sections.reals(&SectionFlag::DihedralPhase)?;
    let periodicities = sections.reals(&SectionFlag::DihedralPeriodicity)?;

    let mut dihedrals = Vec::new();
    for (flag, count) in [
        (SectionFlag::DihedralsIncHydrogen, Pointer::Nphih),
        (SectionFlag::DihedralsWithoutHydrogen, Pointer::Mphia),
    ] {
        let raw = sections.integers(&flag)?;
        for record in records(&raw, DIHEDRAL_WIDTH, pointers.count(count)?, &flag)? {
            let parameter = parameter_index(record[4], &force_constants, &phases, &flag)?;
            let periodicity = *periodicities.get(parameter).ok_or_else(|| {
                PrmtopError::inconsistent(
                    SectionFlag::DihedralPeriodicity.name(),
                    format!("no entry for dihedral type {}", parameter + 1),
                )
            })?;
            let (raw_k, raw_l) = (record[2], record[3]);
            dihedrals.push(DihedralTerm {
                atom_i: structural_index(record[0], natom, &flag)?,
                atom_j: structural_index(record[1], natom, &flag)?,
                atom_k: flagged_index(raw_k, natom, &flag)?,
                atom_l: flagged_index(raw_l, natom, &flag)?,
                force_constant: force_constants[parameter],
                phase: phases[parameter].to_degrees(),
                periodicity: periodicity.round() as i32,
                has_14: raw_k > 0 && raw_l > 0,
                improper: raw_l < 0,
            });
        }
    }
    Ok(dihedrals)
}

/// Splits a flat index list into fixed-width records.
///
/// The list must hold exactly `expected` records.
fn records<'a>(
    raw: &'a [i64],
    width: usize,
    expected: usize,
    flag: &SectionFlag,
) -> Result<std::slice::ChunksExact<'a, i64>, PrmtopError> {
    if width.checked_mul(expected) != Some(raw.len()) {
        return Err(PrmtopError::inconsistent(
            flag.name(),
            format!(
                "expected {} records of {} values, found {} values",
                expected,
                width,
                raw.len()
            ),
        ));
    }
    Ok(raw.chunks_exact(width))
}

/// Converts a raw `3 * index` atom field into a zero-based atom index.
fn structural_index(raw: i64, natom: usize, flag: &SectionFlag) -> Result<usize, PrmtopError> {
    if raw < 0 {
        return Err(PrmtopError::inconsistent(
            flag.name(),
            format!("negative atom pointer {}", raw),
        ));
    }
    if raw % 3 != 0 {
        return Err(PrmtopError::inconsistent(
            flag.name(),
            format!("atom pointer {} is not a multiple of 3", raw),
        ));
    }
    let index = (raw / 3) as usize;
    if index >= natom {
        return Err(PrmtopError::inconsistent(
            flag.name(),
            format!("atom index {} exceeds atom count {}", index, natom),
        ));
    }
    Ok(index)
}

/// Like [`structural_index`], for fields whose sign carries a flag.
fn flagged_index(raw: i64, natom: usize, flag: &SectionFlag) -> Result<usize, PrmtopError> {
    let magnitude = raw.checked_abs().ok_or_else(|| {
        PrmtopError::inconsistent(flag.name(), format!("atom pointer {} is out of range", raw))
    })?;
    structural_index(magnitude, natom, flag)
}

/// Resolves a 1-based parameter type against two parallel coefficient tables.
fn parameter_index(
    raw: i64,
    first: &[f64],
    second: &[f64],
    flag: &SectionFlag,
) -> Result<usize, PrmtopError> {
    let available = first.len().min(second.len());
    match usize::try_from(raw) {
        Ok(index) if (1..=available).contains(&index) => Ok(index - 1),
        _ => Err(PrmtopError::inconsistent(
            flag.name(),
            format!("parameter type {} outside 1..={}", raw, available),
        )),
    }
}
