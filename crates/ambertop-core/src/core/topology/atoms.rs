use super::leading;
use super::pointers::{Pointer, PointerTable};
use super::residues::residue_of;
use crate::core::error::PrmtopError;
use crate::core::io::section::{PrmtopSections, SectionFlag};
use crate::core::models::atom::Atom;
use crate::core::models::residue::Residue;
use crate::core::units::AMBER_CHARGE_SCALE;

/// Decodes the per-atom sections into [`Atom`] records.
///
/// Each section is indexed positionally up to `NATOM`; a section with fewer
/// values is inconsistent. Every section is checked before any per-atom
/// storage is sized from `NATOM`. Atoms are assigned to `residues`, which
/// must be sorted by first atom.
pub fn decode_atoms(
    sections: &PrmtopSections,
    pointers: &PointerTable,
    residues: &[Residue],
) -> Result<Vec<Atom>, PrmtopError> {
    let natom = pointers.count(Pointer::Natom)?;
    let ntypes = pointers.count(Pointer::Ntypes)?;

    let names = leading(
        sections.tokens(&SectionFlag::AtomName)?.to_vec(),
        natom,
        &SectionFlag::AtomName,
    )?;
    let type_names = leading(
        sections.tokens(&SectionFlag::AmberAtomType)?.to_vec(),
        natom,
        &SectionFlag::AmberAtomType,
    )?;
    let charges = leading(sections.reals(&SectionFlag::Charge)?, natom, &SectionFlag::Charge)?;
    let masses = leading(sections.reals(&SectionFlag::Mass)?, natom, &SectionFlag::Mass)?;
    let type_indices = leading(
        sections.integers(&SectionFlag::AtomTypeIndex)?,
        natom,
        &SectionFlag::AtomTypeIndex,
    )?;

    let mut atoms = Vec::with_capacity(natom);
    let records = names
        .into_iter()
        .zip(type_names)
        .zip(charges.into_iter().zip(masses))
        .zip(type_indices);
    for (index, (((name, type_name), (charge, mass)), type_index)) in records.enumerate() {
        atoms.push(Atom {
            index,
            name,
            type_name,
            type_index: type_index_in_range(type_index, ntypes, index)?,
            residue_id: residue_of(residues, index),
            mass,
            charge: charge / AMBER_CHARGE_SCALE,
        });
    }
    Ok(atoms)
}

fn type_index_in_range(value: i64, ntypes: usize, atom: usize) -> Result<usize, PrmtopError> {
    match usize::try_from(value) {
        Ok(index) if (1..=ntypes).contains(&index) => Ok(index),
        _ => Err(PrmtopError::inconsistent(
            SectionFlag::AtomTypeIndex.name(),
            format!("atom {} has type index {} outside 1..={}", atom, value, ntypes),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::section::SectionReader;

    fn residue(label: &str, first_atom_index: usize) -> Residue {
        Residue {
            label: label.to_string(),
            first_atom_index,
        }
    }

    fn water() -> (PrmtopSections, PointerTable) {
        let mut raw = vec![0; Pointer::COUNT];
        raw[Pointer::Natom.position()] = 3;
        raw[Pointer::Ntypes.position()] = 2;
        raw[Pointer::Nres.position()] = 1;
        let pointers = PointerTable::from_values(&raw).unwrap();

        let mut reader = SectionReader::new();
        for line in [
            "%FLAG ATOM_NAME",
            "%FORMAT(20a4)",
            "O   H1  H2  ",
            "%FLAG CHARGE",
            "%FORMAT(5E16.8)",
            " -1.51973982E+01  7.59869910E+00  7.59869910E+00",
            "%FLAG MASS",
            "%FORMAT(5E16.8)",
            "  1.60000000E+01  1.00800000E+00  1.00800000E+00",
            "%FLAG ATOM_TYPE_INDEX",
            "%FORMAT(10I8)",
            "       1       2       2",
            "%FLAG AMBER_ATOM_TYPE",
            "%FORMAT(20a4)",
            "OW  HW  HW  ",
        ] {
            reader.feed_line(line).unwrap();
        }
        (reader.finish(), pointers)
    }

    #[test]
    fn atoms_are_decoded_positionally() {
        let (sections, pointers) = water();
        let atoms = decode_atoms(&sections, &pointers, &[residue("WAT", 0)]).unwrap();
        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms[1].index, 1);
        assert_eq!(atoms[1].name, "H1");
        assert_eq!(atoms[1].type_name, "HW");
        assert_eq!(atoms[1].type_index, 2);
        assert_eq!(atoms[0].mass, 16.0);
    }

    #[test]
    fn charges_are_converted_to_elementary_units() {
        let (sections, pointers) = water();
        let atoms = decode_atoms(&sections, &pointers, &[residue("WAT", 0)]).unwrap();
        assert!((atoms[0].charge - (-0.834)).abs() < 1e-6);
        assert!((atoms[1].charge - 0.417).abs() < 1e-6);
    }

    #[test]
    fn charge_round_trips_to_file_value() {
        let (sections, pointers) = water();
        let raw = sections.reals(&SectionFlag::Charge).unwrap();
        let atoms = decode_atoms(&sections, &pointers, &[residue("WAT", 0)]).unwrap();
        for (atom, raw) in atoms.iter().zip(raw) {
            assert!((atom.charge * AMBER_CHARGE_SCALE - raw).abs() < 1e-9);
        }
    }

    #[test]
    fn short_section_is_inconsistent() {
        let (sections, _) = water();
        let mut raw = vec![0; Pointer::COUNT];
        raw[Pointer::Natom.position()] = 4;
        raw[Pointer::Ntypes.position()] = 2;
        let pointers = PointerTable::from_values(&raw).unwrap();
        let result = decode_atoms(&sections, &pointers, &[residue("WAT", 0)]);
        assert!(matches!(result, Err(PrmtopError::DataConsistency { .. })));
    }

    #[test]
    fn atoms_follow_residue_boundaries() {
        let (sections, pointers) = water();
        let residues = [residue("WAT", 0), residue("ION", 2)];
        let atoms = decode_atoms(&sections, &pointers, &residues).unwrap();
        let ids: Vec<usize> = atoms.iter().map(|atom| atom.residue_id).collect();
        assert_eq!(ids, vec![0, 0, 1]);
    }

    #[test]
    fn oversized_atom_count_fails_before_allocating() {
        let (sections, _) = water();
        let mut raw = vec![0; Pointer::COUNT];
        raw[Pointer::Natom.position()] = 1_000_000_000_000_000;
        raw[Pointer::Ntypes.position()] = 2;
        let pointers = PointerTable::from_values(&raw).unwrap();
        let result = decode_atoms(&sections, &pointers, &[residue("WAT", 0)]);
        assert!(matches!(result, Err(PrmtopError::DataConsistency { .. })));
    }

    #[test]
    fn type_index_outside_type_table_is_inconsistent() {
        let (sections, _) = water();
        let mut raw = vec![0; Pointer::COUNT];
        raw[Pointer::Natom.position()] = 3;
        raw[Pointer::Ntypes.position()] = 1;
        let pointers = PointerTable::from_values(&raw).unwrap();
        let result = decode_atoms(&sections, &pointers, &[residue("WAT", 0)]);
        assert!(matches!(result, Err(PrmtopError::DataConsistency { .. })));
    }
}
