use super::options::DecodeOptions;
use crate::core::error::PrmtopError;
use crate::core::io::section::{PrmtopSections, SectionFlag};
use crate::core::models::atom::Atom;
use crate::core::models::nonbonded::{Exception14, LennardJones, NonbondedPair};
use crate::core::models::terms::DihedralTerm;
use crate::core::topology::leading;
use crate::core::topology::pointers::{Pointer, PointerTable};
use std::collections::HashSet;
use tracing::warn;

/// Reconstructs each atom's Lennard-Jones parameters from its like-pair row
/// of the A/B coefficient tables.
pub fn decode_lennard_jones(
    sections: &PrmtopSections,
    pointers: &PointerTable,
    atoms: &[Atom],
) -> Result<Vec<LennardJones>, PrmtopError> {
    let ntypes = pointers.count(Pointer::Ntypes)?;
    let parm_index = sections.integers(&SectionFlag::NonbondedParmIndex)?;
    let acoef = sections.reals(&SectionFlag::LennardJonesAcoef)?;
    let bcoef = sections.reals(&SectionFlag::LennardJonesBcoef)?;

    let mut parameters = Vec::with_capacity(atoms.len());
    for atom in atoms {
        let cell = (ntypes + 1) * (atom.type_index - 1);
        let raw = *parm_index.get(cell).ok_or_else(|| {
            PrmtopError::inconsistent(
                SectionFlag::NonbondedParmIndex.name(),
                format!("no entry at cell {} for type {}", cell, atom.type_index),
            )
        })?;
        let row = raw - 1;
        if row < 0 {
            return Err(PrmtopError::UnsupportedFeature(format!(
                "10-12 hydrogen-bond term for atom type {} ({})",
                atom.type_index, atom.type_name
            )));
        }
        let row = row as usize;
        let (a, b) = match (acoef.get(row), bcoef.get(row)) {
            (Some(&a), Some(&b)) => (a, b),
            _ => {
                return Err(PrmtopError::inconsistent(
                    SectionFlag::LennardJonesAcoef.name(),
                    format!("coefficient row {} is out of range", row + 1),
                ));
            }
        };
        parameters.push(LennardJones::from_coefficients(a, b));
    }
    Ok(parameters)
}

/// Builds a scaled 1-4 interaction for every dihedral flagged with `has_14`.
///
/// Radii combine by sum and well depths by geometric mean before the
/// charge product is divided by `scee` and the well depth by `scnb`.
pub fn build_exceptions_14(
    dihedrals: &[DihedralTerm],
    atoms: &[Atom],
    lennard_jones: &[LennardJones],
    options: &DecodeOptions,
) -> Vec<Exception14> {
    dihedrals
        .iter()
        .filter(|dihedral| dihedral.has_14)
        .map(|dihedral| {
            let (i, l) = (dihedral.atom_i, dihedral.atom_l);
            let (lj_i, lj_l) = (lennard_jones[i], lennard_jones[l]);
            Exception14 {
                atom_i: i,
                atom_l: l,
                charge_product: atoms[i].charge * atoms[l].charge / options.scee,
                r_min: lj_i.radius() + lj_l.radius(),
                epsilon: (lj_i.epsilon * lj_l.epsilon).sqrt() / options.scnb,
            }
        })
        .collect()
}

/// Decodes the per-atom exclusion lists.
///
/// `NUMBER_EXCLUDED_ATOMS[i]` consecutive entries of `EXCLUDED_ATOMS_LIST`
/// belong to atom `i`. Entries are 1-based; zero is a placeholder for an
/// atom without exclusions and is dropped. The list must hold exactly `NEXT`
/// entries.
pub fn decode_exclusions(
    sections: &PrmtopSections,
    pointers: &PointerTable,
) -> Result<Vec<Vec<usize>>, PrmtopError> {
    let natom = pointers.count(Pointer::Natom)?;
    let counts = leading(
        sections.integers(&SectionFlag::NumberExcludedAtoms)?,
        natom,
        &SectionFlag::NumberExcludedAtoms,
    )?;
    let list = sections.integers(&SectionFlag::ExcludedAtomsList)?;
    let next = pointers.count(Pointer::Next)?;
    if list.len() != next {
        return Err(PrmtopError::inconsistent(
            SectionFlag::ExcludedAtomsList.name(),
            format!("NEXT is {} but the list holds {} entries", next, list.len()),
        ));
    }

    let mut offset = 0usize;
    let mut exclusions = Vec::with_capacity(natom);
    for (atom, &count) in counts.iter().enumerate() {
        let count = usize::try_from(count).map_err(|_| {
            PrmtopError::inconsistent(
                SectionFlag::NumberExcludedAtoms.name(),
                format!("atom {} has negative exclusion count {}", atom, count),
            )
        })?;
        let entries = list.get(offset..offset + count).ok_or_else(|| {
            PrmtopError::inconsistent(
                SectionFlag::ExcludedAtomsList.name(),
                format!(
                    "atom {} needs entries {}..{} but the list holds {}",
                    atom,
                    offset,
                    offset + count,
                    list.len()
                ),
            )
        })?;
        offset += count;

        let mut partners = Vec::with_capacity(count);
        for &entry in entries.iter().filter(|&&entry| entry > 0) {
            let partner = entry as usize;
            if partner > natom {
                return Err(PrmtopError::inconsistent(
                    SectionFlag::ExcludedAtomsList.name(),
                    format!("atom {} excludes atom {} beyond {}", atom, partner, natom),
                ));
            }
            partners.push(partner - 1);
        }
        exclusions.push(partners);
    }

    if offset != list.len() {
        warn!(
            "EXCLUDED_ATOMS_LIST holds {} entries; {} were claimed by NUMBER_EXCLUDED_ATOMS.",
            list.len(),
            offset
        );
    }
    Ok(exclusions)
}

/// Merges 1-4 exceptions and exclusions into one table in which every
/// unordered atom pair appears once.
///
/// Exceptions come first and take precedence over exclusions of the same
/// pair; among duplicates the first occurrence is kept.
pub fn merge_nonbonded_pairs(
    exceptions: &[Exception14],
    exclusions: &[Vec<usize>],
) -> Vec<NonbondedPair> {
    let mut seen = HashSet::new();
    let excluded: usize = exclusions.iter().map(Vec::len).sum();
    let mut pairs = Vec::with_capacity(exceptions.len() + excluded);

    for &exception in exceptions {
        let pair = NonbondedPair::Scaled(exception);
        if seen.insert(pair.key()) {
            pairs.push(pair);
        }
    }
    for (atom_i, partners) in exclusions.iter().enumerate() {
        for &atom_j in partners {
            let pair = NonbondedPair::Excluded { atom_i, atom_j };
            if seen.insert(pair.key()) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::section::SectionReader;

    fn pointers(natom: i64, ntypes: i64) -> PointerTable {
        let mut raw = vec![0; Pointer::COUNT];
        raw[Pointer::Natom.position()] = natom;
        raw[Pointer::Ntypes.position()] = ntypes;
        PointerTable::from_values(&raw).unwrap()
    }

    fn exclusion_pointers(natom: i64, next: i64) -> PointerTable {
        let mut raw = vec![0; Pointer::COUNT];
        raw[Pointer::Natom.position()] = natom;
        raw[Pointer::Next.position()] = next;
        PointerTable::from_values(&raw).unwrap()
    }

    fn sections(lines: &[&str]) -> PrmtopSections {
        let mut reader = SectionReader::new();
        for line in lines {
            reader.feed_line(line).unwrap();
        }
        reader.finish()
    }

    fn atom(index: usize, type_index: usize, charge: f64) -> Atom {
        Atom {
            index,
            name: format!("A{}", index),
            type_name: format!("T{}", type_index),
            type_index,
            residue_id: 0,
            mass: 12.0,
            charge,
        }
    }

    fn lj_sections(parm_index: &str) -> PrmtopSections {
        sections(&[
            "%FLAG NONBONDED_PARM_INDEX",
            "%FORMAT(10I8)",
            parm_index,
            "%FLAG LENNARD_JONES_ACOEF",
            "%FORMAT(5E16.8)",
            "  5.81935564E+05  0.00000000E+00  0.00000000E+00",
            "%FLAG LENNARD_JONES_BCOEF",
            "%FORMAT(5E16.8)",
            "  5.94825035E+02  0.00000000E+00  0.00000000E+00",
        ])
    }

    #[test]
    fn like_pair_row_is_selected_per_type() {
        let sections = lj_sections("       1       2       2       3");
        let atoms = vec![atom(0, 1, -0.834), atom(1, 2, 0.417)];
        let lj = decode_lennard_jones(&sections, &pointers(2, 2), &atoms).unwrap();

        let expected = LennardJones::from_coefficients(5.81935564E+05, 5.94825035E+02);
        assert_eq!(lj[0], expected);
        assert!((lj[0].r_min - 3.5365).abs() < 1e-3);
        assert_eq!(lj[1], LennardJones { r_min: 1.0, epsilon: 0.0 });
    }

    #[test]
    fn negative_parameter_row_is_unsupported() {
        let sections = lj_sections("       1       2       2      -1");
        let atoms = vec![atom(0, 2, 0.0)];
        let result = decode_lennard_jones(&sections, &pointers(1, 2), &atoms);
        assert!(matches!(result, Err(PrmtopError::UnsupportedFeature(_))));
    }

    #[test]
    fn exceptions_combine_and_scale_parameters() {
        let atoms = vec![atom(0, 1, 0.5), atom(1, 1, 0.0), atom(2, 1, 0.0), atom(3, 1, -0.4)];
        let lj = vec![
            LennardJones { r_min: 3.8, epsilon: 0.09 },
            LennardJones::NON_INTERACTING,
            LennardJones::NON_INTERACTING,
            LennardJones { r_min: 3.0, epsilon: 0.16 },
        ];
        let dihedrals = [
            DihedralTerm {
                atom_i: 0,
                atom_j: 1,
                atom_k: 2,
                atom_l: 3,
                force_constant: 1.0,
                phase: 0.0,
                periodicity: 3,
                has_14: true,
                improper: false,
            },
            DihedralTerm {
                atom_i: 0,
                atom_j: 1,
                atom_k: 2,
                atom_l: 3,
                force_constant: 0.5,
                phase: 180.0,
                periodicity: 2,
                has_14: false,
                improper: false,
            },
        ];
        let exceptions = build_exceptions_14(&dihedrals, &atoms, &lj, &DecodeOptions::default());
        assert_eq!(exceptions.len(), 1);
        let exception = exceptions[0];
        assert_eq!((exception.atom_i, exception.atom_l), (0, 3));
        assert!((exception.charge_product - (-0.2 / 1.2)).abs() < 1e-12);
        assert!((exception.r_min - 3.4).abs() < 1e-12);
        assert!((exception.epsilon - 0.12 / 2.0).abs() < 1e-12);
    }

    #[test]
    fn exclusions_follow_run_lengths() {
        let sections = sections(&[
            "%FLAG NUMBER_EXCLUDED_ATOMS",
            "%FORMAT(10I8)",
            "       2       1       1",
            "%FLAG EXCLUDED_ATOMS_LIST",
            "%FORMAT(10I8)",
            "       2       3       3       0",
        ]);
        let exclusions = decode_exclusions(&sections, &exclusion_pointers(3, 4)).unwrap();
        assert_eq!(exclusions, vec![vec![1, 2], vec![2], vec![]]);
    }

    #[test]
    fn exclusion_overrun_is_inconsistent() {
        let sections = sections(&[
            "%FLAG NUMBER_EXCLUDED_ATOMS",
            "%FORMAT(10I8)",
            "       2       2",
            "%FLAG EXCLUDED_ATOMS_LIST",
            "%FORMAT(10I8)",
            "       2       0       0",
        ]);
        let result = decode_exclusions(&sections, &exclusion_pointers(2, 3));
        assert!(matches!(result, Err(PrmtopError::DataConsistency { .. })));
    }

    #[test]
    fn exclusion_beyond_atom_count_is_inconsistent() {
        let sections = sections(&[
            "%FLAG NUMBER_EXCLUDED_ATOMS",
            "%FORMAT(10I8)",
            "       1       1",
            "%FLAG EXCLUDED_ATOMS_LIST",
            "%FORMAT(10I8)",
            "       5       0",
        ]);
        let result = decode_exclusions(&sections, &exclusion_pointers(2, 2));
        assert!(matches!(result, Err(PrmtopError::DataConsistency { .. })));
    }

    #[test]
    fn list_length_must_match_next() {
        let sections = sections(&[
            "%FLAG NUMBER_EXCLUDED_ATOMS",
            "%FORMAT(10I8)",
            "       1       1",
            "%FLAG EXCLUDED_ATOMS_LIST",
            "%FORMAT(10I8)",
            "       2       0       0",
        ]);
        assert!(decode_exclusions(&sections, &exclusion_pointers(2, 3)).is_ok());
        for next in [2, 4] {
            let result = decode_exclusions(&sections, &exclusion_pointers(2, next));
            assert!(matches!(result, Err(PrmtopError::DataConsistency { .. })));
        }
    }

    #[test]
    fn merged_pairs_never_repeat_an_unordered_pair() {
        let exception = Exception14 {
            atom_i: 3,
            atom_l: 0,
            charge_product: 0.1,
            r_min: 3.0,
            epsilon: 0.1,
        };
        let exclusions = vec![vec![1, 2, 3], vec![2], vec![], vec![]];
        let pairs = merge_nonbonded_pairs(&[exception, exception], &exclusions);

        let keys: Vec<_> = pairs.iter().map(NonbondedPair::key).collect();
        assert_eq!(keys, vec![(0, 3), (0, 1), (0, 2), (1, 2)]);
        assert!(matches!(pairs[0], NonbondedPair::Scaled(_)));
        assert!(pairs[1..].iter().all(|p| matches!(p, NonbondedPair::Excluded { .. })));
    }
}
