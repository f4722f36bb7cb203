use super::bonded::{decode_angles, decode_bonds, decode_dihedrals};
use super::nonbonded::{
    build_exceptions_14, decode_exclusions, decode_lennard_jones, merge_nonbonded_pairs,
};
use super::options::DecodeOptions;
use super::solvent::{decode_periodic_box, decode_solvent};
use crate::core::error::PrmtopError;
use crate::core::io::section::PrmtopSections;
use crate::core::models::atom::Atom;
use crate::core::models::nonbonded::{
    Exception14, LennardJones, NonbondedPair, PeriodicBox, SolventParticle,
};
use crate::core::models::residue::Residue;
use crate::core::models::terms::{AngleTerm, BondTerm, DihedralTerm};
use crate::core::topology::atoms::decode_atoms;
use crate::core::topology::pointers::{Pointer, PointerTable};
use crate::core::topology::residues::decode_residues;
use std::sync::OnceLock;
use tracing::{debug, info};

type Memo<T> = OnceLock<Result<T, PrmtopError>>;

/// Returns the cached value of `cell`, computing it on first use.
///
/// Concurrent first callers block until the single computation finishes; a
/// failed computation is cached as well and handed to every later caller.
fn memoized<T>(
    cell: &Memo<T>,
    init: impl FnOnce() -> Result<T, PrmtopError>,
) -> Result<&T, PrmtopError> {
    cell.get_or_init(init).as_ref().map_err(Clone::clone)
}

/// The read-only force-field description of one prmtop file.
///
/// Construction validates the pointer header only. Every derived collection
/// is computed on first access and kept for the lifetime of the model, so
/// the model can be shared between threads and queried without locking once
/// warm. Use [`ForceFieldModel::decode`] to derive everything eagerly.
#[derive(Debug)]
pub struct ForceFieldModel {
    sections: PrmtopSections,
    pointers: PointerTable,
    options: DecodeOptions,
    natom: usize,

    residues: Memo<Vec<Residue>>,
    residue_ids: Memo<Vec<usize>>,
    atoms: Memo<Vec<Atom>>,
    bonds_with_h: Memo<Vec<BondTerm>>,
    bonds_without_h: Memo<Vec<BondTerm>>,
    bonds: Memo<Vec<BondTerm>>,
    angles: Memo<Vec<AngleTerm>>,
    dihedrals: Memo<Vec<DihedralTerm>>,
    lennard_jones: Memo<Vec<LennardJones>>,
    exceptions_14: Memo<Vec<Exception14>>,
    exclusions: Memo<Vec<Vec<usize>>>,
    nonbonded_pairs: Memo<Vec<NonbondedPair>>,
    solvent: Memo<Option<Vec<SolventParticle>>>,
    periodic_box: Memo<Option<PeriodicBox>>,
}

impl ForceFieldModel {
    /// Wraps decoded sections after checking the header flags.
    ///
    /// # Errors
    ///
    /// Returns [`PrmtopError::UnsupportedFeature`] for a non-standard box
    /// (`IFBOX > 1`), the cap option or perturbation data, and any error
    /// raised while reading the pointer table.
    pub fn new(sections: PrmtopSections, options: DecodeOptions) -> Result<Self, PrmtopError> {
        let pointers = PointerTable::from_sections(&sections)?;
        let natom = pointers.count(Pointer::Natom)?;

        match pointers.get(Pointer::Ifbox) {
            0 | 1 => {}
            other => {
                return Err(PrmtopError::UnsupportedFeature(format!(
                    "periodic box type IFBOX = {} (only standard boxes are supported)",
                    other
                )));
            }
        }
        if pointers.get(Pointer::Ifcap) != 0 {
            return Err(PrmtopError::UnsupportedFeature("cap option (IFCAP)".to_string()));
        }
        if pointers.get(Pointer::Ifpert) != 0 {
            return Err(PrmtopError::UnsupportedFeature(
                "perturbation information (IFPERT)".to_string(),
            ));
        }

        Ok(Self {
            sections,
            pointers,
            options,
            natom,
            residues: OnceLock::new(),
            residue_ids: OnceLock::new(),
            atoms: OnceLock::new(),
            bonds_with_h: OnceLock::new(),
            bonds_without_h: OnceLock::new(),
            bonds: OnceLock::new(),
            angles: OnceLock::new(),
            dihedrals: OnceLock::new(),
            lennard_jones: OnceLock::new(),
            exceptions_14: OnceLock::new(),
            exclusions: OnceLock::new(),
            nonbonded_pairs: OnceLock::new(),
            solvent: OnceLock::new(),
            periodic_box: OnceLock::new(),
        })
    }

    /// Builds a model and derives every collection, failing on the first
    /// inconsistency.
    pub fn decode(sections: PrmtopSections, options: DecodeOptions) -> Result<Self, PrmtopError> {
        let model = Self::new(sections, options)?;
        model.atoms()?;
        model.bonds()?;
        model.angles()?;
        model.dihedrals()?;
        model.nonbonded_pairs()?;
        model.solvent()?;
        model.periodic_box()?;
        info!(
            atoms = model.natom,
            residues = model.residues()?.len(),
            bonds = model.bonds()?.len(),
            angles = model.angles()?.len(),
            dihedrals = model.dihedrals()?.len(),
            "Decoded force-field model."
        );
        Ok(model)
    }

    pub fn title(&self) -> Option<&str> {
        self.sections.title()
    }

    pub fn version(&self) -> Option<&str> {
        self.sections.version()
    }

    pub fn pointers(&self) -> &PointerTable {
        &self.pointers
    }

    pub fn sections(&self) -> &PrmtopSections {
        &self.sections
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.natom
    }

    pub fn is_periodic(&self) -> bool {
        self.pointers.get(Pointer::Ifbox) == 1
    }

    pub fn residues(&self) -> Result<&[Residue], PrmtopError> {
        memoized(&self.residues, || decode_residues(&self.sections, &self.pointers))
            .map(Vec::as_slice)
    }

    /// Residue id of every atom, non-decreasing in atom index.
    pub fn residue_ids(&self) -> Result<&[usize], PrmtopError> {
        memoized(&self.residue_ids, || {
            Ok(self.atoms()?.iter().map(|atom| atom.residue_id).collect())
        })
        .map(Vec::as_slice)
    }

    pub fn residue_label(&self, residue_id: usize) -> Result<Option<&str>, PrmtopError> {
        Ok(self
            .residues()?
            .get(residue_id)
            .map(|residue| residue.label.as_str()))
    }

    pub fn residue_label_for_atom(&self, atom: usize) -> Result<Option<&str>, PrmtopError> {
        match self.residue_ids()?.get(atom) {
            Some(&residue_id) => self.residue_label(residue_id),
            None => Ok(None),
        }
    }

    pub fn atoms(&self) -> Result<&[Atom], PrmtopError> {
        memoized(&self.atoms, || {
            decode_atoms(&self.sections, &self.pointers, self.residues()?)
        })
        .map(Vec::as_slice)
    }

    pub fn bonds_with_h(&self) -> Result<&[BondTerm], PrmtopError> {
        memoized(&self.bonds_with_h, || {
            decode_bonds(&self.sections, &self.pointers, true)
        })
        .map(Vec::as_slice)
    }

    pub fn bonds_without_h(&self) -> Result<&[BondTerm], PrmtopError> {
        memoized(&self.bonds_without_h, || {
            decode_bonds(&self.sections, &self.pointers, false)
        })
        .map(Vec::as_slice)
    }

    /// All bonds, hydrogen-containing ones first.
    pub fn bonds(&self) -> Result<&[BondTerm], PrmtopError> {
        memoized(&self.bonds, || {
            let mut bonds = self.bonds_with_h()?.to_vec();
            bonds.extend_from_slice(self.bonds_without_h()?);
            Ok(bonds)
        })
        .map(Vec::as_slice)
    }

    pub fn angles(&self) -> Result<&[AngleTerm], PrmtopError> {
        memoized(&self.angles, || decode_angles(&self.sections, &self.pointers))
            .map(Vec::as_slice)
    }

    pub fn dihedrals(&self) -> Result<&[DihedralTerm], PrmtopError> {
        memoized(&self.dihedrals, || {
            decode_dihedrals(&self.sections, &self.pointers)
        })
        .map(Vec::as_slice)
    }

    /// Per-atom `(r_min, epsilon)`.
    pub fn lennard_jones(&self) -> Result<&[LennardJones], PrmtopError> {
        memoized(&self.lennard_jones, || {
            decode_lennard_jones(&self.sections, &self.pointers, self.atoms()?)
        })
        .map(Vec::as_slice)
    }

    /// Scaled 1-4 interactions, one per dihedral term with `has_14`.
    pub fn exceptions_14(&self) -> Result<&[Exception14], PrmtopError> {
        memoized(&self.exceptions_14, || {
            let exceptions = build_exceptions_14(
                self.dihedrals()?,
                self.atoms()?,
                self.lennard_jones()?,
                &self.options,
            );
            debug!("Built {} scaled 1-4 interactions.", exceptions.len());
            Ok(exceptions)
        })
        .map(Vec::as_slice)
    }

    /// Excluded partners of every atom, as listed in the file.
    pub fn exclusions(&self) -> Result<&[Vec<usize>], PrmtopError> {
        memoized(&self.exclusions, || {
            decode_exclusions(&self.sections, &self.pointers)
        })
        .map(Vec::as_slice)
    }

    /// 1-4 exceptions followed by the exclusions they do not already cover.
    pub fn nonbonded_pairs(&self) -> Result<&[NonbondedPair], PrmtopError> {
        memoized(&self.nonbonded_pairs, || {
            Ok(merge_nonbonded_pairs(
                self.exceptions_14()?,
                self.exclusions()?,
            ))
        })
        .map(Vec::as_slice)
    }

    /// Generalized-Born radii and screening factors, if the file has them.
    pub fn solvent(&self) -> Result<Option<&[SolventParticle]>, PrmtopError> {
        memoized(&self.solvent, || decode_solvent(&self.sections, &self.pointers))
            .map(|solvent| solvent.as_deref())
    }

    /// The periodic box, present only for standard periodic systems.
    pub fn periodic_box(&self) -> Result<Option<PeriodicBox>, PrmtopError> {
        memoized(&self.periodic_box, || {
            if self.is_periodic() {
                decode_periodic_box(&self.sections).map(Some)
            } else {
                Ok(None)
            }
        })
        .copied()
    }
}
