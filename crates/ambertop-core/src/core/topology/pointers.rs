use crate::core::error::PrmtopError;
use crate::core::io::section::{PrmtopSections, SectionFlag};
use phf::phf_map;
use std::fmt;
use tracing::warn;

/// The 30 counters at the head of every prmtop file, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pointer {
    Natom,  // total number of atoms
    Ntypes, // number of distinct Lennard-Jones atom types
    Nbonh,  // bonds containing hydrogen
    Mbona,  // bonds not containing hydrogen
    Ntheth, // angles containing hydrogen
    Mtheta, // angles not containing hydrogen
    Nphih,  // dihedrals containing hydrogen
    Mphia,  // dihedrals not containing hydrogen
    Nhparm, // unused
    Nparm,  // unused
    Next,   // length of the excluded atoms list
    Nres,   // number of residues
    Nbona,  // MBONA + constraint bonds
    Ntheta, // MTHETA + constraint angles
    Nphia,  // MPHIA + constraint dihedrals
    Numbnd, // unique bond types
    Numang, // unique angle types
    Nptra,  // unique dihedral types
    Natyp,  // atom types in the parameter file
    Nphb,   // distinct 10-12 hydrogen bond pair types
    Ifpert, // 1 if perturbation information follows
    Nbper,  // perturbed bonds
    Ngper,  // perturbed angles
    Ndper,  // perturbed dihedrals
    Mbper,  // bonds completely in the perturbed group
    Mgper,  // angles completely in the perturbed group
    Mdper,  // dihedrals completely in the perturbed group
    Ifbox,  // 1 for a standard periodic box, 2 for a truncated octahedron
    Nmxrs,  // atoms in the largest residue
    Ifcap,  // 1 if the CAP option was used
}

impl Pointer {
    pub const COUNT: usize = 30;

    pub const ALL: [Pointer; Self::COUNT] = [
        Self::Natom,
        Self::Ntypes,
        Self::Nbonh,
        Self::Mbona,
        Self::Ntheth,
        Self::Mtheta,
        Self::Nphih,
        Self::Mphia,
        Self::Nhparm,
        Self::Nparm,
        Self::Next,
        Self::Nres,
        Self::Nbona,
        Self::Ntheta,
        Self::Nphia,
        Self::Numbnd,
        Self::Numang,
        Self::Nptra,
        Self::Natyp,
        Self::Nphb,
        Self::Ifpert,
        Self::Nbper,
        Self::Ngper,
        Self::Ndper,
        Self::Mbper,
        Self::Mgper,
        Self::Mdper,
        Self::Ifbox,
        Self::Nmxrs,
        Self::Ifcap,
    ];

    #[inline]
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        LABELS[self.position()]
    }

    pub fn from_label(label: &str) -> Result<Self, PrmtopError> {
        POINTER_BY_LABEL
            .get(label)
            .copied()
            .ok_or_else(|| PrmtopError::PointerIndex(label.to_string()))
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const LABELS: [&str; Pointer::COUNT] = [
    "NATOM", "NTYPES", "NBONH", "MBONA", "NTHETH", "MTHETA", "NPHIH", "MPHIA", "NHPARM", "NPARM",
    "NEXT", "NRES", "NBONA", "NTHETA", "NPHIA", "NUMBND", "NUMANG", "NPTRA", "NATYP", "NPHB",
    "IFPERT", "NBPER", "NGPER", "NDPER", "MBPER", "MGPER", "MDPER", "IFBOX", "NMXRS", "IFCAP",
];

static POINTER_BY_LABEL: phf::Map<&'static str, Pointer> = phf_map! {
    "NATOM" => Pointer::Natom,
    "NTYPES" => Pointer::Ntypes,
    "NBONH" => Pointer::Nbonh,
    "MBONA" => Pointer::Mbona,
    "NTHETH" => Pointer::Ntheth,
    "MTHETA" => Pointer::Mtheta,
    "NPHIH" => Pointer::Nphih,
    "MPHIA" => Pointer::Mphia,
    "NHPARM" => Pointer::Nhparm,
    "NPARM" => Pointer::Nparm,
    "NEXT" => Pointer::Next,
    "NRES" => Pointer::Nres,
    "NBONA" => Pointer::Nbona,
    "NTHETA" => Pointer::Ntheta,
    "NPHIA" => Pointer::Nphia,
    "NUMBND" => Pointer::Numbnd,
    "NUMANG" => Pointer::Numang,
    "NPTRA" => Pointer::Nptra,
    "NATYP" => Pointer::Natyp,
    "NPHB" => Pointer::Nphb,
    "IFPERT" => Pointer::Ifpert,
    "NBPER" => Pointer::Nbper,
    "NGPER" => Pointer::Ngper,
    "NDPER" => Pointer::Ndper,
    "MBPER" => Pointer::Mbper,
    "MGPER" => Pointer::Mgper,
    "MDPER" => Pointer::Mdper,
    "IFBOX" => Pointer::Ifbox,
    "NMXRS" => Pointer::Nmxrs,
    "IFCAP" => Pointer::Ifcap,
};

/// The decoded `POINTERS` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerTable {
    values: [i64; Pointer::COUNT],
}

impl PointerTable {
    /// Reads the first 30 integers of the `POINTERS` section.
    ///
    /// Newer files append further counters (`NUMEXTRA`, `NCOPY`); those are
    /// ignored.
    pub fn from_sections(sections: &PrmtopSections) -> Result<Self, PrmtopError> {
        let raw = sections.integers(&SectionFlag::Pointers)?;
        Self::from_values(&raw)
    }

    pub fn from_values(raw: &[i64]) -> Result<Self, PrmtopError> {
        if raw.len() < Pointer::COUNT {
            return Err(PrmtopError::inconsistent(
                SectionFlag::Pointers.name(),
                format!("expected {} values, found {}", Pointer::COUNT, raw.len()),
            ));
        }
        if raw.len() > Pointer::COUNT {
            warn!(
                "POINTERS holds {} values; only the first {} are interpreted.",
                raw.len(),
                Pointer::COUNT
            );
        }
        let mut values = [0; Pointer::COUNT];
        values.copy_from_slice(&raw[..Pointer::COUNT]);
        Ok(Self { values })
    }

    #[inline]
    pub fn get(&self, pointer: Pointer) -> i64 {
        self.values[pointer.position()]
    }

    pub fn get_by_label(&self, label: &str) -> Result<i64, PrmtopError> {
        Ok(self.get(Pointer::from_label(label)?))
    }

    /// Reads a counter that must be non-negative, such as an atom count.
    pub fn count(&self, pointer: Pointer) -> Result<usize, PrmtopError> {
        usize::try_from(self.get(pointer)).map_err(|_| {
            PrmtopError::inconsistent(
                SectionFlag::Pointers.name(),
                format!("{} must not be negative (found {})", pointer, self.get(pointer)),
            )
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pointer, i64)> + '_ {
        Pointer::ALL.iter().map(|&p| (p, self.get(p)))
    }
}
