use serde::Serialize;

/// Represents one atom of a decoded prmtop topology.
///
/// All fields are derived from the per-atom sections of the file. Indices are
/// zero-based throughout, whereas the file itself uses one-based pointers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atom {
    /// Zero-based position of the atom in the file.
    pub index: usize,
    /// The atom name (e.g., "CA", "HB2").
    pub name: String,
    /// The force field atom type (e.g., "CT", "HC").
    pub type_name: String,
    /// One-based index into the Lennard-Jones type table.
    pub type_index: usize,
    /// Zero-based index of the residue this atom belongs to.
    pub residue_id: usize,
    /// Atomic mass in Daltons.
    pub mass: f64,
    /// Partial charge in elementary charge units.
    pub charge: f64,
}

impl Atom {
    /// Returns `true` if the AMBER type marks this atom as a hydrogen.
    pub fn is_hydrogen(&self) -> bool {
        self.type_name.starts_with('H')
    }
}
