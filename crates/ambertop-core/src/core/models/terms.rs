use serde::Serialize;

/// A harmonic bond stretch term.
///
/// `force_constant` is the simulation constant `k` of `E = 1/2 k (r - r0)^2`,
/// i.e. twice the value stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BondTerm {
    pub atom_i: usize,
    pub atom_j: usize,
    /// kcal/mol/Å².
    pub force_constant: f64,
    /// Å.
    pub equilibrium_length: f64,
    pub contains_hydrogen: bool,
}

/// A harmonic angle bend term.
///
/// As for bonds, `force_constant` is twice the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleTerm {
    pub atom_i: usize,
    pub atom_j: usize,
    pub atom_k: usize,
    /// kcal/mol/rad².
    pub force_constant: f64,
    /// Degrees.
    pub equilibrium_angle: f64,
}

/// One Fourier term of a proper or improper torsion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DihedralTerm {
    pub atom_i: usize,
    pub atom_j: usize,
    pub atom_k: usize,
    pub atom_l: usize,
    /// Barrier height in kcal/mol, as stored.
    pub force_constant: f64,
    /// Degrees.
    pub phase: f64,
    pub periodicity: i32,
    /// Whether the i-l pair receives a scaled 1-4 nonbonded interaction.
    pub has_14: bool,
    /// Whether the term is an improper torsion.
    pub improper: bool,
}
