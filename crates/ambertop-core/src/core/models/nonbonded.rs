use serde::Serialize;

/// `2^(1/6)`, the ratio between the Lennard-Jones minimum and sigma.
const R_MIN_OVER_SIGMA: f64 = 1.122_462_048_309_373;

/// Per-atom Lennard-Jones parameters reconstructed from the A/B tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LennardJones {
    /// Position of the potential minimum for a like pair, in Å.
    pub r_min: f64,
    /// Well depth in kcal/mol.
    pub epsilon: f64,
}

impl LennardJones {
    /// Parameters of a type that has no Lennard-Jones interaction.
    pub const NON_INTERACTING: Self = Self {
        r_min: 1.0,
        epsilon: 0.0,
    };

    /// Reconstructs `(r_min, epsilon)` from the `A/r^12 - B/r^6` coefficients.
    ///
    /// Returns [`LennardJones::NON_INTERACTING`] when either coefficient is zero.
    pub fn from_coefficients(a: f64, b: f64) -> Self {
        if a == 0.0 || b == 0.0 {
            return Self::NON_INTERACTING;
        }
        Self {
            r_min: (2.0 * a / b).powf(1.0 / 6.0),
            epsilon: 0.25 * b * b / a,
        }
    }

    /// The `(A, B)` coefficients that produce these parameters.
    pub fn coefficients(&self) -> (f64, f64) {
        let r6 = self.r_min.powi(6);
        (self.epsilon * r6 * r6, 2.0 * self.epsilon * r6)
    }

    /// Half of `r_min`, the per-atom van der Waals radius.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.r_min / 2.0
    }

    /// The distance at which the potential crosses zero.
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.r_min / R_MIN_OVER_SIGMA
    }
}

/// A scaled 1-4 nonbonded interaction between the end atoms of a torsion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Exception14 {
    pub atom_i: usize,
    pub atom_l: usize,
    /// e², already divided by the electrostatic scale factor.
    pub charge_product: f64,
    /// Combined minimum distance in Å.
    pub r_min: f64,
    /// kcal/mol, already divided by the Lennard-Jones scale factor.
    pub epsilon: f64,
}

impl Exception14 {
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.r_min / R_MIN_OVER_SIGMA
    }
}

/// One row of the merged nonbonded pair table handed to an engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum NonbondedPair {
    /// A 1-4 pair with scaled parameters.
    Scaled(Exception14),
    /// A pair with no nonbonded interaction at all.
    Excluded { atom_i: usize, atom_j: usize },
}

impl NonbondedPair {
    pub fn atoms(&self) -> (usize, usize) {
        match *self {
            Self::Scaled(exception) => (exception.atom_i, exception.atom_l),
            Self::Excluded { atom_i, atom_j } => (atom_i, atom_j),
        }
    }

    /// The pair with the smaller index first.
    pub fn key(&self) -> (usize, usize) {
        let (i, j) = self.atoms();
        (i.min(j), i.max(j))
    }
}

/// Generalized-Born parameters of one atom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolventParticle {
    /// Intrinsic Born radius in Å.
    pub radius: f64,
    /// Dimensionless descreening factor.
    pub screening_factor: f64,
}

/// A rectangular (or monoclinic) periodic box as stored in `BOX_DIMENSIONS`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodicBox {
    /// Degrees.
    pub beta: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PeriodicBox {
    pub fn min_extent(&self) -> f64 {
        self.x.min(self.y).min(self.z)
    }
}
