use super::config::NonbondedMethod;
use crate::core::units::UnitSystem;
use nalgebra::Vector3;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// A rigid distance between two particles.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Constraint {
    pub atom_i: usize,
    pub atom_j: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct HarmonicBond {
    pub atom_i: usize,
    pub atom_j: usize,
    pub length: f64,
    pub force_constant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct HarmonicAngle {
    pub atom_i: usize,
    pub atom_j: usize,
    pub atom_k: usize,
    pub angle: f64,
    pub force_constant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PeriodicTorsion {
    pub atom_i: usize,
    pub atom_j: usize,
    pub atom_k: usize,
    pub atom_l: usize,
    pub periodicity: i32,
    pub phase: f64,
    pub force_constant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct NonbondedParticle {
    pub charge: f64,
    pub sigma: f64,
    pub epsilon: f64,
}

/// A pair whose nonbonded interaction replaces the default combination.
///
/// Fully excluded pairs carry a zero charge product and well depth.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct NonbondedException {
    pub atom_i: usize,
    pub atom_j: usize,
    pub charge_product: f64,
    pub sigma: f64,
    pub epsilon: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NonbondedForce {
    pub method: NonbondedMethod,
    pub cutoff: Option<f64>,
    pub ewald_error_tolerance: Option<f64>,
    pub particles: Vec<NonbondedParticle>,
    pub exceptions: Vec<NonbondedException>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct GbsaParticle {
    pub charge: f64,
    pub radius: f64,
    pub screening_factor: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GbsaObcForce {
    pub method: NonbondedMethod,
    pub cutoff: Option<f64>,
    pub particles: Vec<GbsaParticle>,
}

/// The three edge vectors of a rectangular periodic cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxVectors {
    pub a: Vector3<f64>,
    pub b: Vector3<f64>,
    pub c: Vector3<f64>,
}

impl BoxVectors {
    pub fn rectangular(x: f64, y: f64, z: f64) -> Self {
        Self {
            a: Vector3::new(x, 0.0, 0.0),
            b: Vector3::new(0.0, y, 0.0),
            c: Vector3::new(0.0, 0.0, z),
        }
    }

    /// Length of the shortest edge.
    pub fn min_width(&self) -> f64 {
        [self.a, self.b, self.c]
            .iter()
            .map(|v| v.norm())
            .fold(f64::INFINITY, f64::min)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            a: self.a * factor,
            b: self.b * factor,
            c: self.c * factor,
        }
    }
}

impl Serialize for BoxVectors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let as_array = |v: &Vector3<f64>| [v.x, v.y, v.z];
        let mut state = serializer.serialize_struct("BoxVectors", 3)?;
        state.serialize_field("a", &as_array(&self.a))?;
        state.serialize_field("b", &as_array(&self.b))?;
        state.serialize_field("c", &as_array(&self.c))?;
        state.end()
    }
}

/// An engine-neutral simulation system assembled from a force-field model.
///
/// Every quantity is expressed in [`SystemDescription::units`]. Particle
/// indices match atom indices of the source model.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SystemDescription {
    pub units: UnitSystem,
    pub masses: Vec<f64>,
    pub box_vectors: Option<BoxVectors>,
    pub constraints: Vec<Constraint>,
    pub bonds: Vec<HarmonicBond>,
    pub angles: Vec<HarmonicAngle>,
    pub torsions: Vec<PeriodicTorsion>,
    pub nonbonded: NonbondedForce,
    pub gbsa: Option<GbsaObcForce>,
}

impl SystemDescription {
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.masses.len()
    }

    /// Returns `true` if the system has a periodic cell.
    pub fn is_periodic(&self) -> bool {
        self.box_vectors.is_some()
    }
}
