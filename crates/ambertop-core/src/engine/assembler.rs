use super::config::{GbModel, NonbondedMethod, ShakeMode, SystemConfig};
use super::error::EngineError;
use super::system::{
    BoxVectors, Constraint, GbsaObcForce, GbsaParticle, HarmonicAngle, HarmonicBond,
    NonbondedException, NonbondedForce, NonbondedParticle, PeriodicTorsion, SystemDescription,
};
use crate::core::error::PrmtopError;
use crate::core::forcefield::model::ForceFieldModel;
use crate::core::io::section::SectionFlag;
use crate::core::models::atom::Atom;
use crate::core::models::nonbonded::{NonbondedPair, PeriodicBox};
use crate::core::models::terms::AngleTerm;
use crate::core::units::{Unit, UnitSystem};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Fraction of half the shortest box edge used as the default periodic cutoff.
const CUTOFF_CLEARANCE_FACTOR: f64 = 0.97;

/// Sigma and well depth written for fully excluded pairs.
const EXCLUDED_SIGMA_ANGSTROM: f64 = 1.0;

/// Assembles an engine-neutral system from a decoded force-field model.
///
/// # Arguments
///
/// * `model` - The force-field model to read terms from.
/// * `config` - Constraint, nonbonded and implicit-solvent options.
///
/// # Return
///
/// Returns the system expressed in `config.units`.
///
/// # Errors
///
/// Returns [`EngineError`] if the model fails to decode, the nonbonded method
/// does not fit the periodicity of the system or the solvent model, or a
/// constrained angle lacks one of its bond constraints.
#[instrument(skip_all, name = "system_assembly")]
pub fn build_system(
    model: &ForceFieldModel,
    config: &SystemConfig,
) -> Result<SystemDescription, EngineError> {
    config.validate()?;
    let units = config.units;
    let atoms = model.atoms()?;

    let masses = atoms
        .iter()
        .map(|atom| units.convert(atom.mass, Unit::Dalton))
        .collect();

    let mut constraints = ConstraintSet::default();
    if config.shake.constrains_hydrogen_bonds() {
        for bond in model.bonds_with_h()? {
            constraints.add(bond.atom_i, bond.atom_j, bond.equilibrium_length);
        }
    }
    if config.shake.constrains_heavy_bonds() {
        for bond in model.bonds_without_h()? {
            constraints.add(bond.atom_i, bond.atom_j, bond.equilibrium_length);
        }
    }

    let mut bonds = Vec::new();
    for bond in model.bonds()? {
        let constrained = if bond.contains_hydrogen {
            config.shake.constrains_hydrogen_bonds()
        } else {
            config.shake.constrains_heavy_bonds()
        };
        if config.flexible_constraints || !constrained {
            bonds.push(HarmonicBond {
                atom_i: bond.atom_i,
                atom_j: bond.atom_j,
                length: units.convert(bond.equilibrium_length, Unit::Angstrom),
                force_constant: units
                    .convert(bond.force_constant, Unit::KcalPerMolPerAngstromSquared),
            });
        }
    }

    let mut angles = Vec::new();
    for angle in model.angles()? {
        let constrained = config.shake == ShakeMode::HAngles && is_rigid_angle(atoms, angle);
        if constrained {
            let distance = constraints.closing_distance(angle)?;
            constraints.add(angle.atom_i, angle.atom_k, distance);
        }
        if config.flexible_constraints || !constrained {
            angles.push(HarmonicAngle {
                atom_i: angle.atom_i,
                atom_j: angle.atom_j,
                atom_k: angle.atom_k,
                angle: units.convert(angle.equilibrium_angle, Unit::Degree),
                force_constant: units
                    .convert(angle.force_constant, Unit::KcalPerMolPerRadianSquared),
            });
        }
    }

    let torsions = model
        .dihedrals()?
        .iter()
        .map(|dihedral| PeriodicTorsion {
            atom_i: dihedral.atom_i,
            atom_j: dihedral.atom_j,
            atom_k: dihedral.atom_k,
            atom_l: dihedral.atom_l,
            periodicity: dihedral.periodicity,
            phase: units.convert(dihedral.phase, Unit::Degree),
            force_constant: units.convert(dihedral.force_constant, Unit::KcalPerMol),
        })
        .collect();

    let periodic_box = model.periodic_box()?;
    let (method, cutoff) = resolve_nonbonded_method(config, periodic_box.as_ref())?;
    debug!(%method, cutoff, "Resolved nonbonded treatment.");
    let nonbonded = build_nonbonded(model, config, method, cutoff)?;

    let gbsa = match config.gb_model {
        GbModel::None => None,
        GbModel::Obc => Some(build_gbsa_obc(model, units, method, cutoff)?),
    };

    let box_vectors = periodic_box.map(|pbc| {
        BoxVectors::rectangular(pbc.x, pbc.y, pbc.z).scaled(units.convert(1.0, Unit::Angstrom))
    });

    let system = SystemDescription {
        units,
        masses,
        box_vectors,
        constraints: constraints.into_converted(units),
        bonds,
        angles,
        torsions,
        nonbonded,
        gbsa,
    };
    info!(
        particles = system.particle_count(),
        constraints = system.constraints.len(),
        bonds = system.bonds.len(),
        angles = system.angles.len(),
        torsions = system.torsions.len(),
        exceptions = system.nonbonded.exceptions.len(),
        "Assembled system."
    );
    Ok(system)
}

/// Constraints in file units, with a lookup for the bonded pairs.
#[derive(Default)]
struct ConstraintSet {
    constraints: Vec<Constraint>,
    lengths: HashMap<(usize, usize), f64>,
}

impl ConstraintSet {
    fn add(&mut self, atom_i: usize, atom_j: usize, distance: f64) {
        self.lengths
            .entry((atom_i.min(atom_j), atom_i.max(atom_j)))
            .or_insert(distance);
        self.constraints.push(Constraint {
            atom_i,
            atom_j,
            distance,
        });
    }

    fn length(&self, atom_i: usize, atom_j: usize) -> Option<f64> {
        self.lengths
            .get(&(atom_i.min(atom_j), atom_i.max(atom_j)))
            .copied()
    }

    /// The i-k distance of a rigid angle, from its two constrained bonds.
    fn closing_distance(&self, angle: &AngleTerm) -> Result<f64, EngineError> {
        let missing = |bond_i, bond_j| EngineError::MissingBondConstraint {
            atom_i: angle.atom_i,
            atom_j: angle.atom_j,
            atom_k: angle.atom_k,
            bond_i,
            bond_j,
        };
        let l1 = self
            .length(angle.atom_i, angle.atom_j)
            .ok_or_else(|| missing(angle.atom_i, angle.atom_j))?;
        let l2 = self
            .length(angle.atom_j, angle.atom_k)
            .ok_or_else(|| missing(angle.atom_j, angle.atom_k))?;
        let theta = angle.equilibrium_angle.to_radians();
        Ok((l1 * l1 + l2 * l2 - 2.0 * l1 * l2 * theta.cos()).sqrt())
    }

    fn into_converted(self, units: UnitSystem) -> Vec<Constraint> {
        self.constraints
            .into_iter()
            .map(|c| Constraint {
                distance: units.convert(c.distance, Unit::Angstrom),
                ..c
            })
            .collect()
    }
}

/// H-X-H angles, and H-O-X angles with a single hydrogen.
fn is_rigid_angle(atoms: &[Atom], angle: &AngleTerm) -> bool {
    let hydrogens = [angle.atom_i, angle.atom_k]
        .iter()
        .filter(|&&index| atoms[index].is_hydrogen())
        .count();
    hydrogens == 2 || (hydrogens == 1 && atoms[angle.atom_j].type_name.starts_with('O'))
}

/// Checks the method against the periodicity of the system and settles the
/// cutoff in Å.
fn resolve_nonbonded_method(
    config: &SystemConfig,
    periodic_box: Option<&PeriodicBox>,
) -> Result<(NonbondedMethod, Option<f64>), EngineError> {
    let method = config.nonbonded_method;
    match periodic_box {
        None => match method {
            NonbondedMethod::NoCutoff => Ok((method, None)),
            NonbondedMethod::CutoffNonPeriodic => match config.cutoff {
                Some(cutoff) => Ok((method, Some(cutoff))),
                None => Err(EngineError::MissingCutoff { method }),
            },
            _ => Err(EngineError::IllegalNonbondedMethod {
                method,
                context: "for a non-periodic system",
            }),
        },
        Some(pbc) => {
            let cutoff = config
                .cutoff
                .unwrap_or(CUTOFF_CLEARANCE_FACTOR * pbc.min_extent() / 2.0);
            Ok((method, Some(cutoff)))
        }
    }
}

fn build_nonbonded(
    model: &ForceFieldModel,
    config: &SystemConfig,
    method: NonbondedMethod,
    cutoff: Option<f64>,
) -> Result<NonbondedForce, EngineError> {
    let units = config.units;
    let particles = model
        .atoms()?
        .iter()
        .zip(model.lennard_jones()?)
        .map(|(atom, lj)| NonbondedParticle {
            charge: units.convert(atom.charge, Unit::ElementaryCharge),
            sigma: units.convert(lj.sigma(), Unit::Angstrom),
            epsilon: units.convert(lj.epsilon, Unit::KcalPerMol),
        })
        .collect();

    let exceptions = model
        .nonbonded_pairs()?
        .iter()
        .map(|pair| match *pair {
            NonbondedPair::Scaled(exception) => NonbondedException {
                atom_i: exception.atom_i,
                atom_j: exception.atom_l,
                charge_product: units
                    .convert(exception.charge_product, Unit::ElementaryChargeSquared),
                sigma: units.convert(exception.sigma(), Unit::Angstrom),
                epsilon: units.convert(exception.epsilon, Unit::KcalPerMol),
            },
            NonbondedPair::Excluded { atom_i, atom_j } => NonbondedException {
                atom_i,
                atom_j,
                charge_product: 0.0,
                sigma: units.convert(EXCLUDED_SIGMA_ANGSTROM, Unit::Angstrom),
                epsilon: 0.0,
            },
        })
        .collect();

    Ok(NonbondedForce {
        method,
        cutoff: cutoff.map(|c| units.convert(c, Unit::Angstrom)),
        ewald_error_tolerance: if model.is_periodic() {
            config.ewald_error_tolerance
        } else {
            None
        },
        particles,
        exceptions,
    })
}

fn build_gbsa_obc(
    model: &ForceFieldModel,
    units: UnitSystem,
    method: NonbondedMethod,
    cutoff: Option<f64>,
) -> Result<GbsaObcForce, EngineError> {
    let cutoff = match method {
        NonbondedMethod::NoCutoff => None,
        NonbondedMethod::CutoffNonPeriodic | NonbondedMethod::CutoffPeriodic => cutoff,
        NonbondedMethod::Ewald | NonbondedMethod::Pme => {
            return Err(EngineError::IllegalNonbondedMethod {
                method,
                context: "with GBSA-OBC",
            });
        }
    };
    let solvent = model.solvent()?.ok_or_else(|| {
        PrmtopError::SectionMissing(format!(
            "{} and {} (required by GBSA-OBC)",
            SectionFlag::Radii,
            SectionFlag::Screen
        ))
    })?;

    let particles = model
        .atoms()?
        .iter()
        .zip(solvent)
        .map(|(atom, particle)| GbsaParticle {
            charge: units.convert(atom.charge, Unit::ElementaryCharge),
            radius: units.convert(particle.radius, Unit::Angstrom),
            screening_factor: units.convert(particle.screening_factor, Unit::Dimensionless),
        })
        .collect();

    Ok(GbsaObcForce {
        method,
        cutoff: cutoff.map(|c| units.convert(c, Unit::Angstrom)),
        particles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::options::DecodeOptions;
    use crate::core::io::section::{PrmtopSections, SectionReader};
    use crate::engine::config::SystemConfigBuilder;

    const CHAIN: &str = include_str!("../../tests/data/chain.prmtop");
    const WATER_BOX: &str = include_str!("../../tests/data/water_box.prmtop");
    const TOLERANCE: f64 = 1e-9;

    fn model(text: &str) -> ForceFieldModel {
        let mut reader = SectionReader::new();
        for line in text.lines() {
            reader.feed_line(line).unwrap();
        }
        let sections: PrmtopSections = reader.finish();
        ForceFieldModel::decode(sections, DecodeOptions::default()).unwrap()
    }

    #[test]
    fn default_config_keeps_every_harmonic_term() {
        let system = build_system(&model(CHAIN), &SystemConfig::default()).unwrap();
        assert_eq!(system.particle_count(), 4);
        assert!(system.constraints.is_empty());
        assert_eq!(system.bonds.len(), 3);
        assert_eq!(system.angles.len(), 2);
        assert_eq!(system.torsions.len(), 2);
        assert_eq!(system.nonbonded.method, NonbondedMethod::NoCutoff);
        assert_eq!(system.nonbonded.cutoff, None);
        assert!(system.box_vectors.is_none());
        assert!(system.gbsa.is_none());
    }

    #[test]
    fn rigid_hydrogen_bonds_drop_their_harmonic_terms() {
        let config = SystemConfigBuilder::new()
            .shake(ShakeMode::HBonds)
            .flexible_constraints(false)
            .build()
            .unwrap();
        let system = build_system(&model(CHAIN), &config).unwrap();
        assert_eq!(system.constraints.len(), 2);
        assert_eq!(system.bonds.len(), 1);
        assert_eq!((system.bonds[0].atom_i, system.bonds[0].atom_j), (1, 2));
    }

    #[test]
    fn flexible_constraints_keep_harmonic_bonds() {
        let config = SystemConfigBuilder::new()
            .shake(ShakeMode::AllBonds)
            .build()
            .unwrap();
        let system = build_system(&model(CHAIN), &config).unwrap();
        assert_eq!(system.constraints.len(), 3);
        assert_eq!(system.bonds.len(), 3);
    }

    #[test]
    fn water_angle_is_closed_by_a_constraint() {
        let config = SystemConfigBuilder::new()
            .shake(ShakeMode::HAngles)
            .flexible_constraints(false)
            .build()
            .unwrap();
        let system = build_system(&model(WATER_BOX), &config).unwrap();
        assert_eq!(system.constraints.len(), 3);
        assert!(system.angles.is_empty());

        let closing = system.constraints[2];
        assert_eq!((closing.atom_i, closing.atom_j), (1, 2));
        let theta = 104.52_f64.to_radians();
        let expected = (2.0 * 0.9572 * 0.9572 * (1.0 - theta.cos())).sqrt();
        assert!((closing.distance - expected).abs() < 1e-6);
    }

    #[test]
    fn hc_ct_ct_angles_are_not_rigid() {
        let config = SystemConfigBuilder::new()
            .shake(ShakeMode::HAngles)
            .flexible_constraints(false)
            .build()
            .unwrap();
        let system = build_system(&model(CHAIN), &config).unwrap();
        assert_eq!(system.constraints.len(), 3);
        assert_eq!(system.angles.len(), 2);
    }

    #[test]
    fn periodic_cutoff_defaults_to_box_clearance() {
        let config = SystemConfigBuilder::new()
            .nonbonded_method(NonbondedMethod::Pme)
            .ewald_error_tolerance(5e-4)
            .build()
            .unwrap();
        let system = build_system(&model(WATER_BOX), &config).unwrap();
        let cutoff = system.nonbonded.cutoff.unwrap();
        assert!((cutoff - 0.97 * 20.0 / 2.0).abs() < TOLERANCE);
        assert_eq!(system.nonbonded.ewald_error_tolerance, Some(5e-4));
        let vectors = system.box_vectors.unwrap();
        assert_eq!((vectors.a.x, vectors.b.y, vectors.c.z), (20.0, 21.0, 22.0));
    }

    #[test]
    fn explicit_cutoff_overrides_box_default() {
        let config = SystemConfigBuilder::new()
            .nonbonded_method(NonbondedMethod::CutoffPeriodic)
            .cutoff(8.0)
            .build()
            .unwrap();
        let system = build_system(&model(WATER_BOX), &config).unwrap();
        assert_eq!(system.nonbonded.cutoff, Some(8.0));
    }

    #[test]
    fn non_periodic_system_rejects_ewald() {
        let config = SystemConfigBuilder::new()
            .nonbonded_method(NonbondedMethod::Ewald)
            .build()
            .unwrap();
        let result = build_system(&model(CHAIN), &config);
        assert!(matches!(
            result,
            Err(EngineError::IllegalNonbondedMethod { method: NonbondedMethod::Ewald, .. })
        ));
    }

    #[test]
    fn non_periodic_cutoff_requires_distance() {
        let config = SystemConfig {
            nonbonded_method: NonbondedMethod::CutoffNonPeriodic,
            ..SystemConfig::default()
        };
        let result = build_system(&model(CHAIN), &config);
        assert_eq!(
            result,
            Err(EngineError::MissingCutoff { method: NonbondedMethod::CutoffNonPeriodic })
        );
    }

    #[test]
    fn exceptions_carry_scaled_and_excluded_pairs() {
        let system = build_system(&model(CHAIN), &SystemConfig::default()).unwrap();
        let exceptions = &system.nonbonded.exceptions;
        assert_eq!(exceptions.len(), 6);

        let scaled = exceptions[0];
        assert_eq!((scaled.atom_i, scaled.atom_j), (0, 3));
        assert!((scaled.sigma - 2.974 * 2.0_f64.powf(-1.0 / 6.0)).abs() < 1e-6);

        for excluded in &exceptions[1..] {
            assert_eq!(excluded.charge_product, 0.0);
            assert_eq!(excluded.sigma, 1.0);
            assert_eq!(excluded.epsilon, 0.0);
        }
    }

    #[test]
    fn particle_sigma_follows_r_min() {
        let chain = model(CHAIN);
        let system = build_system(&chain, &SystemConfig::default()).unwrap();
        let lj = chain.lennard_jones().unwrap()[1];
        let particle = system.nonbonded.particles[1];
        assert!((particle.sigma - lj.r_min * 2.0_f64.powf(-1.0 / 6.0)).abs() < TOLERANCE);
        assert_eq!(particle.epsilon, lj.epsilon);
    }

    #[test]
    fn gbsa_obc_uses_solvent_parameters() {
        let config = SystemConfigBuilder::new().gb_model(GbModel::Obc).build().unwrap();
        let system = build_system(&model(CHAIN), &config).unwrap();
        let gbsa = system.gbsa.unwrap();
        assert_eq!(gbsa.particles.len(), 4);
        assert_eq!(gbsa.particles[1].radius, 1.7);
        assert_eq!(gbsa.particles[1].screening_factor, 0.72);
        assert_eq!(gbsa.cutoff, None);
    }

    #[test]
    fn gbsa_obc_without_radii_is_missing_sections() {
        let config = SystemConfigBuilder::new().gb_model(GbModel::Obc).build().unwrap();
        let result = build_system(&model(WATER_BOX), &config);
        assert!(matches!(
            result,
            Err(EngineError::Prmtop(PrmtopError::SectionMissing(_)))
        ));
    }

    #[test]
    fn gbsa_obc_rejects_pme() {
        let config = SystemConfigBuilder::new()
            .gb_model(GbModel::Obc)
            .nonbonded_method(NonbondedMethod::Pme)
            .build()
            .unwrap();
        let result = build_system(&model(WATER_BOX), &config);
        assert!(matches!(
            result,
            Err(EngineError::IllegalNonbondedMethod { context: "with GBSA-OBC", .. })
        ));
    }

    #[test]
    fn md_units_convert_every_quantity() {
        let config = SystemConfigBuilder::new()
            .units(UnitSystem::Md)
            .nonbonded_method(NonbondedMethod::CutoffPeriodic)
            .cutoff(10.0)
            .build()
            .unwrap();
        let system = build_system(&model(WATER_BOX), &config).unwrap();
        assert_eq!(system.units, UnitSystem::Md);
        assert!((system.bonds[0].length - 0.09572).abs() < 1e-12);
        assert!((system.bonds[0].force_constant - 1106.0 * 418.4).abs() < 1e-6);
        assert!((system.angles[0].angle - 104.52_f64.to_radians()).abs() < 1e-6);
        assert!((system.nonbonded.cutoff.unwrap() - 1.0).abs() < 1e-12);
        assert!((system.box_vectors.unwrap().a.x - 2.0).abs() < 1e-12);
        assert_eq!(system.masses[0], 16.0);
    }
}
