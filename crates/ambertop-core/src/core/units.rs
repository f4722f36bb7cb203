//! Units attached to every quantity exposed by the force-field model.
//!
//! Values are stored in the units the prmtop format uses (Angstrom, kcal/mol,
//! degrees, elementary charge, Dalton). Each [`Unit`] documents its physical
//! [`Dimension`] and the factor that converts it into the molecular-dynamics
//! unit system (nm, kJ/mol, radians, e, Da).

use serde::{Deserialize, Serialize};

/// Divisor between the prmtop charge field and elementary charges.
///
/// The file stores `q * sqrt(332.0522173)` so that Coulomb energies come out
/// in kcal/mol without a prefactor.
pub const AMBER_CHARGE_SCALE: f64 = 18.2223;

pub const KCAL_TO_KJ: f64 = 4.184;
pub const ANGSTROM_TO_NM: f64 = 0.1;
pub const DEGREE_TO_RADIAN: f64 = std::f64::consts::PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    Angle,
    Energy,
    BondStiffness,
    AngleStiffness,
    Charge,
    ChargeSquared,
    Mass,
    Dimensionless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Angstrom,
    Degree,
    KcalPerMol,
    KcalPerMolPerAngstromSquared,
    KcalPerMolPerRadianSquared,
    ElementaryCharge,
    ElementaryChargeSquared,
    Dalton,
    Dimensionless,
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Self::Angstrom => Dimension::Length,
            Self::Degree => Dimension::Angle,
            Self::KcalPerMol => Dimension::Energy,
            Self::KcalPerMolPerAngstromSquared => Dimension::BondStiffness,
            Self::KcalPerMolPerRadianSquared => Dimension::AngleStiffness,
            Self::ElementaryCharge => Dimension::Charge,
            Self::ElementaryChargeSquared => Dimension::ChargeSquared,
            Self::Dalton => Dimension::Mass,
            Self::Dimensionless => Dimension::Dimensionless,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Angstrom => "Å",
            Self::Degree => "deg",
            Self::KcalPerMol => "kcal/mol",
            Self::KcalPerMolPerAngstromSquared => "kcal/mol/Å²",
            Self::KcalPerMolPerRadianSquared => "kcal/mol/rad²",
            Self::ElementaryCharge => "e",
            Self::ElementaryChargeSquared => "e²",
            Self::Dalton => "Da",
            Self::Dimensionless => "",
        }
    }

    /// Factor that converts a value in this unit into MD units.
    pub fn md_factor(self) -> f64 {
        match self {
            Self::Angstrom => ANGSTROM_TO_NM,
            Self::Degree => DEGREE_TO_RADIAN,
            Self::KcalPerMol | Self::KcalPerMolPerRadianSquared => KCAL_TO_KJ,
            Self::KcalPerMolPerAngstromSquared => KCAL_TO_KJ / (ANGSTROM_TO_NM * ANGSTROM_TO_NM),
            Self::ElementaryCharge
            | Self::ElementaryChargeSquared
            | Self::Dalton
            | Self::Dimensionless => 1.0,
        }
    }
}

/// The unit system a system description is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitSystem {
    /// Native prmtop units: Å, kcal/mol, degrees.
    #[default]
    Amber,
    /// nm, kJ/mol, radians.
    Md,
}

impl UnitSystem {
    /// Converts `value`, given in the native `unit`, into this unit system.
    #[inline]
    pub fn convert(self, value: f64, unit: Unit) -> f64 {
        match self {
            Self::Amber => value,
            Self::Md => value * unit.md_factor(),
        }
    }

    pub fn symbol(self, unit: Unit) -> &'static str {
        match (self, unit) {
            (Self::Amber, unit) => unit.symbol(),
            (Self::Md, Unit::Angstrom) => "nm",
            (Self::Md, Unit::Degree) => "rad",
            (Self::Md, Unit::KcalPerMol) => "kJ/mol",
            (Self::Md, Unit::KcalPerMolPerAngstromSquared) => "kJ/mol/nm²",
            (Self::Md, Unit::KcalPerMolPerRadianSquared) => "kJ/mol/rad²",
            (Self::Md, unit) => unit.symbol(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn bond_stiffness_converts_to_kj_per_nm_squared() {
        let k = UnitSystem::Md.convert(1.0, Unit::KcalPerMolPerAngstromSquared);
        assert!((k - 418.4).abs() < TOLERANCE);
    }

    #[test]
    fn degrees_convert_to_radians() {
        let angle = UnitSystem::Md.convert(180.0, Unit::Degree);
        assert!((angle - std::f64::consts::PI).abs() < TOLERANCE);
    }

    #[test]
    fn amber_unit_system_is_identity() {
        assert_eq!(UnitSystem::Amber.convert(1.5, Unit::Angstrom), 1.5);
        assert_eq!(UnitSystem::Amber.symbol(Unit::Angstrom), "Å");
    }

    #[test]
    fn charges_and_masses_are_unchanged_in_md_units() {
        assert_eq!(UnitSystem::Md.convert(-0.834, Unit::ElementaryCharge), -0.834);
        assert_eq!(UnitSystem::Md.convert(15.999, Unit::Dalton), 15.999);
    }

    #[test]
    fn every_unit_reports_its_dimension() {
        assert_eq!(Unit::Angstrom.dimension(), Dimension::Length);
        assert_eq!(Unit::KcalPerMolPerRadianSquared.dimension(), Dimension::AngleStiffness);
        assert_eq!(Unit::ElementaryChargeSquared.dimension(), Dimension::ChargeSquared);
    }

    #[test]
    fn md_symbols_follow_conversion() {
        assert_eq!(UnitSystem::Md.symbol(Unit::Angstrom), "nm");
        assert_eq!(UnitSystem::Md.symbol(Unit::KcalPerMol), "kJ/mol");
    }
}
