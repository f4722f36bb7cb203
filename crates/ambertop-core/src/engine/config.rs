use crate::core::units::UnitSystem;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value {value} for parameter '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Which bonds (and angles) are replaced by rigid distance constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShakeMode {
    #[default]
    None,
    /// Bonds to hydrogen.
    HBonds,
    /// Every bond.
    AllBonds,
    /// Every bond plus the H-X-H and H-O-X angles.
    HAngles,
}

impl ShakeMode {
    pub fn constrains_hydrogen_bonds(self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn constrains_heavy_bonds(self) -> bool {
        matches!(self, Self::AllBonds | Self::HAngles)
    }
}

/// Implicit-solvent model to add on top of the nonbonded force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GbModel {
    #[default]
    None,
    /// Onufriev-Bashford-Case generalized Born with surface area term.
    Obc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonbondedMethod {
    #[default]
    NoCutoff,
    CutoffNonPeriodic,
    CutoffPeriodic,
    Ewald,
    Pme,
}

impl NonbondedMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::NoCutoff => "no-cutoff",
            Self::CutoffNonPeriodic => "cutoff-non-periodic",
            Self::CutoffPeriodic => "cutoff-periodic",
            Self::Ewald => "ewald",
            Self::Pme => "pme",
        }
    }
}

impl fmt::Display for NonbondedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options that turn a force-field model into a system description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SystemConfig {
    pub shake: ShakeMode,
    pub gb_model: GbModel,
    pub nonbonded_method: NonbondedMethod,
    /// Cutoff distance in Å. Periodic systems derive one from the box when unset.
    pub cutoff: Option<f64>,
    /// Keep harmonic terms for constrained bonds and angles.
    pub flexible_constraints: bool,
    pub ewald_error_tolerance: Option<f64>,
    pub units: UnitSystem,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            shake: ShakeMode::None,
            gb_model: GbModel::None,
            nonbonded_method: NonbondedMethod::NoCutoff,
            cutoff: None,
            flexible_constraints: true,
            ewald_error_tolerance: None,
            units: UnitSystem::Amber,
        }
    }
}

impl SystemConfig {
    /// Rejects non-positive or non-finite distances and tolerances.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(cutoff) = self.cutoff {
            if !(cutoff.is_finite() && cutoff > 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name: "cutoff",
                    value: cutoff,
                    reason: "must be a positive distance",
                });
            }
        }
        if let Some(tolerance) = self.ewald_error_tolerance {
            if !(tolerance.is_finite() && tolerance > 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name: "ewald-error-tolerance",
                    value: tolerance,
                    reason: "must be positive",
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct SystemConfigBuilder {
    shake: Option<ShakeMode>,
    gb_model: Option<GbModel>,
    nonbonded_method: Option<NonbondedMethod>,
    cutoff: Option<f64>,
    flexible_constraints: Option<bool>,
    ewald_error_tolerance: Option<f64>,
    units: Option<UnitSystem>,
}

impl SystemConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shake(mut self, mode: ShakeMode) -> Self {
        self.shake = Some(mode);
        self
    }
    pub fn gb_model(mut self, model: GbModel) -> Self {
        self.gb_model = Some(model);
        self
    }
    pub fn nonbonded_method(mut self, method: NonbondedMethod) -> Self {
        self.nonbonded_method = Some(method);
        self
    }
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn flexible_constraints(mut self, flexible: bool) -> Self {
        self.flexible_constraints = Some(flexible);
        self
    }
    pub fn ewald_error_tolerance(mut self, tolerance: f64) -> Self {
        self.ewald_error_tolerance = Some(tolerance);
        self
    }
    pub fn units(mut self, units: UnitSystem) -> Self {
        self.units = Some(units);
        self
    }

    /// Fills unset options with their defaults and validates the result.
    ///
    /// A cutoff-based non-periodic method needs an explicit cutoff, since
    /// there is no box to derive one from.
    pub fn build(self) -> Result<SystemConfig, ConfigError> {
        let defaults = SystemConfig::default();
        let nonbonded_method = self.nonbonded_method.unwrap_or(defaults.nonbonded_method);
        if nonbonded_method == NonbondedMethod::CutoffNonPeriodic && self.cutoff.is_none() {
            return Err(ConfigError::MissingParameter("cutoff"));
        }

        let config = SystemConfig {
            shake: self.shake.unwrap_or(defaults.shake),
            gb_model: self.gb_model.unwrap_or(defaults.gb_model),
            nonbonded_method,
            cutoff: self.cutoff,
            flexible_constraints: self
                .flexible_constraints
                .unwrap_or(defaults.flexible_constraints),
            ewald_error_tolerance: self.ewald_error_tolerance,
            units: self.units.unwrap_or(defaults.units),
        };
        config.validate()?;
        Ok(config)
    }
}
