use crate::cli::{BuildArgs, DecodeOverrides};
use crate::error::{CliError, Result};
use ambertop::core::forcefield::options::DecodeOptions;
use ambertop::core::units::UnitSystem;
use ambertop::engine::config::{
    GbModel, NonbondedMethod, ShakeMode, SystemConfig, SystemConfigBuilder,
};
use ambertop::workflows::build::BuildSettings;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialDecodeConfig {
    scee: Option<f64>,
    scnb: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialSystemConfig {
    shake: Option<ShakeMode>,
    gb_model: Option<GbModel>,
    nonbonded_method: Option<NonbondedMethod>,
    cutoff: Option<f64>,
    flexible_constraints: Option<bool>,
    ewald_error_tolerance: Option<f64>,
    units: Option<UnitSystem>,
}

/// The `[decode]` and `[system]` tables of a build configuration file.
///
/// Every key is optional; missing keys fall back to command-line overrides
/// and then to the library defaults.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialBuildConfig {
    decode: Option<PartialDecodeConfig>,
    system: Option<PartialSystemConfig>,
}

impl PartialBuildConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &BuildArgs) -> Result<BuildSettings> {
        let decode = merge_decode(self.decode.take().unwrap_or_default(), &args.decode);
        let file = self.system.take().unwrap_or_default();

        let mut builder = SystemConfigBuilder::new();
        if let Some(shake) = args.shake.map(Into::into).or(file.shake) {
            builder = builder.shake(shake);
        }
        if let Some(model) = args.gb_model.map(Into::into).or(file.gb_model) {
            builder = builder.gb_model(model);
        }
        if let Some(method) = args.nonbonded_method.map(Into::into).or(file.nonbonded_method) {
            builder = builder.nonbonded_method(method);
        }
        if let Some(cutoff) = args.cutoff.or(file.cutoff) {
            builder = builder.cutoff(cutoff);
        }
        if args.rigid {
            builder = builder.flexible_constraints(false);
        } else if let Some(flexible) = file.flexible_constraints {
            builder = builder.flexible_constraints(flexible);
        }
        if let Some(tolerance) = args.ewald_error_tolerance.or(file.ewald_error_tolerance) {
            builder = builder.ewald_error_tolerance(tolerance);
        }
        if let Some(units) = args.units.map(Into::into).or(file.units) {
            builder = builder.units(units);
        }

        let system: SystemConfig = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(BuildSettings { decode, system })
    }
}

/// Applies command-line scale divisors over the file values and defaults.
pub fn merge_decode(file: PartialDecodeConfig, cli: &DecodeOverrides) -> DecodeOptions {
    let defaults = DecodeOptions::default();
    DecodeOptions::new(
        cli.scee.or(file.scee).unwrap_or(defaults.scee),
        cli.scnb.or(file.scnb).unwrap_or(defaults.scnb),
    )
}
