use crate::core::error::PrmtopError;
use crate::core::forcefield::model::ForceFieldModel;
use crate::core::forcefield::options::DecodeOptions;
use crate::core::io::prmtop::{LoadError, PrmtopFile};
use crate::core::io::traits::TopologyFile;
use crate::core::units::Unit;
use crate::engine::assembler::build_system;
use crate::engine::config::SystemConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::system::SystemDescription;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum SettingsLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to read prmtop file '{path}': {source}")]
    Load { path: String, source: LoadError },
    #[error(transparent)]
    Prmtop(#[from] PrmtopError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Settings(#[from] SettingsLoadError),
}

/// Everything needed to go from a prmtop file to a system description.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BuildSettings {
    pub decode: DecodeOptions,
    pub system: SystemConfig,
}

impl BuildSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| SettingsLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }
}

/// Reads a prmtop file and decodes every collection of its force-field model.
///
/// # Arguments
///
/// * `path` - Location of the prmtop file.
/// * `options` - 1-4 scale divisors applied to the derived exceptions.
///
/// # Errors
///
/// Returns [`BuildError::Load`] if the file cannot be read or tokenized and
/// [`BuildError::Prmtop`] if any derived collection is inconsistent.
#[instrument(skip_all, name = "load_model")]
pub fn load_model(path: &Path, options: DecodeOptions) -> Result<ForceFieldModel, BuildError> {
    let sections = PrmtopFile::read_from_path(path).map_err(|e| BuildError::Load {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    let model = ForceFieldModel::decode(sections, options)?;
    info!(
        path = %path.display(),
        atoms = model.atom_count(),
        "Decoded force-field model."
    );
    Ok(model)
}

/// Decodes a prmtop file and assembles its system description.
#[instrument(skip_all, name = "build_workflow")]
pub fn run(
    path: &Path,
    settings: &BuildSettings,
    reporter: &ProgressReporter,
) -> Result<(ForceFieldModel, SystemDescription), BuildError> {
    reporter.report(Progress::PhaseStart { name: "Decoding" });
    let model = load_model(path, settings.decode)?;
    report_collections(&model, reporter)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Assembling" });
    let system = build_system(&model, &settings.system)?;
    report_system(&system, reporter);
    reporter.report(Progress::PhaseFinish);

    info!(
        particles = system.particle_count(),
        periodic = system.is_periodic(),
        "Build workflow complete."
    );
    Ok((model, system))
}

fn report_collections(
    model: &ForceFieldModel,
    reporter: &ProgressReporter,
) -> Result<(), BuildError> {
    let counts = [
        ("residues", model.residues()?.len()),
        ("atoms", model.atoms()?.len()),
        ("bonds", model.bonds()?.len()),
        ("angles", model.angles()?.len()),
        ("dihedrals", model.dihedrals()?.len()),
        ("exceptions", model.exceptions_14()?.len()),
        ("nonbonded pairs", model.nonbonded_pairs()?.len()),
    ];
    for (collection, count) in counts {
        reporter.report(Progress::Decoded { collection, count });
    }
    Ok(())
}

fn report_system(system: &SystemDescription, reporter: &ProgressReporter) {
    let length = system.units.symbol(Unit::Angstrom);
    if let Some(vectors) = &system.box_vectors {
        reporter.report(Progress::Message(format!(
            "Periodic cell with shortest edge {:.4} {}",
            vectors.min_width(),
            length
        )));
    }
    if let Some(cutoff) = system.nonbonded.cutoff {
        reporter.report(Progress::Message(format!(
            "Nonbonded method {} with cutoff {:.4} {}",
            system.nonbonded.method, cutoff, length
        )));
    }
}
