use crate::cli::BuildArgs;
use crate::config::PartialBuildConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use ambertop::engine::progress::ProgressReporter;
use ambertop::engine::system::SystemDescription;
use ambertop::workflows;
use std::path::Path;
use tracing::info;

pub fn run(args: BuildArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialBuildConfig::from_file(path)?,
        None => PartialBuildConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the build workflow on {:?}", &args.input);
    let (_, system) = workflows::build::run(&args.input, &settings, &reporter)?;

    println!(
        "Assembled {} particle(s): {} constraint(s), {} bond(s), {} angle(s), {} torsion(s), {} exception(s).",
        system.particle_count(),
        system.constraints.len(),
        system.bonds.len(),
        system.angles.len(),
        system.torsions.len(),
        system.nonbonded.exceptions.len()
    );

    if let Some(output) = &args.output {
        write_system(&system, output)?;
        println!("System description written to: {}", output.display());
    }
    Ok(())
}

fn write_system(system: &SystemDescription, path: &Path) -> Result<()> {
    let text = toml::to_string(system).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    std::fs::write(path, text)?;
    Ok(())
}
