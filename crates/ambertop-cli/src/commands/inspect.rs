use crate::cli::InspectArgs;
use crate::config::{PartialDecodeConfig, merge_decode};
use crate::error::{CliError, Result};
use ambertop::core::error::PrmtopError;
use ambertop::core::forcefield::model::ForceFieldModel;
use ambertop::core::models::nonbonded::NonbondedPair;
use ambertop::workflows::build::load_model;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct AtomRecord<'a> {
    index: usize,
    name: &'a str,
    type_name: &'a str,
    residue_id: usize,
    residue_label: &'a str,
    mass: f64,
    charge: f64,
    r_min: f64,
    epsilon: f64,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let options = merge_decode(PartialDecodeConfig::default(), &args.decode);
    info!("Decoding {:?} with {:?}", &args.input, options);
    let model = load_model(&args.input, options)?;

    print!("{}", summarize(&model)?);

    if let Some(path) = &args.atoms_csv {
        let rows = write_atoms_csv(&model, path)?;
        println!("Wrote {} atom record(s) to {}", rows, path.display());
    }
    Ok(())
}

fn summarize(model: &ForceFieldModel) -> Result<String> {
    let pairs = decoded(model.nonbonded_pairs())?;
    let excluded = pairs
        .iter()
        .filter(|pair| matches!(pair, NonbondedPair::Excluded { .. }))
        .count();

    let mut lines = vec![
        format!("Title:       {}", model.title().unwrap_or("(none)")),
        format!("Version:     {}", model.version().unwrap_or("(none)")),
        format!("Atoms:       {}", model.atom_count()),
        format!("Residues:    {}", decoded(model.residues())?.len()),
        format!(
            "Bonds:       {} ({} with hydrogen)",
            decoded(model.bonds())?.len(),
            decoded(model.bonds_with_h())?.len()
        ),
        format!("Angles:      {}", decoded(model.angles())?.len()),
        format!("Dihedrals:   {}", decoded(model.dihedrals())?.len()),
        format!(
            "Pairs:       {} scaled 1-4, {} excluded",
            pairs.len() - excluded,
            excluded
        ),
    ];
    match decoded(model.periodic_box())? {
        Some(pbc) => lines.push(format!(
            "Box:         {:.4} x {:.4} x {:.4} A (beta {:.2} deg)",
            pbc.x, pbc.y, pbc.z, pbc.beta
        )),
        None => lines.push("Box:         none".to_string()),
    }
    let solvent = if decoded(model.solvent())?.is_some() {
        "present"
    } else {
        "absent"
    };
    lines.push(format!("GB radii:    {}", solvent));

    let mut text = lines.join("\n");
    text.push('\n');
    Ok(text)
}

fn decoded<T>(result: std::result::Result<T, PrmtopError>) -> Result<T> {
    result.map_err(|e| CliError::Build(e.into()))
}

fn write_atoms_csv(model: &ForceFieldModel, path: &Path) -> Result<usize> {
    let parsing_error = |e: csv::Error| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(parsing_error)?;

    let atoms = decoded(model.atoms())?;
    let lennard_jones = decoded(model.lennard_jones())?;
    for (atom, lj) in atoms.iter().zip(lennard_jones) {
        let residue_label = decoded(model.residue_label(atom.residue_id))?.unwrap_or("");
        writer
            .serialize(AtomRecord {
                index: atom.index,
                name: &atom.name,
                type_name: &atom.type_name,
                residue_id: atom.residue_id,
                residue_label,
                mass: atom.mass,
                charge: atom.charge,
                r_min: lj.r_min,
                epsilon: lj.epsilon,
            })
            .map_err(parsing_error)?;
    }
    writer.flush()?;
    Ok(atoms.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambertop::core::forcefield::options::DecodeOptions;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../ambertop-core/tests/data")
            .join(name)
    }

    #[test]
    fn summary_lists_counts_and_box() {
        let model = load_model(&fixture("water_box.prmtop"), DecodeOptions::default()).unwrap();
        let summary = summarize(&model).unwrap();
        assert!(summary.contains("Title:       single TIP3P water in a box"));
        assert!(summary.contains("Atoms:       3"));
        assert!(summary.contains("Bonds:       2 (2 with hydrogen)"));
        assert!(summary.contains("Box:         20.0000 x 21.0000 x 22.0000"));
        assert!(summary.contains("GB radii:    absent"));
    }

    #[test]
    fn atoms_csv_has_one_row_per_atom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("atoms.csv");
        let model = load_model(&fixture("chain.prmtop"), DecodeOptions::default()).unwrap();

        let rows = write_atoms_csv(&model, &path).unwrap();
        assert_eq!(rows, 4);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("index,name,type_name,residue_id,residue_label"));
        assert!(lines[3].starts_with("2,C2,CT,1,ETB,"));
    }
}
