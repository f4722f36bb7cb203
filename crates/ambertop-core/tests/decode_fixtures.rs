use ambertop::core::error::PrmtopError;
use ambertop::core::forcefield::model::ForceFieldModel;
use ambertop::core::forcefield::options::DecodeOptions;
use ambertop::core::io::prmtop::{LoadError, PrmtopFile};
use ambertop::core::io::section::SectionFlag;
use ambertop::core::io::traits::TopologyFile;
use ambertop::core::models::nonbonded::NonbondedPair;
use ambertop::core::topology::pointers::Pointer;
use ambertop::core::units::AMBER_CHARGE_SCALE;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn decode_file(name: &str) -> ForceFieldModel {
    let sections = PrmtopFile::read_from_path(fixture_path(name)).unwrap();
    ForceFieldModel::decode(sections, DecodeOptions::default()).unwrap()
}

fn decode_text(text: &str) -> Result<ForceFieldModel, PrmtopError> {
    let sections = match PrmtopFile::read_from(&mut Cursor::new(text)) {
        Ok(sections) => sections,
        Err(LoadError::Prmtop(e)) => return Err(e),
        Err(LoadError::Io(e)) => panic!("unexpected I/O error: {e}"),
    };
    ForceFieldModel::decode(sections, DecodeOptions::default())
}

fn approx_eq(a: f64, b: f64, relative: f64) -> bool {
    (a - b).abs() <= relative * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn pointer_table_sizes_every_collection() {
    let model = decode_file("chain.prmtop");
    let pointers = model.pointers();
    assert_eq!(pointers.iter().count(), Pointer::COUNT);
    assert_eq!(model.atom_count(), pointers.count(Pointer::Natom).unwrap());
    assert_eq!(model.residues().unwrap().len(), pointers.count(Pointer::Nres).unwrap());
    assert_eq!(
        model.bonds_with_h().unwrap().len(),
        pointers.count(Pointer::Nbonh).unwrap()
    );
    assert_eq!(
        model.bonds_without_h().unwrap().len(),
        pointers.count(Pointer::Mbona).unwrap()
    );
    assert_eq!(
        model.dihedrals().unwrap().len(),
        pointers.count(Pointer::Nphih).unwrap() + pointers.count(Pointer::Mphia).unwrap()
    );
}

#[test]
fn charges_round_trip_through_amber_scale() {
    let model = decode_file("chain.prmtop");
    let raw = model.sections().reals(&SectionFlag::Charge).unwrap();
    for (atom, stored) in model.atoms().unwrap().iter().zip(raw) {
        assert!(approx_eq(atom.charge * AMBER_CHARGE_SCALE, stored, 1e-12));
    }
}

#[test]
fn residue_assignment_is_monotonic_and_exhaustive() {
    for name in ["chain.prmtop", "water_box.prmtop"] {
        let model = decode_file(name);
        let ids = model.residue_ids().unwrap();
        assert_eq!(ids.len(), model.atom_count());
        assert_eq!(ids.first(), Some(&0));
        assert!(ids.windows(2).all(|w| w[0] <= w[1] && w[1] - w[0] <= 1));
        assert_eq!(ids.last().copied(), Some(model.residues().unwrap().len() - 1));
        for (atom, &id) in model.atoms().unwrap().iter().zip(ids) {
            assert_eq!(atom.residue_id, id);
        }
    }
}

#[test]
fn lennard_jones_parameters_reproduce_like_pair_coefficients() {
    for name in ["chain.prmtop", "water_box.prmtop"] {
        let model = decode_file(name);
        let ntypes = model.pointers().count(Pointer::Ntypes).unwrap();
        let index = model
            .sections()
            .integers(&SectionFlag::NonbondedParmIndex)
            .unwrap();
        let acoef = model.sections().reals(&SectionFlag::LennardJonesAcoef).unwrap();
        let bcoef = model.sections().reals(&SectionFlag::LennardJonesBcoef).unwrap();

        let atoms = model.atoms().unwrap();
        for (atom, lj) in atoms.iter().zip(model.lennard_jones().unwrap()) {
            let row = index[(ntypes + 1) * (atom.type_index - 1)] as usize - 1;
            if bcoef[row] == 0.0 {
                assert_eq!(lj.epsilon, 0.0);
                continue;
            }
            let (a, b) = lj.coefficients();
            assert!(approx_eq(a, acoef[row], 1e-9));
            assert!(approx_eq(b, bcoef[row], 1e-9));
        }
    }
}

#[test]
fn exceptions_and_exclusions_never_share_a_pair() {
    let model = decode_file("chain.prmtop");
    let pairs = model.nonbonded_pairs().unwrap();
    let keys: HashSet<_> = pairs.iter().map(NonbondedPair::key).collect();
    assert_eq!(keys.len(), pairs.len());

    let scaled: Vec<_> = pairs
        .iter()
        .filter(|pair| matches!(pair, NonbondedPair::Scaled(_)))
        .collect();
    assert_eq!(scaled.len(), model.exceptions_14().unwrap().len());
    assert!(matches!(pairs[0], NonbondedPair::Scaled(_)));
}

#[test]
fn only_proper_positive_dihedrals_receive_1_4_interactions() {
    let model = decode_file("chain.prmtop");
    let dihedrals = model.dihedrals().unwrap();
    assert_eq!(dihedrals.len(), 2);
    assert!(dihedrals[0].has_14);
    assert!(!dihedrals[1].has_14);
    assert!(!dihedrals[1].improper);
    assert_eq!((dihedrals[1].atom_k, dihedrals[1].atom_l), (2, 3));
    assert!(approx_eq(dihedrals[1].phase, 180.0, 1e-8));
}

#[test]
fn water_box_exposes_periodic_cell_without_solvent() {
    let model = decode_file("water_box.prmtop");
    assert!(model.is_periodic());
    let pbc = model.periodic_box().unwrap().unwrap();
    assert_eq!((pbc.x, pbc.y, pbc.z), (20.0, 21.0, 22.0));
    assert!(model.solvent().unwrap().is_none());
    assert_eq!(model.residue_label_for_atom(2).unwrap(), Some("WAT"));
    assert_eq!(model.residue_label_for_atom(3).unwrap(), None);
}

#[test]
fn truncated_octahedron_is_rejected() {
    let text = include_str!("data/water_box.prmtop");
    let pointers = "       0       0       0       0       0       0       0       1       3       0";
    assert!(text.contains(pointers));
    let octahedron = text.replace(
        pointers,
        "       0       0       0       0       0       0       0       2       3       0",
    );
    let result = decode_text(&octahedron);
    assert!(matches!(result, Err(PrmtopError::UnsupportedFeature(_))));
}

#[test]
fn truncated_section_fails_whole_decode() {
    let text = include_str!("data/chain.prmtop");
    let truncated = text.replace(
        "       0       3       6       1       3       6       9       1",
        "       0       3       6       1",
    );
    let result = decode_text(&truncated);
    assert!(matches!(
        result,
        Err(PrmtopError::DataConsistency { ref section, .. }) if section == "ANGLES_INC_HYDROGEN"
    ));
}
