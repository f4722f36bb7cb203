//! # Force Field Module
//!
//! This module turns the raw sections of a prmtop file into the engine-neutral
//! force-field description: bonded terms, per-atom Lennard-Jones parameters,
//! scaled 1-4 interactions, exclusions and optional implicit-solvent data.
//!
//! ## Overview
//!
//! All derivations hang off [`model::ForceFieldModel`], which owns the decoded
//! sections and memoizes each collection the first time it is requested:
//!
//! - **Bonded terms** rebuilt from `3 x index` atom pointers and 1-based type tables
//! - **Lennard-Jones parameters** recovered from the A/B coefficient tables
//! - **1-4 exceptions** combined from per-atom parameters and scaled by [`options::DecodeOptions`]
//! - **Exclusions** decoded from the run-length exclusion list and merged with the exceptions
//!
//! ## Key Components
//!
//! - [`model`] - The memoized read surface handed to engine adapters
//! - [`options`] - 1-4 scale divisors
//! - [`bonded`] - Bonds, angles and dihedrals
//! - [`nonbonded`] - Lennard-Jones, exceptions, exclusions and the merged pair table
//! - [`solvent`] - Generalized-Born parameters and the periodic box
//!
//! ## Usage
//!
//! ```ignore
//! use ambertop::core::forcefield::model::ForceFieldModel;
//! use ambertop::core::forcefield::options::DecodeOptions;
//!
//! let model = ForceFieldModel::decode(sections, DecodeOptions::default())?;
//! for pair in model.nonbonded_pairs()? {
//!     // hand the pair to an engine
//! }
//! ```

pub mod bonded;
pub mod model;
pub mod nonbonded;
pub mod options;
pub mod solvent;
