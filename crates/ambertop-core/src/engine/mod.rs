//! # Engine Module
//!
//! This module turns a decoded [`ForceFieldModel`](crate::core::forcefield::model::ForceFieldModel)
//! into an engine-neutral [`SystemDescription`](system::SystemDescription): the
//! particles, constraints, harmonic terms, torsions and nonbonded forces a
//! molecular-dynamics engine needs to build its own system.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Constraint mode, nonbonded method, cutoff, implicit solvent and units
//! - **Assembly** ([`assembler`]) - The single `build_system` entry point
//! - **Output Types** ([`system`]) - Plain, serializable force and particle records
//! - **Progress Monitoring** ([`progress`]) - Phase reporting for callers that want feedback
//! - **Error Handling** ([`error`]) - Engine-specific error types wrapping decode failures
//!
//! ## Key Capabilities
//!
//! - **Rigid bonds and water angles** derived from the bonded terms of the model
//! - **Cutoff resolution** from the periodic box when none is given
//! - **Generalized-Born OBC** particles from the `RADII` and `SCREEN` sections
//! - **Unit conversion** into either native prmtop units or nm/kJ/mol/radians

pub mod assembler;
pub mod config;
pub mod error;
pub mod progress;
pub mod system;
