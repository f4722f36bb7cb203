//! # ambertop
//!
//! A decoder for AMBER parameter/topology ("prmtop") files that derives an
//! engine-neutral force-field description from them.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that each layer can be
//! used and tested on its own.
//!
//! - **[`core`]: The Foundation.** The `%FLAG`/`%FORMAT` text decoder, the
//!   pointer table, plain data models for atoms, residues and terms, and the
//!   memoized [`ForceFieldModel`](core::forcefield::model::ForceFieldModel)
//!   that derives bonded terms, Lennard-Jones parameters, 1-4 exceptions and
//!   exclusions on first access.
//!
//! - **[`engine`]: The Assembly Layer.** Turns a model into a serializable
//!   system description under a [`SystemConfig`](engine::config::SystemConfig):
//!   constraints, harmonic terms, torsions, nonbonded and GBSA-OBC forces.
//!
//! - **[`workflows`]: The Public API.** File-to-system entry points with TOML
//!   settings and progress reporting.

pub mod core;
pub mod engine;
pub mod workflows;
