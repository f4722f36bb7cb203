//! # Core Module
//!
//! This module provides the decoding half of the library: everything needed to
//! go from the text of a prmtop file to a fully derived force-field model.
//!
//! ## Architecture
//!
//! - **File I/O** ([`io`]) - Format descriptors, the section reader and the file entry point
//! - **Structural Data** ([`topology`]) - Pointer table, atoms and residue membership
//! - **Force Field** ([`forcefield`]) - Bonded and nonbonded terms on a memoized model
//! - **Data Models** ([`models`]) - Plain records returned by the decoder
//! - **Units** ([`units`]) - Native units and conversion into MD units
//! - **Errors** ([`error`]) - The cloneable decode error shared by every layer
//!
//! ## Key Capabilities
//!
//! - **Self-describing column layouts** sliced exactly as each `%FORMAT` declares
//! - **Lazy derivation** of every collection, computed once and shared across threads
//! - **Atomic failure** on inconsistent sections, reported with the section name

pub mod error;
pub mod forcefield;
pub mod io;
pub mod models;
pub mod topology;
pub mod units;
