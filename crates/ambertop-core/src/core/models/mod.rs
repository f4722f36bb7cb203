//! Plain data types produced by the decoder.
//!
//! These types carry no behavior beyond small derived quantities; the
//! derivations themselves live in [`crate::core::topology`] and
//! [`crate::core::forcefield`].

pub mod atom;
pub mod nonbonded;
pub mod residue;
pub mod terms;
