//! Provides input functionality for AMBER parameter/topology files.
//!
//! Decoding is split into the format-descriptor grammar ([`format`]), the
//! line-oriented section state machine ([`section`]) and the file-level
//! entry point ([`prmtop`]) that drives the state machine over a reader.

pub mod format;
pub mod prmtop;
pub mod section;
pub mod traits;
