//! # Workflows Module
//!
//! High-level entry points that tie the [`core`](crate::core) decoder and the
//! [`engine`](crate::engine) assembler together for callers that start from a
//! file on disk.
//!
//! - **Build Workflow** ([`build`]) - Read a prmtop file, decode the full
//!   force-field model and assemble a system description from TOML settings.

pub mod build;
