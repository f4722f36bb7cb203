use thiserror::Error;

use super::config::{ConfigError, NonbondedMethod};
use crate::core::error::PrmtopError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Prmtop(#[from] PrmtopError),

    #[error("Invalid system configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Nonbonded method '{method}' requires a cutoff distance")]
    MissingCutoff { method: NonbondedMethod },

    #[error("Nonbonded method '{method}' cannot be used {context}")]
    IllegalNonbondedMethod {
        method: NonbondedMethod,
        context: &'static str,
    },

    #[error(
        "Angle {atom_i}-{atom_j}-{atom_k} is constrained but bond {bond_i}-{bond_j} has no constraint"
    )]
    MissingBondConstraint {
        atom_i: usize,
        atom_j: usize,
        atom_k: usize,
        bond_i: usize,
        bond_j: usize,
    },
}
