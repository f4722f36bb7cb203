use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Residue {
    pub label: String,          // Residue label from RESIDUE_LABEL (e.g., "ALA", "WAT")
    pub first_atom_index: usize, // Zero-based index of the first atom of the residue
}
