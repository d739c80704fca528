use super::ids::{AtomId, ChainId};
use crate::core::utils::identifiers;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub residue_number: isize,              // Residue sequence number from source file
    pub insertion_code: Option<char>,       // PDB insertion code (e.g., the 'A' in 52A)
    pub name: String,                       // Name of the residue (e.g., "ALA", "GLY")
    pub chain_id: ChainId,                  // ID of the parent chain
    pub is_hetero: bool,                    // True if read from HETATM records
    pub(crate) atoms: Vec<AtomId>,          // Atoms belonging to this residue, in file order
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its stable ID
}

impl Residue {
    pub(crate) fn new(
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
        chain_id: ChainId,
    ) -> Self {
        Self {
            residue_number,
            insertion_code,
            name: name.to_string(),
            chain_id,
            is_hetero: false,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map.insert(atom_name.to_string(), atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    /// True if the residue name is one of the recognized amino-acid codes.
    pub fn is_standard_amino_acid(&self) -> bool {
        identifiers::is_standard_amino_acid(&self.name)
    }

    /// True if at least one of the N, CA or C backbone atoms is present.
    pub fn has_any_backbone_atom(&self) -> bool {
        identifiers::BACKBONE_TRACE_ATOMS
            .iter()
            .any(|name| self.atom_name_map.contains_key(*name))
    }
}
