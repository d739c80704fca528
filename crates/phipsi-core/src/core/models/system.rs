use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use crate::core::utils::identifiers::{ALPHA_CARBON, BACKBONE_CARBON, BACKBONE_NITROGEN};
use nalgebra::Point3;
use slotmap::SlotMap;
use std::collections::HashMap;

/// Coordinates of the three atoms that trace a residue's main chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackboneAtoms {
    pub n: Point3<f64>,
    pub ca: Point3<f64>,
    pub c: Point3<f64>,
}

/// Lookup key for a residue inside one chain: sequence number plus insertion code.
type ResidueLookupKey = (ChainId, isize, Option<char>);

/// Represents a complete parsed structure with atoms, residues and chains.
///
/// This struct is the in-memory model every analysis works on. Components are
/// stored in slot maps so that handles stay valid, and chains are kept in the
/// order they were first encountered in the source file.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in file order.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding residues by chain, residue number and insertion code.
    residue_id_map: HashMap<ResidueLookupKey, ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Returns an iterator over all atoms in the system.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Retrieves a mutable reference to a residue by its ID.
    pub fn residue_mut(&mut self, id: ResidueId) -> Option<&mut Residue> {
        self.residues.get_mut(id)
    }

    /// Returns an iterator over all residues in the system.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains, in the order they appear in the source file.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ChainId, &Chain)` pairs.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Finds a chain ID by its single-character identifier.
    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue ID by its chain, residue number and insertion code.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain containing the residue.
    /// * `residue_number` - The sequence number of the residue.
    /// * `insertion_code` - The insertion code, if any.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if the residue exists, otherwise `None`.
    pub fn find_residue_by_id(
        &self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, residue_number, insertion_code))
            .copied()
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given ID already exists,
    /// it returns the existing chain ID without creating a duplicate.
    pub fn add_chain(&mut self, id: char) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id));
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// This method is idempotent; if a residue with the same chain, residue number
    /// and insertion code already exists, its ID is returned and the chain is not
    /// extended.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` (if the chain doesn't exist).
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, residue_number, insertion_code);

        if let Some(&existing) = self.residue_id_map.get(&key) {
            return Some(existing);
        }

        let residue = Residue::new(residue_number, insertion_code, name, chain_id);
        let residue_id = self.residues.insert(residue);
        self.residue_id_map.insert(key, residue_id);
        chain.residues.push(residue_id);

        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (if the residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }

        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.residues[residue_id].add_atom(&name, atom_id);

        Some(atom_id)
    }

    /// Returns the N, CA and C coordinates of a residue.
    ///
    /// # Return
    ///
    /// Returns `None` if the residue doesn't exist or lacks any of the three atoms.
    pub fn backbone_of(&self, residue_id: ResidueId) -> Option<BackboneAtoms> {
        let residue = self.residues.get(residue_id)?;
        let position_of = |name: &str| {
            residue
                .get_atom_id_by_name(name)
                .and_then(|id| self.atoms.get(id))
                .map(|atom| atom.position)
        };

        Some(BackboneAtoms {
            n: position_of(BACKBONE_NITROGEN)?,
            ca: position_of(ALPHA_CARBON)?,
            c: position_of(BACKBONE_CARBON)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use slotmap::KeyData;

    struct TestRefs {
        chain_a_id: ChainId,
        gly_id: ResidueId,
        ala_id: ResidueId,
        ala_ca_id: AtomId,
    }

    fn create_standard_test_system() -> (MolecularSystem, TestRefs) {
        let mut system = MolecularSystem::new();
        let chain_a_id = system.add_chain('A');

        let gly_id = system.add_residue(chain_a_id, 1, None, "GLY").unwrap();
        for (name, x) in [("N", 0.0), ("CA", 1.0), ("C", 2.0)] {
            let atom = Atom::new(name, gly_id, Point3::new(x, 0.0, 0.0));
            system.add_atom_to_residue(gly_id, atom).unwrap();
        }

        let ala_id = system.add_residue(chain_a_id, 2, None, "ALA").unwrap();
        let ala_n = Atom::new("N", ala_id, Point3::new(3.0, 0.0, 0.0));
        system.add_atom_to_residue(ala_id, ala_n).unwrap();
        let ala_ca = Atom::new("CA", ala_id, Point3::new(4.0, 0.0, 0.0));
        let ala_ca_id = system.add_atom_to_residue(ala_id, ala_ca).unwrap();

        (
            system,
            TestRefs {
                chain_a_id,
                gly_id,
                ala_id,
                ala_ca_id,
            },
        )
    }

    #[test]
    fn add_chain_is_idempotent_and_preserves_order() {
        let mut system = MolecularSystem::new();
        let b = system.add_chain('B');
        let a = system.add_chain('A');
        assert_eq!(system.add_chain('B'), b);

        let order: Vec<char> = system.chains_iter().map(|(_, c)| c.id).collect();
        assert_eq!(order, vec!['B', 'A']);
        assert_eq!(system.find_chain_by_id('A'), Some(a));
        assert_eq!(system.chain_count(), 2);
    }

    #[test]
    fn add_residue_is_idempotent_per_insertion_code() {
        let (mut system, refs) = create_standard_test_system();
        let again = system.add_residue(refs.chain_a_id, 1, None, "GLY").unwrap();
        assert_eq!(again, refs.gly_id);

        let inserted = system
            .add_residue(refs.chain_a_id, 1, Some('A'), "SER")
            .unwrap();
        assert_ne!(inserted, refs.gly_id);

        let chain = system.chain(refs.chain_a_id).unwrap();
        assert_eq!(chain.residues(), &[refs.gly_id, refs.ala_id, inserted]);
        assert_eq!(
            system.find_residue_by_id(refs.chain_a_id, 1, Some('A')),
            Some(inserted)
        );
    }

    #[test]
    fn add_residue_fails_for_unknown_chain() {
        let (mut system, _) = create_standard_test_system();
        let bogus_chain = ChainId::from(KeyData::from_ffi(u64::MAX));
        assert!(system.add_residue(bogus_chain, 1, None, "GLY").is_none());
    }

    #[test]
    fn add_atom_links_atom_to_residue() {
        let (system, refs) = create_standard_test_system();
        let ala = system.residue(refs.ala_id).unwrap();
        assert_eq!(ala.get_atom_id_by_name("CA"), Some(refs.ala_ca_id));
        assert_eq!(system.atom(refs.ala_ca_id).unwrap().residue_id, refs.ala_id);
        assert_eq!(system.atom_count(), 5);
        assert_eq!(system.residue_count(), 2);
    }

    #[test]
    fn backbone_of_returns_coordinates_for_complete_residue() {
        let (system, refs) = create_standard_test_system();
        let backbone = system.backbone_of(refs.gly_id).unwrap();
        assert_eq!(backbone.n, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(backbone.ca, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(backbone.c, Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn backbone_of_returns_none_when_an_atom_is_missing() {
        let (system, refs) = create_standard_test_system();
        assert!(system.backbone_of(refs.ala_id).is_none());
    }
}
