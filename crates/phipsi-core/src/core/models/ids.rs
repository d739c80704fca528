use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to an [`Atom`](super::atom::Atom) stored in a [`MolecularSystem`](super::system::MolecularSystem).
    pub struct AtomId;
    /// Stable handle to a [`Residue`](super::residue::Residue).
    pub struct ResidueId;
    /// Stable handle to a [`Chain`](super::chain::Chain).
    pub struct ChainId;
}
