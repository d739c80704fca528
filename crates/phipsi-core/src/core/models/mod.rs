//! # Core Models Module
//!
//! The in-memory representation of a parsed macromolecular structure.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom records with coordinates and alternate-location data
//! - [`residue`] - Residues with their sequence number, insertion code and named atoms
//! - [`chain`] - Chains holding residues in file order
//! - [`system`] - The complete structure (first model only) and backbone lookups
//! - [`ids`] - Stable identifier types for atoms, residues, and chains
//!
//! ## Usage
//!
//! ```ignore
//! use phipsi::core::models::{system::MolecularSystem, atom::Atom};
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain('A');
//! let residue_id = system.add_residue(chain_id, 1, None, "ALA").unwrap();
//!
//! let atom = Atom::new("CA", residue_id, Point3::new(0.0, 0.0, 0.0));
//! system.add_atom_to_residue(residue_id, atom);
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
