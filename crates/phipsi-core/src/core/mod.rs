//! # Core Module
//!
//! Stateless building blocks of the library.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains and the system that owns them
//! - **File I/O** ([`io`]) - Reading PDB coordinate files into a [`models::system::MolecularSystem`]
//! - **Utilities** ([`utils`]) - Vector geometry, dihedrals and residue identifiers

pub mod io;
pub mod models;
pub mod utils;
