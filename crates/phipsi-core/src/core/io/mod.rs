//! Provides input functionality for macromolecular structure files.
//!
//! The [`traits::StructureFile`] trait is the seam between file formats and the
//! analysis engine; [`pdb`] implements it for fixed-column PDB coordinate files.

pub mod pdb;
pub mod traits;
