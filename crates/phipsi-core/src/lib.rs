//! # phipsi
//!
//! Protein backbone phi/psi dihedral angles from macromolecular structure files.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout.
//!
//! - **[`core`]: The Foundation.** In-memory structure model (`MolecularSystem`), the PDB
//!   reader, and pure geometry utilities such as the atan2-based dihedral.
//!
//! - **[`engine`]: The Logic Core.** Splits chains into backbone-contiguous segments,
//!   extracts phi/psi per segment, and aggregates the results per residue key
//!   (`chain:NAMEnumber`) with last-write-wins semantics.
//!
//! - **[`workflows`]: The Public API.** [`workflows::angles::compute_angles`] accepts a
//!   single path or an ordered batch and returns one result (or failure) per file.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;
