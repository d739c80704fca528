//! # Engine Module
//!
//! The analysis pipeline that turns a parsed [`MolecularSystem`](crate::core::models::system::MolecularSystem)
//! into per-residue backbone torsions.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Continuity rule, residue filter and read mode
//! - **Segmentation** ([`segments`]) - Splitting chains into backbone-contiguous runs
//! - **Torsions** ([`angles`]) - phi/psi extraction per segment
//! - **Aggregation** ([`aggregate`]) - Keyed, last-write-wins residue records and degree arrays
//! - **Reporting** ([`report`]) - Pluggable consumers of ignored residues
//! - **Progress Monitoring** ([`progress`]) - Progress callbacks for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod aggregate;
pub mod angles;
pub mod config;
pub mod error;
pub mod progress;
pub mod report;
pub mod segments;
