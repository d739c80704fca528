//! # Workflows Module
//!
//! High-level entry points that take structure files from disk to finished results.
//!
//! - **Angle Workflow** ([`angles`]) - phi/psi computation for one file or an ordered batch,
//!   with per-file failure isolation.

pub mod angles;
