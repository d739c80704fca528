use phf::{Set, phf_set};
use std::fmt;

pub const BACKBONE_NITROGEN: &str = "N";
pub const ALPHA_CARBON: &str = "CA";
pub const BACKBONE_CARBON: &str = "C";

/// The three atoms that define phi and psi, in chain order.
pub const BACKBONE_TRACE_ATOMS: [&str; 3] = [BACKBONE_NITROGEN, ALPHA_CARBON, BACKBONE_CARBON];

static STANDARD_AMINO_ACIDS: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    // Protonation-state and force-field variants
    "HSE", "HSD", "HSP", "HID", "HIE", "HIP", "CYX", "ASH", "GLH", "LYN",
    // Common modified residues carried in ATOM/HETATM records
    "MSE", "SEC", "PYL",
};

pub fn is_standard_amino_acid(residue_name: &str) -> bool {
    STANDARD_AMINO_ACIDS.contains(residue_name.trim())
}

/// Stable per-residue identifier of the form `chainId:resName+seqNum` (e.g. `A:GLY12`).
///
/// Insertion codes are not part of the key, so residues `52` and `52A` of the same
/// name share one key. The rendered form is not parsed back: names ending in a digit
/// (e.g. `NH2`) make the name/number boundary ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub chain_id: char,
    pub residue_name: String,
    pub residue_number: isize,
}

impl ResidueKey {
    pub fn new(chain_id: char, residue_name: &str, residue_number: isize) -> Self {
        Self {
            chain_id,
            residue_name: residue_name.to_string(),
            residue_number,
        }
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}{}",
            self.chain_id, self.residue_name, self.residue_number
        )
    }
}
