use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents a single atom record of a parsed structure.
///
/// Only the fields needed for backbone geometry are kept: the atom name used to
/// look up N/CA/C, its coordinates, and the alternate-location bookkeeping the
/// reader needs to pick one conformer per atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N", "C").
    pub name: String,
    /// The element symbol, upper-cased (e.g., "C", "N"). Empty if the source omits it.
    pub element: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Crystallographic occupancy in `[0, 1]`.
    pub occupancy: f64,
    /// Alternate location indicator, if the record carried one.
    pub alt_loc: Option<char>,
}

impl Atom {
    /// Creates a new `Atom` with full occupancy and no alternate location.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: infer_element(name),
            residue_id,
            position,
            occupancy: 1.0,
            alt_loc: None,
        }
    }
}

// PDB atom names are left-justified for two-letter elements; for the common
// one-letter case the first alphabetic character is the element.
fn infer_element(name: &str) -> String {
    name.trim()
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}
