use crate::core::models::ids::ResidueId;
use crate::core::utils::geometry::{GeometryError, dihedral};
use crate::engine::segments::{BackboneResidue, Segment};
use tracing::debug;

/// Backbone torsions of one residue, in radians within `(-pi, pi]`.
///
/// `phi` is absent for the first residue of a segment and `psi` for the last.
/// Either is also absent when its four atoms are geometrically degenerate, in
/// which case `degenerate` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidueAngles {
    pub residue_id: ResidueId,
    pub phi: Option<f64>,
    pub psi: Option<f64>,
    pub degenerate: bool,
}

impl ResidueAngles {
    pub fn is_complete(&self) -> bool {
        self.phi.is_some() && self.psi.is_some()
    }
}

fn phi_of(prev: &BackboneResidue, cur: &BackboneResidue) -> Result<f64, GeometryError> {
    dihedral(&prev.atoms.c, &cur.atoms.n, &cur.atoms.ca, &cur.atoms.c)
}

fn psi_of(cur: &BackboneResidue, next: &BackboneResidue) -> Result<f64, GeometryError> {
    dihedral(&cur.atoms.n, &cur.atoms.ca, &cur.atoms.c, &next.atoms.n)
}

/// Computes phi and psi for every residue of a segment, in segment order.
///
/// phi(i) = dihedral(C(i-1), N(i), CA(i), C(i)) and
/// psi(i) = dihedral(N(i), CA(i), C(i), N(i+1)).
pub fn extract_angles(segment: &Segment) -> Vec<ResidueAngles> {
    let residues = segment.residues();

    residues
        .iter()
        .enumerate()
        .map(|(i, cur)| {
            let mut degenerate = false;
            let mut resolve = |torsion: Option<Result<f64, GeometryError>>, label: &str| {
                match torsion? {
                    Ok(angle) => Some(angle),
                    Err(e) => {
                        debug!(index = i, torsion = label, error = %e, "Degenerate torsion.");
                        degenerate = true;
                        None
                    }
                }
            };

            let phi = resolve(
                i.checked_sub(1).map(|p| phi_of(&residues[p], cur)),
                "phi",
            );
            let psi = resolve(residues.get(i + 1).map(|next| psi_of(cur, next)), "psi");

            ResidueAngles {
                residue_id: cur.residue_id,
                phi,
                psi,
                degenerate,
            }
        })
        .collect()
}
