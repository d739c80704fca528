//! Shared fixtures for unit tests.

use crate::core::models::atom::Atom;
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;

/// Ideal tri-peptide built with trans peptide bonds and the torsions
/// psi(1)=150, phi(2)=-60, psi(2)=-45, phi(3)=-120, rounded to PDB precision.
pub const TRI_PEPTIDE: [(&str, isize, [[f64; 3]; 3]); 3] = [
    (
        "ALA",
        1,
        [[0.000, 0.000, 0.000], [1.458, 0.000, 0.000], [2.009, 1.422, 0.000]],
    ),
    (
        "GLY",
        2,
        [[3.184, 1.595, 0.596], [3.822, 2.905, 0.666], [4.091, 3.462, -0.728]],
    ),
    (
        "SER",
        3,
        [[4.614, 2.615, -1.608], [4.919, 3.022, -2.974], [4.140, 2.187, -3.985]],
    ),
];

/// Torsions of [`TRI_PEPTIDE`] recomputed from the rounded coordinates, in degrees.
pub const TRI_PEPTIDE_PSI_1: f64 = 150.0196;
pub const TRI_PEPTIDE_PHI_2: f64 = -60.0495;
pub const TRI_PEPTIDE_PSI_2: f64 = -44.9687;
pub const TRI_PEPTIDE_PHI_3: f64 = -120.0366;

pub const BACKBONE_NAMES: [&str; 3] = ["N", "CA", "C"];

#[allow(clippy::too_many_arguments)]
pub fn pdb_atom_line(
    serial: usize,
    name: &str,
    alt_loc: Option<char>,
    res_name: &str,
    chain: char,
    res_seq: isize,
    insertion_code: Option<char>,
    position: [f64; 3],
    occupancy: f64,
    hetero: bool,
) -> String {
    let record = if hetero { "HETATM" } else { "ATOM" };
    let padded_name = if name.len() < 4 {
        format!(" {:<3}", name)
    } else {
        name.to_string()
    };
    let element = name.chars().next().unwrap_or(' ');
    format!(
        "{:<6}{:>5} {}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}\n",
        record,
        serial,
        padded_name,
        alt_loc.unwrap_or(' '),
        res_name,
        chain,
        res_seq,
        insertion_code.unwrap_or(' '),
        position[0],
        position[1],
        position[2],
        occupancy,
        0.0,
        element
    )
}

/// PDB text for residues given as `(name, number, [N, CA, C])`, all in one chain.
pub fn backbone_pdb(chain: char, residues: &[(&str, isize, [[f64; 3]; 3])]) -> String {
    let mut serial = 0;
    let mut out = String::new();
    for (res_name, res_seq, coords) in residues {
        for (atom_name, position) in BACKBONE_NAMES.iter().zip(coords) {
            serial += 1;
            out.push_str(&pdb_atom_line(
                serial, atom_name, None, res_name, chain, *res_seq, None, *position, 1.0, false,
            ));
        }
    }
    out
}

pub fn tri_peptide_pdb(chain: char) -> String {
    backbone_pdb(chain, &TRI_PEPTIDE)
}

/// Shifts every coordinate of a residue list by `offset`.
pub fn translated(
    residues: &[(&'static str, isize, [[f64; 3]; 3])],
    offset: [f64; 3],
) -> Vec<(&'static str, isize, [[f64; 3]; 3])> {
    residues
        .iter()
        .map(|(name, number, coords)| {
            let shifted = coords.map(|p| [p[0] + offset[0], p[1] + offset[1], p[2] + offset[2]]);
            (*name, *number, shifted)
        })
        .collect()
}

/// Adds residues with the given atoms to a chain of `system`, returning their IDs in order.
pub fn add_residues(
    system: &mut MolecularSystem,
    chain: char,
    residues: &[(&str, isize, Vec<(&str, [f64; 3])>)],
) -> Vec<ResidueId> {
    let chain_id = system.add_chain(chain);
    residues
        .iter()
        .map(|(name, number, atoms)| {
            let residue_id = system.add_residue(chain_id, *number, None, name).unwrap();
            for (atom_name, [x, y, z]) in atoms {
                let atom = Atom::new(atom_name, residue_id, Point3::new(*x, *y, *z));
                system.add_atom_to_residue(residue_id, atom).unwrap();
            }
            residue_id
        })
        .collect()
}

/// Converts backbone-only fixture rows into the `add_residues` atom-list form.
pub fn with_backbone_atoms(
    residues: &[(&'static str, isize, [[f64; 3]; 3])],
) -> Vec<(&'static str, isize, Vec<(&'static str, [f64; 3])>)> {
    residues
        .iter()
        .map(|(name, number, coords)| {
            let atoms = BACKBONE_NAMES.iter().copied().zip(coords.iter().copied()).collect();
            (*name, *number, atoms)
        })
        .collect()
}

pub fn tri_peptide_system(chain: char) -> (MolecularSystem, Vec<ResidueId>) {
    let mut system = MolecularSystem::new();
    let ids = add_residues(&mut system, chain, &with_backbone_atoms(&TRI_PEPTIDE));
    (system, ids)
}
