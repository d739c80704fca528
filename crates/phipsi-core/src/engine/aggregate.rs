use crate::core::models::ids::{ChainId, ResidueId};
use crate::core::models::system::MolecularSystem;
use crate::core::utils::identifiers::ResidueKey;
use crate::engine::angles::ResidueAngles;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

/// Why a residue has no complete phi/psi pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IgnoreReason {
    /// One of N, CA or C is missing; the residue belongs to no segment.
    IncompleteBackbone,
    /// First or last residue of a segment.
    SegmentTerminus,
    /// A torsion was undefined because of collinear or coincident atoms.
    DegenerateGeometry,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IgnoreReason::IncompleteBackbone => "incomplete backbone",
            IgnoreReason::SegmentTerminus => "segment terminus",
            IgnoreReason::DegenerateGeometry => "degenerate geometry",
        };
        f.write_str(text)
    }
}

/// Per-residue torsion pair in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRecord {
    pub phi: Option<f64>,
    pub psi: Option<f64>,
    /// `None` exactly when both angles are present.
    pub ignore_reason: Option<IgnoreReason>,
}

impl AngleRecord {
    pub fn incomplete() -> Self {
        Self {
            phi: None,
            psi: None,
            ignore_reason: Some(IgnoreReason::IncompleteBackbone),
        }
    }

    pub fn from_angles(angles: &ResidueAngles) -> Self {
        let ignore_reason = match (angles.phi, angles.psi) {
            (Some(_), Some(_)) => None,
            _ if angles.degenerate => Some(IgnoreReason::DegenerateGeometry),
            _ => Some(IgnoreReason::SegmentTerminus),
        };
        Self {
            phi: angles.phi,
            psi: angles.psi,
            ignore_reason,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.ignore_reason.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IgnoredResidue {
    pub key: ResidueKey,
    /// Radians.
    pub phi: Option<f64>,
    /// Radians.
    pub psi: Option<f64>,
    pub reason: IgnoreReason,
}

impl IgnoredResidue {
    pub fn phi_degrees(&self) -> Option<f64> {
        self.phi.map(f64::to_degrees)
    }

    pub fn psi_degrees(&self) -> Option<f64> {
        self.psi.map(f64::to_degrees)
    }
}

/// The analysis of one structure file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerFileResult {
    records: Vec<(ResidueKey, AngleRecord)>,
    index: HashMap<ResidueKey, usize>,
    /// phi of every complete residue in degrees, aligned with `psi_degrees`.
    pub phi_degrees: Vec<f64>,
    /// psi of every complete residue in degrees, aligned with `phi_degrees`.
    pub psi_degrees: Vec<f64>,
    /// Present only when ignored residues were requested.
    pub ignored: Option<Vec<IgnoredResidue>>,
}

impl PerFileResult {
    /// All residue records in first-encounter order of their keys.
    pub fn records(&self) -> &[(ResidueKey, AngleRecord)] {
        &self.records
    }

    pub fn get(&self, key: &ResidueKey) -> Option<&AngleRecord> {
        self.index.get(key).map(|&i| &self.records[i].1)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn complete_count(&self) -> usize {
        self.phi_degrees.len()
    }

    /// Residues lacking phi or psi, in encounter order.
    ///
    /// Available whether or not `ignored` was populated.
    pub fn ignored_residues(&self) -> Vec<IgnoredResidue> {
        self.records
            .iter()
            .filter_map(|(key, record)| {
                record.ignore_reason.map(|reason| IgnoredResidue {
                    key: key.clone(),
                    phi: record.phi,
                    psi: record.psi,
                    reason,
                })
            })
            .collect()
    }
}

/// Insertion-ordered, last-write-wins collection of residue records.
///
/// A key keeps the position of its first insertion while its value is replaced by
/// every later insertion.
#[derive(Debug, Default)]
pub struct Aggregator {
    records: Vec<(ResidueKey, AngleRecord)>,
    index: HashMap<ResidueKey, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record and returns the one it replaced, if any.
    pub fn insert(&mut self, key: ResidueKey, record: AngleRecord) -> Option<AngleRecord> {
        match self.index.get(&key) {
            Some(&i) => {
                debug!(residue = %key, "Duplicate residue key; later record wins.");
                Some(std::mem::replace(&mut self.records[i].1, record))
            }
            None => {
                self.index.insert(key.clone(), self.records.len());
                self.records.push((key, record));
                None
            }
        }
    }

    /// Records one chain's results in the chain's residue order.
    ///
    /// `angles` covers segmented residues and `incomplete` those excluded from every
    /// segment; residues in neither (filtered out) are not recorded.
    pub fn record_chain(
        &mut self,
        system: &MolecularSystem,
        chain_id: ChainId,
        angles: &[ResidueAngles],
        incomplete: &[ResidueId],
    ) {
        let Some(chain) = system.chain(chain_id) else {
            return;
        };

        let mut by_residue: HashMap<ResidueId, AngleRecord> = angles
            .iter()
            .map(|a| (a.residue_id, AngleRecord::from_angles(a)))
            .collect();
        for &residue_id in incomplete {
            by_residue.insert(residue_id, AngleRecord::incomplete());
        }

        for &residue_id in chain.residues() {
            let (Some(record), Some(residue)) =
                (by_residue.remove(&residue_id), system.residue(residue_id))
            else {
                continue;
            };
            let key = ResidueKey::new(chain.id, residue.name.trim(), residue.residue_number);
            trace!(residue = %key, complete = record.is_complete(), "Recording residue.");
            self.insert(key, record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Partitions the records and converts complete pairs to degrees.
    pub fn finish(self, include_ignored: bool) -> PerFileResult {
        let mut phi_degrees = Vec::new();
        let mut psi_degrees = Vec::new();
        for (_, record) in &self.records {
            if let (Some(phi), Some(psi)) = (record.phi, record.psi) {
                phi_degrees.push(phi.to_degrees());
                psi_degrees.push(psi.to_degrees());
            }
        }

        let mut result = PerFileResult {
            records: self.records,
            index: self.index,
            phi_degrees,
            psi_degrees,
            ignored: None,
        };
        if include_ignored {
            result.ignored = Some(result.ignored_residues());
        }
        result
    }
}
