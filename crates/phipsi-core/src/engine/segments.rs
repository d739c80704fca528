use crate::core::models::ids::{ChainId, ResidueId};
use crate::core::models::residue::Residue;
use crate::core::models::system::{BackboneAtoms, MolecularSystem};
use crate::core::utils::geometry::distance;
use crate::engine::config::{AnalysisConfig, ContinuityRule, ResidueFilter};
use tracing::{debug, trace};

/// A residue whose N, CA and C atoms are all present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackboneResidue {
    pub residue_id: ResidueId,
    pub residue_number: isize,
    pub atoms: BackboneAtoms,
}

/// A maximal run of backbone-contiguous residues within one chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    residues: Vec<BackboneResidue>,
}

impl Segment {
    pub fn residues(&self) -> &[BackboneResidue] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainSegments {
    pub segments: Vec<Segment>,
    /// Accepted residues lacking N, CA or C, in chain order.
    pub incomplete: Vec<ResidueId>,
}

fn accepts(residue: &Residue, filter: ResidueFilter) -> bool {
    match filter {
        ResidueFilter::StandardAminoAcids => residue.is_standard_amino_acid(),
        ResidueFilter::AnyBackbone => residue.has_any_backbone_atom(),
    }
}

fn is_continuous(prev: &BackboneResidue, next: &BackboneResidue, rule: ContinuityRule) -> bool {
    match rule {
        ContinuityRule::Geometric { max_peptide_bond } => {
            distance(&prev.atoms.c, &next.atoms.n) <= max_peptide_bond
        }
        ContinuityRule::Sequential => next.residue_number == prev.residue_number + 1,
    }
}

fn flush(current: &mut Vec<BackboneResidue>, segments: &mut Vec<Segment>) {
    if !current.is_empty() {
        segments.push(Segment {
            residues: std::mem::take(current),
        });
    }
}

/// Splits a chain into backbone-contiguous segments.
///
/// Residues rejected by the configured [`ResidueFilter`] are skipped but still end the
/// running segment. Accepted residues missing any of N, CA or C are collected in
/// [`ChainSegments::incomplete`] and also end the running segment.
pub fn build_segments(
    system: &MolecularSystem,
    chain_id: ChainId,
    config: &AnalysisConfig,
) -> ChainSegments {
    let mut result = ChainSegments::default();
    let Some(chain) = system.chain(chain_id) else {
        return result;
    };

    let mut current: Vec<BackboneResidue> = Vec::new();

    for &residue_id in chain.residues() {
        let Some(residue) = system.residue(residue_id) else {
            continue;
        };

        if !accepts(residue, config.residue_filter) {
            trace!(chain = %chain.id, residue = %residue.name, "Residue outside filter; skipping.");
            flush(&mut current, &mut result.segments);
            continue;
        }

        let Some(atoms) = system.backbone_of(residue_id) else {
            debug!(
                chain = %chain.id,
                residue = %residue.name,
                number = residue.residue_number,
                "Residue lacks N/CA/C; excluded from segments."
            );
            result.incomplete.push(residue_id);
            flush(&mut current, &mut result.segments);
            continue;
        };

        let candidate = BackboneResidue {
            residue_id,
            residue_number: residue.residue_number,
            atoms,
        };

        if let Some(prev) = current.last() {
            if !is_continuous(prev, &candidate, config.continuity) {
                debug!(
                    chain = %chain.id,
                    after = prev.residue_number,
                    before = candidate.residue_number,
                    "Backbone break."
                );
                flush(&mut current, &mut result.segments);
            }
        }
        current.push(candidate);
    }
    flush(&mut current, &mut result.segments);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::AnalysisConfigBuilder;
    use crate::testing::{
        TRI_PEPTIDE, add_residues, translated, tri_peptide_system, with_backbone_atoms,
    };

    fn segment_ids(segments: &ChainSegments) -> Vec<Vec<ResidueId>> {
        segments
            .segments
            .iter()
            .map(|s| s.residues().iter().map(|r| r.residue_id).collect())
            .collect()
    }

    #[test]
    fn contiguous_chain_forms_one_segment() {
        let (system, ids) = tri_peptide_system('A');
        let chain_id = system.find_chain_by_id('A').unwrap();

        let result = build_segments(&system, chain_id, &AnalysisConfig::default());

        assert_eq!(segment_ids(&result), vec![ids]);
        assert!(result.incomplete.is_empty());
    }

    #[test]
    fn geometric_gap_splits_chain_despite_contiguous_numbering() {
        let mut system = MolecularSystem::new();
        let mut residues = with_backbone_atoms(&TRI_PEPTIDE[..2]);
        let mut far = with_backbone_atoms(&translated(&TRI_PEPTIDE[2..], [20.0, 0.0, 0.0]));
        residues.append(&mut far);
        let ids = add_residues(&mut system, 'A', &residues);
        let chain_id = system.find_chain_by_id('A').unwrap();

        let result = build_segments(&system, chain_id, &AnalysisConfig::default());

        assert_eq!(segment_ids(&result), vec![vec![ids[0], ids[1]], vec![ids[2]]]);
    }

    #[test]
    fn geometric_rule_ignores_numbering_gaps() {
        let mut system = MolecularSystem::new();
        let mut rows = TRI_PEPTIDE;
        rows[2].1 = 40;
        let ids = add_residues(&mut system, 'A', &with_backbone_atoms(&rows));
        let chain_id = system.find_chain_by_id('A').unwrap();

        let geometric = build_segments(&system, chain_id, &AnalysisConfig::default());
        assert_eq!(segment_ids(&geometric), vec![ids.clone()]);

        let sequential_config = AnalysisConfigBuilder::new()
            .continuity(ContinuityRule::Sequential)
            .build()
            .unwrap();
        let sequential = build_segments(&system, chain_id, &sequential_config);
        assert_eq!(
            segment_ids(&sequential),
            vec![vec![ids[0], ids[1]], vec![ids[2]]]
        );
    }

    #[test]
    fn residue_missing_ca_is_incomplete_and_breaks_segment() {
        let mut system = MolecularSystem::new();
        let mut rows = with_backbone_atoms(&TRI_PEPTIDE);
        rows[1].2.retain(|(name, _)| *name != "CA");
        let ids = add_residues(&mut system, 'A', &rows);
        let chain_id = system.find_chain_by_id('A').unwrap();

        let result = build_segments(&system, chain_id, &AnalysisConfig::default());

        assert_eq!(segment_ids(&result), vec![vec![ids[0]], vec![ids[2]]]);
        assert_eq!(result.incomplete, vec![ids[1]]);
    }

    #[test]
    fn non_amino_acid_residues_are_skipped_but_break_segments() {
        let mut system = MolecularSystem::new();
        let mut rows = with_backbone_atoms(&TRI_PEPTIDE[..1]);
        rows.push(("HOH", 2, vec![("O", [2.5, 1.5, 0.3])]));
        rows.extend(with_backbone_atoms(&TRI_PEPTIDE[1..]));
        let ids = add_residues(&mut system, 'A', &rows);
        let chain_id = system.find_chain_by_id('A').unwrap();

        let result = build_segments(&system, chain_id, &AnalysisConfig::default());

        assert_eq!(segment_ids(&result), vec![vec![ids[0]], vec![ids[2], ids[3]]]);
        assert!(result.incomplete.is_empty());
    }

    #[test]
    fn any_backbone_filter_accepts_non_standard_names() {
        let mut system = MolecularSystem::new();
        let mut rows = TRI_PEPTIDE;
        rows[1].0 = "XYZ";
        let ids = add_residues(&mut system, 'A', &with_backbone_atoms(&rows));
        let chain_id = system.find_chain_by_id('A').unwrap();

        let strict = build_segments(&system, chain_id, &AnalysisConfig::default());
        assert_eq!(segment_ids(&strict), vec![vec![ids[0]], vec![ids[2]]]);

        let config = AnalysisConfigBuilder::new()
            .residue_filter(ResidueFilter::AnyBackbone)
            .build()
            .unwrap();
        let relaxed = build_segments(&system, chain_id, &config);
        assert_eq!(segment_ids(&relaxed), vec![ids]);
    }

    #[test]
    fn unknown_chain_yields_nothing() {
        let (system, _) = tri_peptide_system('A');
        let mut other = MolecularSystem::new();
        other.add_chain('A');
        other.add_chain('B');
        let foreign = other.find_chain_by_id('B').unwrap();

        let result = build_segments(&system, foreign, &AnalysisConfig::default());
        assert!(result.segments.is_empty());
        assert!(result.incomplete.is_empty());
    }
}
