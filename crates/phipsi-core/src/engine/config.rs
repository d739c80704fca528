use crate::core::io::pdb::ReadMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Peptide-bond C-N cutoff in Angstroms used by the geometric continuity rule.
pub const DEFAULT_MAX_PEPTIDE_BOND: f64 = 1.8;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// Decides whether two consecutive residues of a chain belong to the same segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum ContinuityRule {
    /// C(i-1)-N(i) distance must not exceed `max_peptide_bond` Angstroms.
    /// Residue numbering is ignored, so renumbered insertions stay connected
    /// and physical breaks are detected even when numbering is contiguous.
    Geometric {
        #[serde(rename = "max-peptide-bond")]
        max_peptide_bond: f64,
    },
    /// Residue sequence number must increase by exactly one.
    Sequential,
}

impl Default for ContinuityRule {
    fn default() -> Self {
        ContinuityRule::Geometric {
            max_peptide_bond: DEFAULT_MAX_PEPTIDE_BOND,
        }
    }
}

/// Which residues take part in backbone segments at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResidueFilter {
    /// Standard amino acids and their common variants.
    #[default]
    StandardAminoAcids,
    /// Any residue that carries at least one of N, CA or C.
    AnyBackbone,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisConfig {
    pub continuity: ContinuityRule,
    pub residue_filter: ResidueFilter,
    pub read_mode: ReadMode,
    /// Keep the ignored-residue list in the returned result.
    pub include_ignored: bool,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    continuity: Option<ContinuityRule>,
    residue_filter: Option<ResidueFilter>,
    read_mode: Option<ReadMode>,
    include_ignored: Option<bool>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn continuity(mut self, rule: ContinuityRule) -> Self {
        self.continuity = Some(rule);
        self
    }
    pub fn residue_filter(mut self, filter: ResidueFilter) -> Self {
        self.residue_filter = Some(filter);
        self
    }
    pub fn read_mode(mut self, mode: ReadMode) -> Self {
        self.read_mode = Some(mode);
        self
    }
    pub fn include_ignored(mut self, include: bool) -> Self {
        self.include_ignored = Some(include);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let continuity = self.continuity.unwrap_or_default();
        if let ContinuityRule::Geometric { max_peptide_bond } = continuity {
            if !max_peptide_bond.is_finite() || max_peptide_bond <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    parameter: "max_peptide_bond",
                    reason: format!("expected a positive distance, got {}", max_peptide_bond),
                });
            }
        }

        Ok(AnalysisConfig {
            continuity,
            residue_filter: self.residue_filter.unwrap_or_default(),
            read_mode: self.read_mode.unwrap_or_default(),
            include_ignored: self.include_ignored.unwrap_or(false),
        })
    }
}
