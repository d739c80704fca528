use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::system::MolecularSystem;
use crate::engine::aggregate::{Aggregator, PerFileResult};
use crate::engine::angles::{ResidueAngles, extract_angles};
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::report::IgnoredResidueReporter;
use crate::engine::segments::build_segments;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of analyzing one file: the analysis, or the reason the file was unreadable.
pub type FileOutcome = Result<PerFileResult, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AngleInput {
    Single(PathBuf),
    Batch(Vec<PathBuf>),
}

impl AngleInput {
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            AngleInput::Single(path) => std::slice::from_ref(path),
            AngleInput::Batch(paths) => paths,
        }
    }
}

impl From<PathBuf> for AngleInput {
    fn from(path: PathBuf) -> Self {
        AngleInput::Single(path)
    }
}

impl From<Vec<PathBuf>> for AngleInput {
    fn from(paths: Vec<PathBuf>) -> Self {
        AngleInput::Batch(paths)
    }
}

/// Mirrors the shape of the [`AngleInput`] it was produced from.
#[derive(Debug)]
pub enum AngleOutput {
    Single(FileOutcome),
    Batch(Vec<FileOutcome>),
}

impl AngleOutput {
    pub fn outcomes(&self) -> &[FileOutcome] {
        match self {
            AngleOutput::Single(outcome) => std::slice::from_ref(outcome),
            AngleOutput::Batch(outcomes) => outcomes,
        }
    }

    pub fn into_outcomes(self) -> Vec<FileOutcome> {
        match self {
            AngleOutput::Single(outcome) => vec![outcome],
            AngleOutput::Batch(outcomes) => outcomes,
        }
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes().iter().filter(|o| o.is_err()).count()
    }
}

/// Runs segmentation, torsion extraction and aggregation over a parsed structure.
///
/// Chains are visited in file order and every chain contributes to one shared
/// last-write-wins residue map.
pub fn analyze_system(system: &MolecularSystem, config: &AnalysisConfig) -> PerFileResult {
    let mut aggregator = Aggregator::new();

    for (chain_id, chain) in system.chains_iter() {
        let chain_segments = build_segments(system, chain_id, config);
        let angles: Vec<ResidueAngles> = chain_segments
            .segments
            .iter()
            .flat_map(extract_angles)
            .collect();
        debug!(
            chain = %chain.id,
            segments = chain_segments.segments.len(),
            incomplete = chain_segments.incomplete.len(),
            "Chain analyzed."
        );
        aggregator.record_chain(system, chain_id, &angles, &chain_segments.incomplete);
    }

    aggregator.finish(config.include_ignored)
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> FileOutcome {
    let (system, metadata) = PdbFile::new(config.read_mode)
        .read_from_path(path)
        .map_err(|source| EngineError::MalformedInput {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        id = ?metadata.id,
        chains = system.chain_count(),
        residues = system.residue_count(),
        atoms = system.atom_count(),
        "Structure loaded."
    );

    let result = analyze_system(&system, config);
    info!(
        residues = result.len(),
        complete = result.complete_count(),
        "Angles computed."
    );
    Ok(result)
}

/// Analyzes each path independently; outcomes are returned in input order.
pub fn analyze_files(
    paths: &[PathBuf],
    config: &AnalysisConfig,
    progress: &ProgressReporter,
) -> Vec<FileOutcome> {
    progress.report(Progress::TaskStart {
        total_steps: paths.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = paths.iter();

    #[cfg(feature = "parallel")]
    let iterator = paths.par_iter();

    let outcomes: Vec<FileOutcome> = iterator
        .map(|path| {
            let outcome = analyze_file(path, config);
            progress.report(Progress::TaskIncrement);
            outcome
        })
        .collect();

    progress.report(Progress::TaskFinish);
    outcomes
}

/// Computes backbone torsions for one structure file or an ordered batch of them.
///
/// A file that cannot be read yields an `Err` in its own slot while the rest of the
/// batch proceeds. The `reporter` receives the ignored residues of every file that
/// was analyzed, in input order, whether or not `config.include_ignored` is set.
#[instrument(skip_all, name = "angles_workflow", fields(files = input.paths().len()))]
pub fn compute_angles(
    input: &AngleInput,
    config: &AnalysisConfig,
    reporter: &dyn IgnoredResidueReporter,
    progress: &ProgressReporter,
) -> AngleOutput {
    progress.report(Progress::PhaseStart {
        name: "Angle Analysis",
    });

    let output = match input {
        AngleInput::Single(path) => {
            progress.report(Progress::TaskStart { total_steps: 1 });
            let outcome = analyze_file(path, config);
            progress.report(Progress::TaskIncrement);
            progress.report(Progress::TaskFinish);
            AngleOutput::Single(outcome)
        }
        AngleInput::Batch(paths) => AngleOutput::Batch(analyze_files(paths, config, progress)),
    };

    for (path, outcome) in input.paths().iter().zip(output.outcomes()) {
        match outcome {
            Ok(result) => reporter.report_ignored(path, &result.ignored_residues()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "File skipped.");
                progress.report(Progress::Message(format!(
                    "Skipped {}: {}",
                    path.display(),
                    e
                )));
            }
        }
    }

    progress.report(Progress::PhaseFinish);
    output
}
