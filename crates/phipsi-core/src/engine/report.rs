use crate::engine::aggregate::IgnoredResidue;
use std::path::Path;
use tracing::info;

/// Receives the ignored residues of each successfully analyzed file.
///
/// Implementations decide how (and whether) to present them; the analysis itself
/// never writes to the console.
pub trait IgnoredResidueReporter: Sync {
    fn report_ignored(&self, source: &Path, ignored: &[IgnoredResidue]);
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl IgnoredResidueReporter for NullReporter {
    fn report_ignored(&self, _source: &Path, _ignored: &[IgnoredResidue]) {}
}

/// Emits one `info!` event per ignored residue.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl IgnoredResidueReporter for TracingReporter {
    fn report_ignored(&self, source: &Path, ignored: &[IgnoredResidue]) {
        info!(
            file = %source.display(),
            count = ignored.len(),
            "Ignored residues."
        );
        for residue in ignored {
            info!(
                residue = %residue.key,
                phi = ?residue.phi_degrees(),
                psi = ?residue.psi_degrees(),
                reason = %residue.reason,
                "Ignored residue."
            );
        }
    }
}

impl<F> IgnoredResidueReporter for F
where
    F: Fn(&Path, &[IgnoredResidue]) + Sync,
{
    fn report_ignored(&self, source: &Path, ignored: &[IgnoredResidue]) {
        self(source, ignored)
    }
}
