use phipsi::engine::aggregate::IgnoredResidue;
use phipsi::engine::report::IgnoredResidueReporter;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use tracing::warn;

const RESIDUE_HEADER: &str = "Residue";
const ANGLES_HEADER: &str = "\u{03C6}-\u{03C8} angles";
const REASON_HEADER: &str = "Reason";

fn format_angle(degrees: Option<f64>) -> String {
    degrees.map_or_else(|| "None".to_string(), |d| format!("{:.2}", d))
}

/// Renders the "Ignored residues" table for one file.
pub fn render_ignored_table(source: &Path, ignored: &[IgnoredResidue]) -> String {
    let rows: Vec<(String, String, String)> = ignored
        .iter()
        .map(|r| {
            (
                r.key.to_string(),
                format!(
                    "({}, {})",
                    format_angle(r.phi_degrees()),
                    format_angle(r.psi_degrees())
                ),
                r.reason.to_string(),
            )
        })
        .collect();

    let key_width = rows
        .iter()
        .map(|(k, _, _)| k.chars().count())
        .chain([RESIDUE_HEADER.len()])
        .max()
        .unwrap_or(0);
    let angle_width = rows
        .iter()
        .map(|(_, a, _)| a.chars().count())
        .chain([ANGLES_HEADER.chars().count()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "Ignored residues ({})", source.display());
    let _ = writeln!(
        out,
        "  {:<kw$}  {:^aw$}  {}",
        RESIDUE_HEADER,
        ANGLES_HEADER,
        REASON_HEADER,
        kw = key_width,
        aw = angle_width
    );
    for (key, angles, reason) in &rows {
        let _ = writeln!(
            out,
            "  {:<kw$}  {:^aw$}  {}",
            key,
            angles,
            reason,
            kw = key_width,
            aw = angle_width
        );
    }
    if rows.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    out
}

/// Prints the ignored-residue table of each analyzed file to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoredTablePrinter;

impl IgnoredResidueReporter for IgnoredTablePrinter {
    fn report_ignored(&self, source: &Path, ignored: &[IgnoredResidue]) {
        let table = render_ignored_table(source, ignored);
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(table.as_bytes()) {
            warn!("Failed to print ignored residues: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phipsi::core::utils::identifiers::ResidueKey;
    use phipsi::engine::aggregate::IgnoreReason;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn table_lists_each_residue_with_its_angle_pair() {
        let ignored = vec![
            IgnoredResidue {
                key: ResidueKey::new('A', "ALA", 1),
                phi: None,
                psi: Some(FRAC_PI_2),
                reason: IgnoreReason::SegmentTerminus,
            },
            IgnoredResidue {
                key: ResidueKey::new('B', "GLY", 12),
                phi: None,
                psi: None,
                reason: IgnoreReason::IncompleteBackbone,
            },
        ];

        let table = render_ignored_table(Path::new("model.pdb"), &ignored);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Ignored residues (model.pdb)");
        assert!(lines[1].contains("Residue") && lines[1].contains("\u{03C6}-\u{03C8} angles"));
        assert!(lines[2].contains("A:ALA1") && lines[2].contains("(None, 90.00)"));
        assert!(lines[2].ends_with("segment terminus"));
        assert!(lines[3].contains("B:GLY12") && lines[3].contains("(None, None)"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn empty_table_says_none() {
        let table = render_ignored_table(Path::new("x.pdb"), &[]);
        assert!(table.ends_with("  (none)\n"));
    }
}
