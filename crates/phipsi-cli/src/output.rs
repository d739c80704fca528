use crate::error::{CliError, Result};
use phipsi::engine::aggregate::PerFileResult;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct AngleRow<'a> {
    residue: String,
    phi: Option<String>,
    psi: Option<String>,
    status: &'a str,
}

/// Writes every residue record as `residue,phi,psi,status` in degrees.
///
/// Angles carry three decimals; absent ones are written as empty cells.
pub fn write_angle_table<W: Write>(writer: W, result: &PerFileResult) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (key, record) in result.records() {
        let reason = record.ignore_reason.map(|r| r.to_string());
        csv_writer.serialize(AngleRow {
            residue: key.to_string(),
            phi: record.phi.map(format_degrees),
            psi: record.psi.map(format_degrees),
            status: reason.as_deref().unwrap_or("complete"),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn format_degrees(radians: f64) -> String {
    format!("{:.3}", radians.to_degrees())
}

pub fn write_angle_file(path: &Path, result: &PerFileResult) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_angle_table(file, result).map_err(|source| CliError::Output {
        path: path.to_path_buf(),
        source,
    })
}

/// Output path for the `index`-th (1-based) of `total` inputs.
///
/// A single input writes to `template` unchanged; otherwise `_N` is appended to the
/// file stem, keeping the extension.
pub fn generate_output_path(template: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return template.to_path_buf();
    }
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match template.extension() {
        Some(ext) => format!("{}_{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    template.with_file_name(file_name)
}
