use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Minimum record length that still carries all three coordinates (columns 31-54).
const MIN_ATOM_RECORD_LEN: usize = 54;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadMode {
    /// Structural inconsistencies (e.g. duplicate atoms) abort the read.
    #[default]
    Strict,
    /// Structural inconsistencies are logged and the offending record skipped.
    Permissive,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    pub id: Option<String>,
    pub model_count: usize,
    pub skipped_alt_locs: usize,
    pub skipped_duplicates: usize,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: &'static str },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn parse_required_float(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    if value.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField { columns },
        });
    }
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns,
            value: value.into(),
        },
    })
}

struct AtomRecord<'a> {
    name: &'a str,
    alt_loc: Option<char>,
    res_name: &'a str,
    chain_id: char,
    res_seq: isize,
    insertion_code: Option<char>,
    position: Point3<f64>,
    occupancy: f64,
    element: &'a str,
}

fn parse_atom_record(line: &str, line_num: usize) -> Result<AtomRecord<'_>, PdbError> {
    if line.len() < MIN_ATOM_RECORD_LEN {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::LineTooShort,
        });
    }

    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField { columns: "13-16" },
        });
    }

    let res_seq_str = slice_and_trim(line, 22, 26);
    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: "23-26",
            value: res_seq_str.into(),
        },
    })?;

    let x = parse_required_float(line, line_num, 30, 38, "31-38")?;
    let y = parse_required_float(line, line_num, 38, 46, "39-46")?;
    let z = parse_required_float(line, line_num, 46, 54, "47-54")?;

    let occupancy_str = slice_and_trim(line, 54, 60);
    let occupancy = if occupancy_str.is_empty() {
        1.0
    } else {
        occupancy_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidFloat {
                columns: "55-60",
                value: occupancy_str.into(),
            },
        })?
    };

    Ok(AtomRecord {
        name,
        alt_loc: column_char(line, 16),
        res_name: slice_and_trim(line, 17, 20),
        chain_id: column_char(line, 21).unwrap_or(' '),
        res_seq,
        insertion_code: column_char(line, 26),
        position: Point3::new(x, y, z),
        occupancy,
        element: slice_and_trim(line, 76, 78),
    })
}

/// Reader for fixed-column PDB coordinate files.
///
/// Only the first model of a multi-model file is loaded. When an atom carries
/// alternate locations, the one with the highest occupancy is kept (the first one
/// on ties).
#[derive(Debug, Clone, Copy, Default)]
pub struct PdbFile {
    pub mode: ReadMode,
}

impl PdbFile {
    pub fn new(mode: ReadMode) -> Self {
        Self { mode }
    }

    fn add_record(
        &self,
        system: &mut MolecularSystem,
        metadata: &mut PdbMetadata,
        record: AtomRecord<'_>,
        is_hetero: bool,
        line_num: usize,
    ) -> Result<(), PdbError> {
        let chain_id = system.add_chain(record.chain_id);
        let residue_id = system
            .add_residue(
                chain_id,
                record.res_seq,
                record.insertion_code,
                record.res_name,
            )
            .ok_or_else(|| {
                PdbError::Inconsistency(format!(
                    "Chain '{}' vanished while reading line {}",
                    record.chain_id, line_num
                ))
            })?;

        if let Some(residue) = system.residue_mut(residue_id) {
            residue.is_hetero |= is_hetero;
            if residue.name != record.res_name {
                debug!(
                    line = line_num,
                    kept = %residue.name,
                    ignored = record.res_name,
                    "Residue name differs between records of the same residue; keeping the first."
                );
            }
        }

        if self.resolve_existing_atom(system, metadata, residue_id, &record, line_num)? {
            return Ok(());
        }

        let mut atom = Atom::new(record.name, residue_id, record.position);
        if !record.element.is_empty() {
            atom.element = record.element.to_ascii_uppercase();
        }
        atom.occupancy = record.occupancy;
        atom.alt_loc = record.alt_loc;
        system.add_atom_to_residue(residue_id, atom);
        Ok(())
    }

    /// Handles a record whose atom name already exists in the residue.
    ///
    /// Returns `true` if the record was consumed (merged or skipped).
    fn resolve_existing_atom(
        &self,
        system: &mut MolecularSystem,
        metadata: &mut PdbMetadata,
        residue_id: ResidueId,
        record: &AtomRecord<'_>,
        line_num: usize,
    ) -> Result<bool, PdbError> {
        let Some(existing_id) = system
            .residue(residue_id)
            .and_then(|r| r.get_atom_id_by_name(record.name))
        else {
            return Ok(false);
        };
        let Some(existing) = system.atom_mut(existing_id) else {
            return Ok(false);
        };

        if record.alt_loc.is_some() || existing.alt_loc.is_some() {
            metadata.skipped_alt_locs += 1;
            if record.occupancy > existing.occupancy {
                existing.position = record.position;
                existing.occupancy = record.occupancy;
                existing.alt_loc = record.alt_loc;
            }
            return Ok(true);
        }

        let message = format!(
            "Duplicate atom '{}' in residue {}{} of chain '{}' (line {})",
            record.name,
            record.res_name,
            record.res_seq,
            record.chain_id,
            line_num
        );
        match self.mode {
            ReadMode::Strict => Err(PdbError::Inconsistency(message)),
            ReadMode::Permissive => {
                warn!("{}; keeping the first occurrence.", message);
                metadata.skipped_duplicates += 1;
                Ok(true)
            }
        }
    }
}

impl StructureFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        &self,
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut system = MolecularSystem::new();
        let mut metadata = PdbMetadata::default();
        let mut first_model_done = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "HEADER" => {
                    let id = slice_and_trim(&line, 62, 66);
                    if !id.is_empty() {
                        metadata.id = Some(id.to_string());
                    }
                }
                "MODEL" => metadata.model_count += 1,
                "ENDMDL" => first_model_done = true,
                record @ ("ATOM" | "HETATM") => {
                    if first_model_done {
                        continue;
                    }
                    let parsed = parse_atom_record(&line, line_num)?;
                    self.add_record(
                        &mut system,
                        &mut metadata,
                        parsed,
                        record == "HETATM",
                        line_num,
                    )?;
                }
                "END" => break,
                _ => {}
            }
        }

        if system.atom_count() == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        metadata.model_count = metadata.model_count.max(1);
        if metadata.model_count > 1 {
            info!(
                models = metadata.model_count,
                "Multi-model file; only the first model is analyzed."
            );
        }
        debug!(
            chains = system.chain_count(),
            residues = system.residue_count(),
            atoms = system.atom_count(),
            "PDB structure loaded."
        );

        Ok((system, metadata))
    }
}
