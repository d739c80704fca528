use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "phipsi - compute protein backbone phi/psi dihedral angles from PDB structure files.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output (including parser warnings) except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to analyze files in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute backbone phi/psi angles for one or more structure files.
    Angles(AnglesArgs),
}

/// How consecutive residues are judged to be covalently linked.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ContinuityKind {
    /// C(i-1)-N(i) distance within the peptide-bond cutoff.
    Geometric,
    /// Residue numbers increase by exactly one.
    Sequential,
}

/// Arguments for the `angles` subcommand.
#[derive(Args, Debug)]
pub struct AnglesArgs {
    // --- Core Arguments ---
    /// Input PDB files. Results are produced in the same order.
    #[arg(required = true, value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Write one CSV angle table per input. With several inputs the files are
    /// numbered, e.g. `angles.csv` becomes `angles_1.csv`, `angles_2.csv`, ...
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Segmentation Overrides ---
    /// Override the rule used to detect chain breaks.
    #[arg(long, value_enum, value_name = "RULE")]
    pub continuity: Option<ContinuityKind>,

    /// Override the maximum C-N peptide bond length in Angstroms (geometric rule only).
    #[arg(long, value_name = "FLOAT")]
    pub max_peptide_bond: Option<f64>,

    /// Accept any residue carrying backbone atoms, not only standard amino acids.
    #[arg(long)]
    pub any_residue: bool,

    /// Skip duplicate atom records instead of rejecting the file.
    #[arg(long)]
    pub permissive: bool,

    // --- Reporting ---
    /// Keep residues without a complete phi/psi pair in the results.
    #[arg(long)]
    pub include_ignored: bool,

    /// Print a table of ignored residues for every analyzed file.
    #[arg(long)]
    pub print_ignored: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S continuity.max-peptide-bond=2.0
    #[arg(
        short = 'S',
        long = "set",
        value_name = "KEY=VALUE",
        num_args = 1,
        action = ArgAction::Append
    )]
    pub set_values: Vec<String>,
}
