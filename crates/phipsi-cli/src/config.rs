use crate::cli::{AnglesArgs, ContinuityKind};
use crate::error::{CliError, Result};
use phipsi::core::io::pdb::ReadMode;
use phipsi::engine::config as core_config;
use serde::Deserialize;
use serde::de::{DeserializeOwned, IntoDeserializer, value};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialContinuityConfig {
    #[serde(rename = "type")]
    kind: Option<ContinuityKind>,
    #[serde(rename = "max-peptide-bond")]
    max_peptide_bond: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialResiduesConfig {
    filter: Option<core_config::ResidueFilter>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialInputConfig {
    #[serde(rename = "read-mode")]
    read_mode: Option<ReadMode>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    #[serde(rename = "include-ignored")]
    include_ignored: Option<bool>,
    #[serde(rename = "print-ignored")]
    print_ignored: Option<bool>,
}

/// The configuration file as written by the user; every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAnalysisConfig {
    continuity: Option<PartialContinuityConfig>,
    residues: Option<PartialResiduesConfig>,
    input: Option<PartialInputConfig>,
    output: Option<PartialOutputConfig>,
}

/// Everything the `angles` command needs after merging file, `--set` and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AnglesSettings {
    pub analysis: core_config::AnalysisConfig,
    pub print_ignored: bool,
}

fn parse_value<T: std::str::FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn parse_variant<T: DeserializeOwned>(key: &str, value_str: &str) -> Result<T> {
    let deserializer: value::StrDeserializer<'_, value::Error> = value_str.into_deserializer();
    T::deserialize(deserializer)
        .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))
}

impl PartialAnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolves the final settings. Precedence: flags, then `--set`, then file, then defaults.
    pub fn merge_with_cli(mut self, args: &AnglesArgs) -> Result<AnglesSettings> {
        self.apply_set_values(&args.set_values)?;

        let continuity = self.continuity.take().unwrap_or_default();
        let residues = self.residues.take().unwrap_or_default();
        let input = self.input.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let kind = args
            .continuity
            .or(continuity.kind)
            .unwrap_or(ContinuityKind::Geometric);
        let max_peptide_bond = args.max_peptide_bond.or(continuity.max_peptide_bond);
        let rule = match kind {
            ContinuityKind::Geometric => core_config::ContinuityRule::Geometric {
                max_peptide_bond: max_peptide_bond
                    .unwrap_or(core_config::DEFAULT_MAX_PEPTIDE_BOND),
            },
            ContinuityKind::Sequential => {
                if max_peptide_bond.is_some() {
                    warn!("`max-peptide-bond` has no effect with sequential continuity.");
                }
                core_config::ContinuityRule::Sequential
            }
        };

        let residue_filter = if args.any_residue {
            core_config::ResidueFilter::AnyBackbone
        } else {
            residues.filter.unwrap_or_default()
        };

        let read_mode = if args.permissive {
            ReadMode::Permissive
        } else {
            input.read_mode.unwrap_or_default()
        };

        let include_ignored = args.include_ignored || output.include_ignored.unwrap_or(false);
        let print_ignored = args.print_ignored || output.print_ignored.unwrap_or(false);

        let analysis = core_config::AnalysisConfigBuilder::new()
            .continuity(rule)
            .residue_filter(residue_filter)
            .read_mode(read_mode)
            .include_ignored(include_ignored)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(AnglesSettings {
            analysis,
            print_ignored,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let (key, value_str) = (key.trim(), value_str.trim());

            match key {
                "continuity.type" => {
                    self.continuity.get_or_insert_with(Default::default).kind =
                        Some(parse_variant(key, value_str)?);
                }
                "continuity.max-peptide-bond" => {
                    self.continuity
                        .get_or_insert_with(Default::default)
                        .max_peptide_bond = Some(parse_value(key, value_str, "float")?);
                }
                "residues.filter" => {
                    self.residues.get_or_insert_with(Default::default).filter =
                        Some(parse_variant(key, value_str)?);
                }
                "input.read-mode" => {
                    self.input.get_or_insert_with(Default::default).read_mode =
                        Some(parse_variant(key, value_str)?);
                }
                "output.include-ignored" => {
                    self.output
                        .get_or_insert_with(Default::default)
                        .include_ignored = Some(parse_value(key, value_str, "boolean")?);
                }
                "output.print-ignored" => {
                    self.output.get_or_insert_with(Default::default).print_ignored =
                        Some(parse_value(key, value_str, "boolean")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
