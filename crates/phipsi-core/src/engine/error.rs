use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::pdb::PdbError;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Malformed input '{path}': {source}", path = path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
