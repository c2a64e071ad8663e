use bloqs_core::{AssetError, BlockError, CfgError};
use bloqs_traits::ConvertError;
use thiserror::Error;

/// Errors from saving, publishing and converting documents.
#[derive(Error, Debug)]
pub enum BloqsError {
    #[error("Rendering failed: {0}")]
    Block(#[from] BlockError),

    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),

    #[error("Invalid block configuration: {0}")]
    Config(#[from] CfgError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed user configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Inconsistent or missing arguments, reported before anything is rendered.
    #[error("{0}")]
    Usage(String),
}
