// src/error.rs
//! Error types for block construction and rendering.

use bloqs_style::CfgError;
use bloqs_traits::AssetError;
use thiserror::Error;

/// The main error enum for building and rendering block trees.
#[derive(Error, Debug)]
pub enum BlockError {
    /// Content that matches no registered block type and no built-in fallback.
    #[error("Unrecognized argument type: {0}")]
    UnrecognizedContent(String),

    /// A block type that does not provide the named method was asked to use it.
    #[error("{0} is not implemented for this block")]
    NotImplemented(&'static str),

    #[error("Invalid block content: {0}")]
    InvalidContent(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Highlighting failed: {0}")]
    Highlight(String),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Configuration error: {0}")]
    Config(#[from] CfgError),
}

impl From<image::ImageError> for BlockError {
    fn from(e: image::ImageError) -> Self {
        BlockError::Image(e.to_string())
    }
}

impl From<syntect::Error> for BlockError {
    fn from(e: syntect::Error) -> Self {
        BlockError::Highlight(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_content_names_type() {
        let err = BlockError::UnrecognizedContent("my_crate::Widget".to_string());
        assert!(err.to_string().contains("my_crate::Widget"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: BlockError = CfgError::NoSuchAttribute("color".to_string()).into();
        assert!(matches!(err, BlockError::Config(_)));
        assert!(err.to_string().contains("color"));
    }
}
