//! AssetProvider trait for abstracting static asset loading.
//!
//! File-backed stylesheets and scripts are loaded through this trait so the
//! block engine never touches the filesystem itself.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for asset loading operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to load asset '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid asset format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        AssetError::Io(err.to_string())
    }
}

/// Shared asset data type (reference-counted bytes).
pub type SharedAssetData = Arc<Vec<u8>>;

/// A source of static assets (stylesheets, scripts).
pub trait AssetProvider: Send + Sync + Debug {
    /// Load an asset by its path.
    fn load(&self, path: &str) -> Result<SharedAssetData, AssetError>;

    /// Check if an asset exists.
    fn exists(&self, path: &str) -> bool;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Loads `file_name` as UTF-8 text, appending `.{extension}` when the name
    /// does not already end with it.
    fn load_text(&self, file_name: &str, extension: &str) -> Result<String, AssetError> {
        let path = with_extension(file_name, extension);
        let data = self.load(&path)?;
        String::from_utf8(data.as_ref().clone())
            .map_err(|e| AssetError::InvalidFormat(format!("{}: {}", path, e)))
    }
}

/// Completes `file_name` with `extension` unless it already carries it.
pub fn with_extension(file_name: &str, extension: &str) -> String {
    if extension.is_empty() || file_name.ends_with(&format!(".{}", extension)) {
        file_name.to_string()
    } else {
        format!("{}.{}", file_name, extension)
    }
}

/// An in-memory asset provider, pre-populated before rendering.
#[derive(Debug, Default)]
pub struct InMemoryAssetProvider {
    assets: RwLock<HashMap<String, SharedAssetData>>,
}

impl InMemoryAssetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset to the store.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<(), AssetError> {
        let path_string = path.into();
        let mut assets = self.assets.write().map_err(|_| AssetError::LoadFailed {
            path: path_string.clone(),
            message: "asset store lock poisoned".to_string(),
        })?;
        assets.insert(path_string, Arc::new(data.into()));
        Ok(())
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.assets.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetProvider for InMemoryAssetProvider {
    fn load(&self, path: &str) -> Result<SharedAssetData, AssetError> {
        let assets = self.assets.read().map_err(|_| AssetError::LoadFailed {
            path: path.to_string(),
            message: "asset store lock poisoned".to_string(),
        })?;
        assets
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.assets
            .read()
            .map(|a| a.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryAssetProvider"
    }
}
