//! Filesystem-backed asset provider.
//!
//! Assets are looked up under one or more root directories, first match
//! wins. Resolved paths must stay inside the root they were found in, so a
//! name like `../../etc/passwd` never escapes.

use bloqs_traits::{AssetError, AssetProvider, SharedAssetData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Root {
    path: PathBuf,
    /// Canonical form, when the directory exists.
    canonical: Option<PathBuf>,
}

impl Root {
    fn new(path: PathBuf) -> Self {
        let canonical = path.canonicalize().ok();
        Self { path, canonical }
    }

    /// Resolves `name` under this root, or `None` if it would escape it.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        if relative.is_absolute() {
            return None;
        }
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }

        let full = self.path.join(relative);
        match (full.canonicalize(), &self.canonical) {
            (Ok(canonical), Some(base)) if canonical.starts_with(base) => Some(canonical),
            // Symlink pointing outside the root.
            (Ok(_), Some(_)) => None,
            _ => Some(full),
        }
    }
}

/// Loads assets from directories on the local filesystem.
#[derive(Debug, Clone)]
pub struct FilesystemAssetProvider {
    roots: Vec<Root>,
}

impl FilesystemAssetProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            roots: vec![Root::new(root.as_ref().to_path_buf())],
        }
    }

    /// Adds another directory, searched after the existing ones.
    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.roots.push(Root::new(root.as_ref().to_path_buf()));
        self
    }

    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(|r| r.path.as_path())
    }

    /// The first existing file matching `name`, across all roots.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .filter_map(|root| root.resolve(name))
            .find(|p| p.is_file())
    }
}

impl AssetProvider for FilesystemAssetProvider {
    fn load(&self, path: &str) -> Result<SharedAssetData, AssetError> {
        let full_path = self.locate(path).ok_or_else(|| {
            log::debug!("Asset '{}' not found in {} root(s)", path, self.roots.len());
            AssetError::NotFound(path.to_string())
        })?;

        std::fs::read(&full_path)
            .map(Arc::new)
            .map_err(|e| AssetError::LoadFailed {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    fn exists(&self, path: &str) -> bool {
        self.locate(path).is_some()
    }

    fn name(&self) -> &'static str {
        "FilesystemAssetProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_existing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.css"), b"body { margin: 0 }").unwrap();

        let provider = FilesystemAssetProvider::new(dir.path());
        let data = provider.load("main.css").unwrap();
        assert_eq!(&*data, b"body { margin: 0 }");
    }

    #[test]
    fn test_load_text_appends_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("core.js"), b"var loaded = 1;").unwrap();

        let provider = FilesystemAssetProvider::new(dir.path());
        assert_eq!(provider.load_text("core", "js").unwrap(), "var loaded = 1;");
    }

    #[test]
    fn test_not_found() {
        let dir = tempdir().unwrap();
        let provider = FilesystemAssetProvider::new(dir.path());

        let result = provider.load("missing.css");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
        assert!(!provider.exists("missing.css"));
    }

    #[test]
    fn test_directories_are_not_assets() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("css")).unwrap();

        let provider = FilesystemAssetProvider::new(dir.path());
        assert!(!provider.exists("css"));
    }

    #[test]
    fn test_roots_searched_in_order() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        fs::write(first.path().join("a.css"), b"first").unwrap();
        fs::write(second.path().join("a.css"), b"second").unwrap();
        fs::write(second.path().join("b.css"), b"only second").unwrap();

        let provider = FilesystemAssetProvider::new(first.path()).with_root(second.path());
        assert_eq!(&*provider.load("a.css").unwrap(), b"first");
        assert_eq!(&*provider.load("b.css").unwrap(), b"only second");
        assert_eq!(provider.roots().count(), 2);
    }

    #[test]
    fn test_nested_paths_allowed() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css").join("grid.css"), b".grid{}").unwrap();

        let provider = FilesystemAssetProvider::new(dir.path());
        assert!(provider.exists("css/grid.css"));
    }

    #[test]
    fn test_blocks_path_traversal() {
        let outer = tempdir().unwrap();
        let inner = outer.path().join("static");
        fs::create_dir(&inner).unwrap();
        fs::write(outer.path().join("secret.css"), b"secret").unwrap();

        let provider = FilesystemAssetProvider::new(&inner);
        assert!(provider.load("../secret.css").is_err());
        assert!(!provider.exists("./../secret.css"));
        assert!(!provider.exists("css/../../secret.css"));
    }

    #[test]
    fn test_blocks_absolute_paths() {
        let dir = tempdir().unwrap();
        let absolute = dir.path().join("abs.css");
        fs::write(&absolute, b"x").unwrap();

        let provider = FilesystemAssetProvider::new(dir.path());
        assert!(!provider.exists(absolute.to_str().unwrap()));
    }
}
