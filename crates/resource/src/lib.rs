//! Asset providers for bloqs.
//!
//! File-backed stylesheets and scripts are loaded through the
//! `AssetProvider` trait from bloqs-traits. This crate provides the
//! filesystem implementation; the in-memory one is re-exported for
//! convenience.

mod filesystem;

pub use filesystem::FilesystemAssetProvider;

pub use bloqs_traits::InMemoryAssetProvider;
