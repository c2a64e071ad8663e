//! Newtype wrappers for semantic identifiers
//!
//! These types provide compile-time type safety to prevent mixing up
//! different kinds of string identifiers (block ids, anchor names, resource names).

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

macro_rules! define_str_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.into())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_str_id!(
    /// The opaque, immutable identity of a block, fixed at construction.
    BlockId
);

define_str_id!(
    /// The name of an in-page anchor (`<a name="...">`) written before a block's title.
    AnchorId
);

define_str_id!(
    /// The deduplication key of a script or style resource.
    ResourceName
);

impl BlockId {
    /// Generates a fresh random identifier (32 lowercase hex characters).
    pub fn generate() -> Self {
        Self::from(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns at most the first `precision` characters, used for temp file names.
    pub fn short(&self, precision: usize) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(precision)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}
