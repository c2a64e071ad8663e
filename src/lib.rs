//! # bloqs
//!
//! Build HTML reports by composing blocks, then save them as HTML, PDF or
//! images.
//!
//! The block engine lives in [`bloqs_core`] and is re-exported here. This
//! crate adds what touches the outside world: the user configuration file,
//! writing output, and driving external converters (`wkhtmltopdf`,
//! `wkhtmltoimage`, headless Chrome).
//!
//! ```ignore
//! use bloqs::{BlockOptions, Grid, SaveOptions, save};
//! use std::sync::Arc;
//!
//! let report = Grid::new(vec!["Hello", "World"], BlockOptions::new().title("Greeting"))?.cols(2);
//! save(&Arc::new(report), &SaveOptions::to_file("greeting.pdf"))?;
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod export;

pub use bloqs_core::*;
pub use bloqs_resource::FilesystemAssetProvider;
pub use bloqs_traits::{
    ConversionRequest, ConvertError, HeaderFooterLayout, HtmlConverter, Orientation, Spacing,
};

pub use config::UserConfig;
pub use error::BloqsError;
pub use export::{Exporter, OutputTarget, SaveOptions, publish, resolve_target, save};
