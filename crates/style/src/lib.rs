//! Inheritable configuration for bloqs blocks.
//!
//! [`Cfg`] is the unit of the configuration cascade: every block owns a
//! "cascading" config captured from its construction-time styling, merges it
//! with its ancestors' resolved config during rendering, and projects the
//! result into a CSS `style` attribute.

pub mod case;
pub mod cfg;
pub mod error;
pub mod parsers;
pub mod value;

pub use case::{camelcase, underscorecase};
pub use cfg::Cfg;
pub use error::CfgError;
pub use parsers::parse_css_declarations;
pub use value::CfgValue;
