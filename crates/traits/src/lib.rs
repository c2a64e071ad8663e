pub mod convert;
pub mod resource;

pub use convert::{
    ConversionRequest, ConvertError, HeaderFooterLayout, HtmlConverter, Orientation, Spacing,
};
pub use resource::{AssetError, AssetProvider, InMemoryAssetProvider, SharedAssetData};
