//! Images embedded as base64 data URIs.

use crate::block::{Block, RenderContext};
use crate::error::BlockError;
use crate::settings::{BlockOptions, BlockSettings};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bloqs_idf::Element;
use bloqs_style::Cfg;
use bloqs_traits::AssetProvider;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::sync::Arc;

/// Raw image bytes and their MIME subtype (`png`, `gif`, `jpeg`, `svg+xml`).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    bytes: Arc<[u8]>,
    mime_type: String,
}

impl ImageData {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn png(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(bytes, "png")
    }

    /// Loads an image through `provider`, deriving the MIME subtype from the
    /// file extension.
    pub fn from_asset(provider: &dyn AssetProvider, path: &str) -> Result<Self, BlockError> {
        let extension = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let mime_type = match extension.as_str() {
            "png" => "png",
            "gif" => "gif",
            "jpg" | "jpeg" => "jpeg",
            "svg" => "svg+xml",
            other => {
                return Err(BlockError::Image(format!(
                    "Unsupported image file extension '{}' for {}",
                    other, path
                )));
            }
        };
        let data = provider.load(path)?;
        Ok(Self::new(data.as_slice(), mime_type))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The `data:` URI for an `<img src>`.
    pub fn data_uri(&self) -> String {
        format!("data:image/{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// Pixel dimensions read from the image header.
    ///
    /// Fails if the bytes do not match the declared MIME subtype or the
    /// subtype carries no readable header (e.g. SVG).
    pub fn sniff_dimensions(&self) -> Result<(u32, u32), BlockError> {
        let expected = match self.mime_type.to_ascii_lowercase().as_str() {
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            "jpeg" | "jpg" => ImageFormat::Jpeg,
            other => {
                return Err(BlockError::Image(format!(
                    "Can't determine image dimensions for mime type {}",
                    other
                )));
            }
        };

        let actual = image::guess_format(&self.bytes)?;
        if actual != expected {
            return Err(BlockError::Image(format!(
                "Image type is not {} and does not match mime type",
                self.mime_type
            )));
        }

        let reader = ImageReader::with_format(Cursor::new(&self.bytes[..]), expected);
        Ok(reader.into_dimensions()?)
    }
}

/// Displays an image. Without an explicit size the image's own pixel size is used.
#[derive(Debug, Clone)]
pub struct ImageBlock {
    settings: BlockSettings,
    image: ImageData,
    img_style: Cfg,
}

impl ImageBlock {
    /// The width and height in `options` size the `<img>` element itself, not
    /// the surrounding container.
    pub fn new(image: ImageData, mut options: BlockOptions) -> Result<Self, BlockError> {
        let mut width = options.width.take();
        let mut height = options.height.take();

        if width.is_none() && height.is_none() {
            let (w, h) = image.sniff_dimensions()?;
            width = Some(format!("{}px", w));
            height = Some(format!("{}px", h));
        }

        let mut img_style = Cfg::new();
        if let Some(width) = width {
            img_style.insert("width", width);
        }
        if let Some(height) = height {
            img_style.insert("height", height);
        }

        Ok(Self {
            settings: options.into(),
            image,
            img_style,
        })
    }

    /// Loads and wraps an image file, see [`ImageData::from_asset`].
    pub fn from_asset(
        provider: &dyn AssetProvider,
        path: &str,
        options: BlockOptions,
    ) -> Result<Self, BlockError> {
        Self::new(ImageData::from_asset(provider, path)?, options)
    }

    /// Extra CSS for the `<img>` element. Sizing set at construction wins.
    pub fn with_img_style(mut self, style: &Cfg) -> Self {
        self.img_style = style.override_with(&self.img_style);
        self
    }

    pub fn image(&self) -> &ImageData {
        &self.image
    }

    pub fn img_style(&self) -> &Cfg {
        &self.img_style
    }
}

impl Block for ImageBlock {
    fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    fn write_contents(
        &self,
        container: &mut Element,
        _cfg: &Cfg,
        _ctx: &mut RenderContext,
    ) -> Result<(), BlockError> {
        let img = container.append("img");
        img.set_attr("src", self.image.data_uri());
        if !self.img_style.is_empty() {
            img.set_attr("style", self.img_style.to_css_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloqs_traits::InMemoryAssetProvider;
    use bloqs_types::IdStrategy;
    use pretty_assertions::assert_eq;

    // A 3x2 single-colour PNG encoded by the image crate.
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_dimensions_sniffed_from_png() {
        let block = ImageBlock::new(ImageData::png(png_bytes(3, 2)), BlockOptions::new()).unwrap();
        assert_eq!(block.img_style().get_str("width"), Some("3px"));
        assert_eq!(block.img_style().get_str("height"), Some("2px"));
    }

    #[test]
    fn test_explicit_size_skips_sniffing() {
        let data = ImageData::new(b"<svg/>".to_vec(), "svg+xml");
        let block = ImageBlock::new(data, BlockOptions::new().width("50px")).unwrap();
        assert_eq!(block.img_style().to_css_string(), "width:50px");
        assert_eq!(block.settings().width(), None);
    }

    #[test]
    fn test_mismatched_mime_type_errors() {
        let data = ImageData::new(png_bytes(1, 1), "gif");
        let err = ImageBlock::new(data, BlockOptions::new()).unwrap_err();
        assert!(err.to_string().contains("does not match mime type"));
    }

    #[test]
    fn test_svg_without_size_errors() {
        let data = ImageData::new(b"<svg/>".to_vec(), "svg+xml");
        let err = ImageBlock::new(data, BlockOptions::new()).unwrap_err();
        assert!(err.to_string().contains("svg+xml"));
    }

    #[test]
    fn test_writes_data_uri() {
        let data = ImageData::new(b"<svg/>".to_vec(), "svg+xml");
        let block = ImageBlock::new(data, BlockOptions::new().width("10px").height("5px"))
            .unwrap()
            .with_img_style(&Cfg::from([("border", "1px solid black"), ("width", "99px")]));

        let mut body = Element::new("body");
        let mut ctx = RenderContext::untracked(IdStrategy::Sequential.generator());
        block.write_block(&mut body, &Cfg::new(), &mut ctx).unwrap();

        let img = body.find("img").unwrap();
        assert_eq!(img.attr("src"), Some("data:image/svg+xml;base64,PHN2Zy8+"));
        assert_eq!(
            img.attr("style"),
            Some("border:1px solid black;width:10px;height:5px")
        );
    }

    #[test]
    fn test_from_asset_uses_extension() {
        let provider = InMemoryAssetProvider::new();
        provider.add("img/logo.PNG", png_bytes(4, 4)).unwrap();

        let block = ImageBlock::from_asset(&provider, "img/logo.PNG", BlockOptions::new()).unwrap();
        assert_eq!(block.image().mime_type(), "png");
        assert_eq!(block.img_style().get_str("width"), Some("4px"));

        let err = ImageData::from_asset(&provider, "notes.txt").unwrap_err();
        assert!(matches!(err, BlockError::Image(_)));
    }
}
