#![allow(dead_code)]

use bloqs::idf::{Document, Element};
use bloqs::{
    Block, BlockError, ConversionRequest, ConvertError, HeaderFooterLayout, HtmlConverter,
    IdStrategy, RenderOptions, render_document_with,
};
use std::sync::Mutex;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Renders with sequential ids so output is reproducible.
pub fn render(block: &dyn Block) -> Result<Document, BlockError> {
    render_with(block, &RenderOptions::compact())
}

pub fn render_with(block: &dyn Block, options: &RenderOptions) -> Result<Document, BlockError> {
    render_document_with(block, options, IdStrategy::Sequential.generator())
}

/// The single element the block wrote into `<body>`.
pub fn root_element(doc: &Document) -> &Element {
    doc.body()
        .and_then(|body| body.child_elements().next())
        .expect("document body has no element")
}

pub fn style_of(el: &Element) -> &str {
    el.attr("style").unwrap_or("")
}

/// Elements directly under `el` carrying `class`.
pub fn children_with_class<'a>(el: &'a Element, class: &str) -> Vec<&'a Element> {
    el.child_elements().filter(|c| c.has_class(class)).collect()
}

/// Names of the resources written into the document head, in order.
pub fn head_tags(doc: &Document) -> Vec<String> {
    doc.head()
        .map(|head| head.child_elements().map(|el| el.tag().to_string()).collect())
        .unwrap_or_default()
}

/// A converter that records its requests and writes a marker file instead of
/// running an external tool.
pub struct RecordingConverter {
    layout: HeaderFooterLayout,
    pub requests: Mutex<Vec<ConversionRequest>>,
}

impl RecordingConverter {
    pub fn new(layout: HeaderFooterLayout) -> Self {
        Self {
            layout,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> ConversionRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("converter was not called")
    }
}

impl HtmlConverter for RecordingConverter {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn header_footer_layout(&self) -> HeaderFooterLayout {
        self.layout
    }

    fn convert(&self, request: &ConversionRequest) -> Result<(), ConvertError> {
        std::fs::write(&request.output_file, b"converted")?;
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}
