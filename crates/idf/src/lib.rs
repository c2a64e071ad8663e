//! Intermediate Document Format (IDF)
//!
//! The in-memory output tree that blocks write themselves into during a
//! render walk, and its serialization to HTML text. Blocks only ever append
//! elements and set attributes; the tree is serialized once at the end.

mod render;

pub use render::{render_node, render_to_string};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Returns true for tags serialized without a closing tag.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// A node in the output tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Text content, escaped on output.
    Text(String),
    /// Pre-rendered markup inserted verbatim (raw HTML blocks, resource bodies).
    Raw(String),
    /// A `<!DOCTYPE ...>` declaration.
    Doctype(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Sets the `class` attribute from a list of class names.
    pub fn set_classes<S: AsRef<str>>(&mut self, classes: &[S]) {
        let joined = classes
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr("class", joined);
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|x| x == class))
            .unwrap_or(false)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements only, skipping text and raw nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Appends a new child element and returns it for further writing.
    pub fn append(&mut self, tag: impl Into<String>) -> &mut Element {
        self.append_element(Element::new(tag))
    }

    /// Appends a pre-built element and returns it.
    pub fn append_element(&mut self, element: Element) -> &mut Element {
        self.children.push(Node::Element(element));
        match self.children.last_mut() {
            Some(Node::Element(el)) => el,
            _ => unreachable!("an element was just pushed"),
        }
    }

    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    pub fn append_raw(&mut self, markup: impl Into<String>) {
        self.children.push(Node::Raw(markup.into()));
    }

    pub fn append_node(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Depth-first search for all descendant elements with the given tag.
    pub fn find_all<'a>(&'a self, tag: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_matching(&|el| el.tag.eq_ignore_ascii_case(tag), &mut found);
        found
    }

    /// Depth-first search for all descendant elements carrying a class.
    pub fn find_by_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_matching(&|el| el.has_class(class), &mut found);
        found
    }

    /// First descendant with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.find_all(tag).into_iter().next()
    }

    fn collect_matching<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if pred(child) {
                out.push(child);
            }
            child.collect_matching(pred, out);
        }
    }

    /// Concatenated text of all descendant text and raw nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) | Node::Raw(t) => out.push_str(t),
                Node::Element(el) => el.collect_text(out),
                Node::Doctype(_) => {}
            }
        }
    }
}

/// A complete output document: an optional doctype followed by a root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub doctype: Option<String>,
    pub root: Element,
}

impl Document {
    /// Creates an HTML5 document with `<head>` and `<body>` children.
    pub fn html5() -> Self {
        let mut root = Element::new("html");
        root.append("head");
        root.append("body");
        Self {
            doctype: Some("html".to_string()),
            root,
        }
    }

    pub fn head_mut(&mut self) -> Option<&mut Element> {
        self.root.child_elements_mut().find(|el| el.tag() == "head")
    }

    pub fn body_mut(&mut self) -> Option<&mut Element> {
        self.root.child_elements_mut().find(|el| el.tag() == "body")
    }

    pub fn head(&self) -> Option<&Element> {
        self.root.child_elements().find(|el| el.tag() == "head")
    }

    pub fn body(&self) -> Option<&Element> {
        self.root.child_elements().find(|el| el.tag() == "body")
    }

    pub fn render(&self, pretty: bool) -> String {
        let mut out = String::new();
        if let Some(doctype) = &self.doctype {
            out.push_str(&format!("<!DOCTYPE {}>", doctype));
            if pretty {
                out.push('\n');
            }
        }
        out.push_str(&render_to_string(&self.root, pretty));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_child() {
        let mut root = Element::new("div");
        root.append("span").append_text("hi");
        root.append("p");

        let tags: Vec<&str> = root.child_elements().map(Element::tag).collect();
        assert_eq!(tags, vec!["span", "p"]);
        assert_eq!(root.text_content(), "hi");
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut el = Element::new("div").with_attr("id", "a").with_attr("style", "x");
        el.set_attr("id", "b");

        let attrs: Vec<(&str, &str)> = el.attrs().collect();
        assert_eq!(attrs, vec![("id", "b"), ("style", "x")]);
    }

    #[test]
    fn test_classes() {
        let mut el = Element::new("div");
        el.set_classes(&["bloqs", "extra"]);

        assert_eq!(el.attr("class"), Some("bloqs extra"));
        assert!(el.has_class("extra"));
        assert!(!el.has_class("bloq"));
    }

    #[test]
    fn test_find_all_is_depth_first() {
        let mut root = Element::new("body");
        let outer = root.append("div");
        outer.set_attr("id", "outer");
        outer.append("div").set_attr("id", "inner");
        root.append("div").set_attr("id", "sibling");

        let ids: Vec<&str> = root
            .find_all("div")
            .iter()
            .filter_map(|el| el.attr("id"))
            .collect();
        assert_eq!(ids, vec!["outer", "inner", "sibling"]);
    }

    #[test]
    fn test_document_shell() {
        let mut doc = Document::html5();
        doc.body_mut().unwrap().append("p").append_text("x");

        assert_eq!(
            doc.render(false),
            "<!DOCTYPE html><html><head></head><body><p>x</p></body></html>"
        );
    }
}
