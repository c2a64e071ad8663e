//! Serialization of the output tree to HTML text.

use crate::{Element, Node, is_void_element};
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Serializes an element and its subtree.
///
/// With `pretty` set, every element and text node starts on its own line,
/// indented one space per nesting level. The contents of `<pre>` and
/// `<textarea>` are always written compactly.
pub fn render_to_string(element: &Element, pretty: bool) -> String {
    let mut out = String::new();
    write_element(&mut out, element, pretty, 0);
    if pretty && out.ends_with('\n') {
        out.pop();
    }
    out
}

/// Serializes a single node (element, text, raw markup or doctype).
pub fn render_node(node: &Node, pretty: bool) -> String {
    let mut out = String::new();
    write_node(&mut out, node, pretty, 0);
    if pretty && out.ends_with('\n') {
        out.pop();
    }
    out
}

fn indent(out: &mut String, pretty: bool, depth: usize) {
    if pretty {
        out.extend(std::iter::repeat_n(' ', depth));
    }
}

fn newline(out: &mut String, pretty: bool) {
    if pretty {
        out.push('\n');
    }
}

fn write_node(out: &mut String, node: &Node, pretty: bool, depth: usize) {
    match node {
        Node::Element(el) => write_element(out, el, pretty, depth),
        Node::Text(text) => {
            if pretty && text.trim().is_empty() {
                return;
            }
            indent(out, pretty, depth);
            out.push_str(&encode_text(text));
            newline(out, pretty);
        }
        Node::Raw(markup) => {
            indent(out, pretty, depth);
            out.push_str(markup);
            newline(out, pretty);
        }
        Node::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push('>');
            newline(out, pretty);
        }
    }
}

fn preserves_whitespace(tag: &str) -> bool {
    matches!(tag, "pre" | "textarea")
}

fn write_element(out: &mut String, element: &Element, pretty: bool, depth: usize) {
    indent(out, pretty, depth);
    out.push('<');
    out.push_str(element.tag());
    for (name, value) in element.attrs() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');

    if is_void_element(element.tag()) {
        newline(out, pretty);
        return;
    }

    if preserves_whitespace(element.tag()) {
        for child in element.children() {
            write_node(out, child, false, 0);
        }
    } else if !element.children().is_empty() {
        newline(out, pretty);
        for child in element.children() {
            write_node(out, child, pretty, depth + 1);
        }
        indent(out, pretty, depth);
    }

    out.push_str("</");
    out.push_str(element.tag());
    out.push('>');
    newline(out, pretty);
}
