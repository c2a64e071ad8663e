//! Key-name conversions between Rust-style and JavaScript-style identifiers.

/// `"under_score_string"` -> `"underScoreString"`.
pub fn camelcase(value: &str) -> String {
    let mut parts = value.split('_');
    let mut out = String::with_capacity(value.len());
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for word in parts {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// `"underScoreString"` -> `"under_score_string"`.
///
/// A run of capitals becomes a single word, so `"innerHTMLText"` maps to
/// `"inner_htmltext"`.
pub fn underscorecase(camelcased: &str) -> String {
    let mut out = String::with_capacity(camelcased.len() + 4);
    let mut in_caps = false;
    for c in camelcased.chars() {
        if c.is_ascii_uppercase() {
            if !in_caps {
                out.push('_');
            }
            in_caps = true;
            out.push(c.to_ascii_lowercase());
        } else {
            in_caps = false;
            out.push(c);
        }
    }
    out
}
