//! Custom outline ingestion: parse, validate and normalize uploaded SVG.
//!
//! An upload is accepted only with the declared SVG MIME type, parsed with
//! `roxmltree`, and reduced to its drawable primitives plus its native view
//! box. Styling attributes are stripped at ingestion so the composition
//! engine can re-inject its own stroke styling without ever re-reading what
//! the document carried.
//!
//! Attribute handling is a structured map operation (parse element, remove
//! named keys, insert named keys, re-serialize), not text substitution, so
//! unusual-but-valid documents pass through safely: primitives carrying
//! `transform` or other foreign attributes keep them untouched.

use thiserror::Error;

use crate::state::{CustomOutline, ViewBox};

/// The only accepted upload MIME type.
pub const SVG_MIME: &str = "image/svg+xml";

/// Element names treated as drawable primitives, matched in document order.
const DRAWABLE_TAGS: [&str; 7] = [
    "path", "circle", "rect", "ellipse", "line", "polyline", "polygon",
];

/// Styling attributes stripped at ingestion and re-injected at composition.
const STYLE_ATTRS: [&str; 5] = [
    "fill",
    "stroke",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
];

// ============================================================================
// Errors
// ============================================================================

/// Upload-time failures. All are user-facing and non-fatal: the prior
/// composition state stays authoritative and nothing is mutated.
#[derive(Debug, Error)]
pub enum OutlineError {
    /// The upload declared a MIME type other than `image/svg+xml`.
    #[error("unsupported file type: expected {SVG_MIME}, got {0}")]
    UnsupportedFileType(String),

    /// The document failed to parse, or its root element is not `<svg>`.
    #[error("malformed SVG document: {0}")]
    MalformedDocument(String),

    /// The document parsed but contains no drawable primitive.
    #[error("SVG contains no drawable element")]
    NoDrawableContent,
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalizes an uploaded document into a [`CustomOutline`].
///
/// The MIME gate runs before any parsing; non-SVG uploads are rejected
/// without looking at the bytes.
pub fn normalize_upload(mime: &str, bytes: &[u8]) -> Result<CustomOutline, OutlineError> {
    if mime != SVG_MIME {
        return Err(OutlineError::UnsupportedFileType(mime.to_string()));
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|e| OutlineError::MalformedDocument(e.to_string()))?;
    normalize_svg(text)
}

/// Normalizes SVG markup into a [`CustomOutline`].
///
/// Collects every drawable primitive in document order, strips its styling
/// attributes (forcing `fill="none"`), and extracts the root view box
/// (defaulting to `0 0 24 24` when absent or unparsable).
pub fn normalize_svg(text: &str) -> Result<CustomOutline, OutlineError> {
    let doc = roxmltree::Document::parse(text)
        .map_err(|e| OutlineError::MalformedDocument(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(OutlineError::MalformedDocument(format!(
            "root element is <{}>, expected <svg>",
            root.tag_name().name()
        )));
    }

    let primitives: Vec<String> = root
        .descendants()
        .filter(|n| n.is_element() && DRAWABLE_TAGS.contains(&n.tag_name().name()))
        .map(|n| serialize_element(&n, &STYLE_ATTRS, &[("fill", "none")]))
        .collect();

    if primitives.is_empty() {
        return Err(OutlineError::NoDrawableContent);
    }

    let view_box = root
        .attribute("viewBox")
        .and_then(ViewBox::parse)
        .unwrap_or_default();

    Ok(CustomOutline {
        view_box,
        primitives,
    })
}

/// Re-injects stroke styling into a normalized primitive.
///
/// Removes any leftover styling attributes, then appends fresh `stroke`,
/// `stroke-width`, `stroke-linecap`, `stroke-linejoin="round"` and
/// `fill="none"`. Called by the composition engine for every primitive of a
/// custom outline on every render.
///
/// Unparsable input is passed through unchanged; the engine never fails on a
/// primitive the normalizer produced.
pub fn restyle_primitive(
    markup: &str,
    stroke: &str,
    stroke_width: &str,
    linecap: &str,
) -> String {
    let doc = match roxmltree::Document::parse(markup) {
        Ok(doc) => doc,
        Err(_) => return markup.to_string(),
    };
    serialize_element(
        &doc.root_element(),
        &STYLE_ATTRS,
        &[
            ("stroke", stroke),
            ("stroke-width", stroke_width),
            ("stroke-linecap", linecap),
            ("stroke-linejoin", "round"),
            ("fill", "none"),
        ],
    )
}

/// Serializes an element as a self-closing tag with an edited attribute map:
/// attributes named in `skip` are dropped, everything else is kept in
/// document order, and `extra` pairs are appended last.
fn serialize_element(node: &roxmltree::Node<'_, '_>, skip: &[&str], extra: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(64);
    out.push('<');
    out.push_str(node.tag_name().name());
    for attr in node.attributes() {
        if skip.contains(&attr.name()) {
            continue;
        }
        out.push(' ');
        out.push_str(attr.name());
        out.push_str("=\"");
        out.push_str(&escape_attr(attr.value()));
        out.push('"');
    }
    for (name, value) in extra {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push_str("/>");
    out
}

/// Escapes an attribute value for double-quoted XML serialization.
fn escape_attr(value: &str) -> String {
    if !value.contains(['&', '<', '>', '"']) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
