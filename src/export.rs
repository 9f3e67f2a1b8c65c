//! Export pipeline: optimize the serialized document and package it as a
//! downloadable file.
//!
//! The optimizer is an external collaborator behind the [`Optimizer`] trait.
//! Export never fails outright: any optimizer failure falls back to the
//! unoptimized markup verbatim.

use thiserror::Error;

use crate::compose::SVG_CONTENT_TYPE;

/// Name of the exported file.
pub const EXPORT_FILE_NAME: &str = "favicon.svg";

/// The optimizer could not process the document.
///
/// Recovered by exporting the unoptimized markup; never surfaced to the user.
#[derive(Debug, Error)]
#[error("optimizer failure: {0}")]
pub struct OptimizerError(pub String);

/// Options recognized by optimizer implementations.
///
/// The default matches the export pipeline's fixed configuration: keep the
/// standard cleanup passes and additionally strip the root's `viewBox` and
/// explicit `width`/`height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Apply the implementation's default cleanup passes.
    pub preserve_defaults: bool,

    /// Strip the `viewBox` attribute from the root element.
    pub remove_view_box: bool,

    /// Strip explicit `width`/`height` attributes from the root element.
    pub remove_dimensions: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            preserve_defaults: true,
            remove_view_box: true,
            remove_dimensions: true,
        }
    }
}

/// An opaque pure markup-to-markup optimization step.
pub trait Optimizer {
    fn optimize(&self, markup: &str, config: &OptimizerConfig) -> Result<String, OptimizerError>;
}

// ============================================================================
// Built-in optimizer
// ============================================================================

/// Structured re-serializing optimizer.
///
/// Parses the document and writes it back without comments or inter-element
/// whitespace, dropping root attributes per the config. Purely structural; it
/// never touches path data or numeric precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupOptimizer;

impl Optimizer for MarkupOptimizer {
    fn optimize(&self, markup: &str, config: &OptimizerConfig) -> Result<String, OptimizerError> {
        let doc =
            roxmltree::Document::parse(markup).map_err(|e| OptimizerError(e.to_string()))?;
        let mut out = String::with_capacity(markup.len());
        serialize(&doc.root_element(), true, config, &mut out);
        Ok(out)
    }
}

fn serialize(node: &roxmltree::Node<'_, '_>, is_root: bool, config: &OptimizerConfig, out: &mut String) {
    out.push('<');
    out.push_str(node.tag_name().name());
    // Re-declare only the root's default namespace; redundant declarations
    // on descendants are dropped as part of the default cleanup.
    if is_root {
        for ns in node.namespaces() {
            if ns.name().is_none() {
                out.push_str(" xmlns=\"");
                out.push_str(ns.uri());
                out.push('"');
            }
        }
    }
    for attr in node.attributes() {
        if is_root && config.remove_view_box && attr.name() == "viewBox" {
            continue;
        }
        if is_root
            && config.remove_dimensions
            && (attr.name() == "width" || attr.name() == "height")
        {
            continue;
        }
        out.push(' ');
        out.push_str(attr.name());
        out.push_str("=\"");
        out.push_str(&escape(attr.value()));
        out.push('"');
    }

    let mut wrote_child = false;
    let mut body = String::new();
    for child in node.children() {
        if child.is_element() {
            serialize(&child, false, config, &mut body);
            wrote_child = true;
        } else if child.is_text() {
            let text = child.text().unwrap_or("").trim();
            if !text.is_empty() {
                body.push_str(&escape(text));
                wrote_child = true;
            }
        }
        // Comments and processing instructions are dropped.
    }

    if wrote_child {
        out.push('>');
        out.push_str(&body);
        out.push_str("</");
        out.push_str(node.tag_name().name());
        out.push('>');
    } else {
        out.push_str("/>");
    }
}

fn escape(value: &str) -> String {
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
// Export
// ============================================================================

/// The packaged download: name, content type, markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub contents: String,
}

/// Runs the serialized preview document through the optimizer and packages
/// the result as `favicon.svg`.
///
/// Infallible by design: if the optimizer errors for any reason, the
/// unoptimized markup is exported verbatim.
pub fn export_favicon(document: &str, optimizer: &dyn Optimizer) -> ExportArtifact {
    let contents = optimizer
        .optimize(document, &OptimizerConfig::default())
        .unwrap_or_else(|_| document.to_string());
    ExportArtifact {
        file_name: EXPORT_FILE_NAME,
        content_type: SVG_CONTENT_TYPE,
        contents,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GlyphLibrary;
    use crate::compose::document;
    use crate::state::CompositionState;

    struct FailingOptimizer;

    impl Optimizer for FailingOptimizer {
        fn optimize(&self, _: &str, _: &OptimizerConfig) -> Result<String, OptimizerError> {
            Err(OptimizerError("forced failure".to_string()))
        }
    }

    #[test]
    fn strips_root_view_box_and_dimensions() {
        let optimized = MarkupOptimizer
            .optimize(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32" viewBox="0 0 32 32"><rect width="32" height="32"/></svg>"#,
                &OptimizerConfig::default(),
            )
            .unwrap();
        assert_eq!(
            optimized,
            r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="32" height="32"/></svg>"#
        );
    }

    #[test]
    fn config_flags_retain_root_attributes() {
        let input = r#"<svg width="32" viewBox="0 0 32 32"><rect width="1" height="1"/></svg>"#;
        let config = OptimizerConfig {
            preserve_defaults: true,
            remove_view_box: false,
            remove_dimensions: false,
        };
        let optimized = MarkupOptimizer.optimize(input, &config).unwrap();
        assert!(optimized.contains(r#"viewBox="0 0 32 32""#));
        assert!(optimized.contains(r#"width="32""#));
    }

    #[test]
    fn drops_comments_and_interstitial_whitespace() {
        let optimized = MarkupOptimizer
            .optimize(
                "<svg viewBox=\"0 0 1 1\">\n  <!-- hi -->\n  <rect width=\"1\" height=\"1\"/>\n</svg>",
                &OptimizerConfig::default(),
            )
            .unwrap();
        assert_eq!(optimized, r#"<svg><rect width="1" height="1"/></svg>"#);
    }

    #[test]
    fn keeps_nested_dimensions_intact() {
        let state = CompositionState::default();
        let glyphs = GlyphLibrary::builtin();
        let doc = document(&state, &glyphs);
        let optimized = MarkupOptimizer
            .optimize(&doc, &OptimizerConfig::default())
            .unwrap();
        // Root dimensions gone, icon frame dimensions kept.
        assert!(optimized.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg"><defs>"#));
        assert!(optimized.contains(r#"width="22" height="22""#));
        assert!(optimized.contains("linearGradient"));
    }

    #[test]
    fn unparsable_markup_is_an_optimizer_error() {
        let err = MarkupOptimizer
            .optimize("<svg><rect", &OptimizerConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("optimizer failure"));
    }

    #[test]
    fn export_falls_back_verbatim_on_optimizer_failure() {
        let state = CompositionState::default();
        let glyphs = GlyphLibrary::builtin();
        let doc = document(&state, &glyphs);

        let artifact = export_favicon(&doc, &FailingOptimizer);
        assert_eq!(artifact.contents, doc);
        assert_eq!(artifact.file_name, "favicon.svg");
        assert_eq!(artifact.content_type, "image/svg+xml");
    }

    #[test]
    fn export_uses_optimizer_output_on_success() {
        let state = CompositionState::default();
        let glyphs = GlyphLibrary::builtin();
        let doc = document(&state, &glyphs);

        let artifact = export_favicon(&doc, &MarkupOptimizer);
        assert_ne!(artifact.contents, doc);
        assert!(!artifact.contents.contains(r#"viewBox="0 0 32 32""#));
    }
}
