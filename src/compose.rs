//! The composition engine: a pure function from [`CompositionState`] to SVG.
//!
//! `compose` is synchronous, deterministic and total for any well-formed
//! state: identical input produces byte-identical markup. Out-of-range
//! numeric input is not rejected here; validation, if any, belongs to the
//! input-collection layer.
//!
//! # Example
//!
//! ```
//! use gradicon::{compose, CompositionState, GlyphLibrary};
//!
//! let state = CompositionState::default();
//! let glyphs = GlyphLibrary::builtin();
//! let fragment = compose(&state, &glyphs);
//! assert!(fragment.starts_with("<defs>"));
//! ```

use base64::{engine::general_purpose, Engine as _};

use crate::catalog::GlyphLibrary;
use crate::outline::restyle_primitive;
use crate::state::{fmt_num, CompositionState, CustomOutline, IconSource, GLYPH_FRAME};

/// MIME type of the composed artifact.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

const SVG_XMLNS: &str = "http://www.w3.org/2000/svg";

// ============================================================================
// Geometry
// ============================================================================

/// Computes the gradient's normalized endpoints from its angle.
///
/// The angle follows the CSS convention where 0°/360° points up, which this
/// system reproduces by offsetting −90° before projecting onto the unit
/// circle. Endpoints are percentages of the gradient's own bounding box,
/// rounded to integers, and point-symmetric about (50, 50).
pub fn gradient_endpoints(angle: f64) -> (f64, f64, f64, f64) {
    let r = (angle - 90.0).to_radians();
    let x1 = ((1.0 + r.cos()) * 50.0).round();
    let y1 = ((1.0 + r.sin()) * 50.0).round();
    let x2 = ((1.0 - r.cos()) * 50.0).round();
    let y2 = ((1.0 - r.sin()) * 50.0).round();
    (x1, y1, x2, y2)
}

/// Scales a configured stroke width so its rendered thickness stays constant
/// under resizing.
///
/// The configured width is defined against the icon's native reference frame
/// (`frame_w` × `frame_h`); the frame is rendered at `size` × `size`, so the
/// emitted width is the configured width divided by the render scale. For
/// non-square frames the scale is the smaller axis ratio, matching how the
/// frame fits inside its square wrapper.
pub fn effective_stroke_width(configured: f64, size: f64, frame_w: f64, frame_h: f64) -> f64 {
    let scale = (size / frame_w).min(size / frame_h);
    configured / scale
}

// ============================================================================
// Composition
// ============================================================================

/// Composes the favicon fragment: gradient defs, rounded background, icon frame.
///
/// Defs come first so the background's `url(#gradient)` reference resolves.
/// The rotation transform is pivoted at the icon's visual center and omitted
/// entirely when rotation is zero — no identity transform is emitted.
pub fn compose(state: &CompositionState, glyphs: &GlyphLibrary) -> String {
    let (x1, y1, x2, y2) = gradient_endpoints(state.background.angle);
    let defs = format!(
        r##"<defs><linearGradient id="gradient" x1="{}%" y1="{}%" x2="{}%" y2="{}%"><stop stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs>"##,
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2),
        state.background.color1,
        state.background.color2,
    );
    let background = format!(
        r##"<rect width="32" height="32" rx="{}" fill="url(#gradient)"/>"##,
        fmt_num(state.background.radius),
    );
    let icon = match &state.source {
        IconSource::Glyph { name } => compose_glyph_frame(state, glyphs.resolve(name)),
        IconSource::Custom { outline } => compose_custom_frame(state, outline),
    };
    format!("{defs}{background}{icon}")
}

/// A library glyph inherits stroke styling from its wrapper element.
fn compose_glyph_frame(state: &CompositionState, fragment: &str) -> String {
    let p = &state.placement;
    let width = effective_stroke_width(state.stroke.width, p.size, GLYPH_FRAME, GLYPH_FRAME);
    format!(
        r#"<svg x="{}" y="{}" width="{}" height="{}" viewBox="0 0 24 24" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="{}" stroke-linejoin="round"{} xmlns="{}">{}</svg>"#,
        fmt_num(p.x),
        fmt_num(p.y),
        fmt_num(p.size),
        fmt_num(p.size),
        state.stroke.color,
        fmt_num(width),
        state.stroke.linecap.as_str(),
        rotation_attr(state),
        SVG_XMLNS,
        fragment,
    )
}

/// A custom outline gets stroke styling re-attached on every primitive;
/// inheritance is not relied on because uploads may nest arbitrarily.
fn compose_custom_frame(state: &CompositionState, outline: &CustomOutline) -> String {
    let p = &state.placement;
    let width = effective_stroke_width(
        state.stroke.width,
        p.size,
        outline.view_box.width,
        outline.view_box.height,
    );
    let width = fmt_num(width);
    let content: String = outline
        .primitives
        .iter()
        .map(|prim| {
            restyle_primitive(prim, &state.stroke.color, &width, state.stroke.linecap.as_str())
        })
        .collect();
    format!(
        r#"<svg x="{}" y="{}" width="{}" height="{}" viewBox="{}" fill="none"{} xmlns="{}">{}</svg>"#,
        fmt_num(p.x),
        fmt_num(p.y),
        fmt_num(p.size),
        fmt_num(p.size),
        outline.view_box,
        rotation_attr(state),
        SVG_XMLNS,
        content,
    )
}

/// ` transform="rotate(deg cx cy)"`, or nothing at zero rotation.
fn rotation_attr(state: &CompositionState) -> String {
    if state.placement.rotation == 0.0 {
        return String::new();
    }
    let (cx, cy) = state.placement.pivot();
    format!(
        r#" transform="rotate({} {} {})""#,
        fmt_num(state.placement.rotation),
        fmt_num(cx),
        fmt_num(cy),
    )
}

// ============================================================================
// Document and favicon projection
// ============================================================================

/// Wraps the composed fragment in a standalone 32×32 root element.
///
/// This is the serialized form of the preview surface, used both for the
/// favicon data URI and as the export pipeline's input.
pub fn document(state: &CompositionState, glyphs: &GlyphLibrary) -> String {
    format!(
        r#"<svg xmlns="{}" width="32" height="32" viewBox="0 0 32 32">{}</svg>"#,
        SVG_XMLNS,
        compose(state, glyphs),
    )
}

/// Encodes a serialized document as a `data:` URI suitable for a page's icon
/// link. A derived, idempotent projection: unchanged input produces
/// byte-identical output.
pub fn favicon_data_uri(document: &str) -> String {
    format!(
        "data:{};base64,{}",
        SVG_CONTENT_TYPE,
        general_purpose::STANDARD.encode(document),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{StrokeLinecap, ViewBox};

    fn custom_state(view_w: f64, view_h: f64) -> CompositionState {
        let mut state = CompositionState::default();
        state.set_custom_outline(CustomOutline {
            view_box: ViewBox::new(0.0, 0.0, view_w, view_h),
            primitives: vec![
                r#"<path d="M4 4h16" fill="none"/>"#.to_string(),
                r#"<circle cx="12" cy="12" r="8" fill="none"/>"#.to_string(),
            ],
        });
        state
    }

    #[test]
    fn gradient_endpoints_cardinal_angles() {
        // 0° points up: start at bottom center, end at top center.
        assert_eq!(gradient_endpoints(0.0), (50.0, 0.0, 50.0, 100.0));
        assert_eq!(gradient_endpoints(90.0), (100.0, 50.0, 0.0, 50.0));
        assert_eq!(gradient_endpoints(180.0), (50.0, 100.0, 50.0, 0.0));
        assert_eq!(gradient_endpoints(270.0), (0.0, 50.0, 100.0, 50.0));
        // The default angle.
        assert_eq!(gradient_endpoints(315.0), (15.0, 15.0, 85.0, 85.0));
    }

    #[test]
    fn gradient_endpoints_point_symmetric_for_all_angles() {
        for deg in 0..360 {
            let (x1, y1, x2, y2) = gradient_endpoints(deg as f64);
            // Exact pre-rounding symmetry; each side rounds independently,
            // so allow one unit of drift.
            assert!((x1 + x2 - 100.0).abs() <= 1.0, "x sum off at {deg}");
            assert!((y1 + y2 - 100.0).abs() <= 1.0, "y sum off at {deg}");
        }
    }

    #[test]
    fn compose_is_deterministic_for_glyphs() {
        let state = CompositionState::default();
        let glyphs = GlyphLibrary::builtin();
        assert_eq!(compose(&state, &glyphs), compose(&state, &glyphs));
    }

    #[test]
    fn compose_is_deterministic_for_custom_outlines() {
        let state = custom_state(24.0, 24.0);
        let glyphs = GlyphLibrary::builtin();
        assert_eq!(compose(&state, &glyphs), compose(&state, &glyphs));
    }

    #[test]
    fn default_state_fragment_layout() {
        let state = CompositionState::default();
        let glyphs = GlyphLibrary::builtin();
        let fragment = compose(&state, &glyphs);

        // defs precede the background which precedes the icon frame.
        let defs_at = fragment.find("<defs>").unwrap();
        let rect_at = fragment.find("<rect").unwrap();
        let icon_at = fragment.find("<svg").unwrap();
        assert!(defs_at < rect_at && rect_at < icon_at);

        assert!(fragment.contains(r#"x1="15%" y1="15%" x2="85%" y2="85%""#));
        assert!(fragment.contains(r##"<stop stop-color="#3b82f6"/>"##));
        assert!(fragment.contains(r##"<stop offset="1" stop-color="#8b5cf6"/>"##));
        assert!(fragment.contains(r##"<rect width="32" height="32" rx="4" fill="url(#gradient)"/>"##));
        assert!(fragment.contains(r#"x="5" y="5" width="22" height="22""#));
        // 2 / (22 / 24)
        assert!(fragment.contains(r#"stroke-width="2.1818181818181817""#));
        assert!(fragment.contains(r#"stroke-linecap="round""#));
        // The house glyph itself.
        assert!(fragment.contains("M3 10l9-7 9 7"));
    }

    #[test]
    fn rotation_transform_omitted_at_zero() {
        let state = CompositionState::default();
        let glyphs = GlyphLibrary::builtin();
        assert!(!compose(&state, &glyphs).contains("transform="));
    }

    #[test]
    fn rotation_transform_pivots_at_icon_center() {
        let mut state = CompositionState::default();
        state.placement.rotation = 45.0;
        let glyphs = GlyphLibrary::builtin();
        // Pivot = (5 + 22/2, 5 + 22/2) = (16, 16).
        assert!(compose(&state, &glyphs).contains(r#" transform="rotate(45 16 16)""#));

        state.placement.rotation = -30.0;
        state.placement.x = 0.0;
        state.placement.size = 10.0;
        assert!(compose(&state, &glyphs).contains(r#" transform="rotate(-30 5 10)""#));
    }

    #[test]
    fn stroke_width_scales_inversely_with_size() {
        assert_eq!(effective_stroke_width(2.0, 24.0, 24.0, 24.0), 2.0);
        // Doubling the size halves the emitted width.
        assert_eq!(effective_stroke_width(2.0, 12.0, 24.0, 24.0), 4.0);
        assert_eq!(effective_stroke_width(2.0, 48.0, 24.0, 24.0), 1.0);
        // Non-square frames scale by the smaller axis ratio.
        assert_eq!(effective_stroke_width(2.0, 24.0, 48.0, 24.0), 4.0);
        assert_eq!(effective_stroke_width(2.0, 24.0, 24.0, 48.0), 4.0);
    }

    #[test]
    fn unknown_glyph_renders_fallback_circle() {
        let mut state = CompositionState::default();
        state.select_glyph("no-such-glyph");
        let glyphs = GlyphLibrary::builtin();
        assert!(compose(&state, &glyphs).contains(crate::catalog::FALLBACK_GLYPH));
    }

    #[test]
    fn custom_outline_uses_its_own_view_box() {
        let state = custom_state(48.0, 48.0);
        let glyphs = GlyphLibrary::builtin();
        let fragment = compose(&state, &glyphs);
        assert!(fragment.contains(r#"viewBox="0 0 48 48""#));
        // size 22 over a 48 frame: scale = 22/48, width = 2 / (22/48).
        let expected = fmt_num(2.0 / (22.0 / 48.0));
        assert!(fragment.contains(&format!(r#"stroke-width="{expected}""#)));
    }

    #[test]
    fn custom_outline_styles_every_primitive() {
        let mut state = custom_state(24.0, 24.0);
        state.stroke.linecap = StrokeLinecap::Square;
        let glyphs = GlyphLibrary::builtin();
        let fragment = compose(&state, &glyphs);
        assert_eq!(fragment.matches(r##"stroke="#f5f5f5""##).count(), 2);
        assert_eq!(fragment.matches(r#"stroke-linecap="square""#).count(), 2);
        assert_eq!(fragment.matches(r#"stroke-linejoin="round""#).count(), 2);
        // Wrapper carries no stroke attributes of its own, just fill="none".
        let wrapper_end = fragment.find("><path").unwrap();
        let wrapper = &fragment[fragment.find("<svg").unwrap()..wrapper_end];
        assert!(!wrapper.contains("stroke="));
    }

    #[test]
    fn custom_outline_non_square_frame_uses_min_axis_scale() {
        let state = custom_state(48.0, 24.0);
        let glyphs = GlyphLibrary::builtin();
        let fragment = compose(&state, &glyphs);
        // scale = min(22/48, 22/24) = 22/48.
        let expected = fmt_num(2.0 / (22.0 / 48.0));
        assert!(fragment.contains(&format!(r#"stroke-width="{expected}""#)));
    }

    #[test]
    fn document_wraps_fragment_in_root() {
        let state = CompositionState::default();
        let glyphs = GlyphLibrary::builtin();
        let doc = document(&state, &glyphs);
        assert!(doc.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32" viewBox="0 0 32 32">"#
        ));
        assert!(doc.ends_with("</svg>"));
        assert!(doc.contains(&compose(&state, &glyphs)));
    }

    #[test]
    fn favicon_data_uri_is_idempotent() {
        let state = CompositionState::default();
        let glyphs = GlyphLibrary::builtin();
        let doc = document(&state, &glyphs);
        let uri = favicon_data_uri(&doc);
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
        assert_eq!(uri, favicon_data_uri(&doc));
    }

    #[test]
    fn centered_icon_composes_with_half_unit_positions() {
        let mut state = CompositionState::default();
        state.placement.size = 21.0;
        state.center_icon();
        let glyphs = GlyphLibrary::builtin();
        let fragment = compose(&state, &glyphs);
        assert!(fragment.contains(r#"x="5.5" y="5.5" width="21" height="21""#));
    }
}
