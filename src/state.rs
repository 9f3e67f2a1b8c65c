//! Composition state: the full parameter set that determines a rendered favicon.
//!
//! A [`CompositionState`] is a plain value with no hidden mutable state. The UI
//! layer owns a single instance, mutates it on each input event, and hands it to
//! [`compose`](crate::compose::compose) to re-render. The same value serializes
//! to camelCase JSON for frontend/backend communication.
//!
//! # Example
//!
//! ```
//! use gradicon::CompositionState;
//!
//! let mut state = CompositionState::default();
//! state.background.angle = 90.0;
//! state.placement.size = 24.0;
//! state.center_icon();
//! assert_eq!(state.placement.x, 4.0);
//!
//! let json = state.to_json().unwrap();
//! let restored = CompositionState::from_json(&json).unwrap();
//! assert_eq!(restored, state);
//! ```

use serde::{Deserialize, Serialize};

/// Edge length of the favicon canvas, in canvas units.
pub const CANVAS_SIZE: f64 = 32.0;

/// Edge length of the reference frame library glyphs are authored in.
pub const GLYPH_FRAME: f64 = 24.0;

/// Formats a number the way the markup templates expect: integral values
/// print without a trailing `.0`, everything else uses the shortest
/// round-trippable form.
pub(crate) fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ============================================================================
// Background
// ============================================================================

/// Gradient-filled rounded-square background parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct BackgroundParams {
    /// First gradient stop color (offset 0).
    pub color1: String,

    /// Second gradient stop color (offset 1).
    pub color2: String,

    /// Gradient angle in degrees, `[0, 360)`. 0° points up, CSS convention.
    pub angle: f64,

    /// Corner radius in canvas units, `[0, CANVAS_SIZE / 2]`.
    pub radius: f64,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self {
            color1: "#3b82f6".to_string(),
            color2: "#8b5cf6".to_string(),
            angle: 315.0,
            radius: 4.0,
        }
    }
}

// ============================================================================
// Icon placement and stroke
// ============================================================================

/// Position, size and rotation of the icon frame within the canvas.
///
/// Overflow past the canvas bounds is permitted; the render surface clips
/// visually if at all. The engine does not clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconPlacement {
    pub x: f64,
    pub y: f64,

    /// Edge length of the (square) icon frame, in canvas units.
    pub size: f64,

    /// Rotation in degrees about the frame's visual center.
    pub rotation: f64,
}

impl IconPlacement {
    /// The rotation pivot: the visual center of the icon frame.
    pub fn pivot(&self) -> (f64, f64) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

impl Default for IconPlacement {
    fn default() -> Self {
        Self {
            x: 5.0,
            y: 5.0,
            size: 22.0,
            rotation: 0.0,
        }
    }
}

/// Line cap applied to stroked icon geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum StrokeLinecap {
    Butt,
    #[default]
    Round,
    Square,
}

impl StrokeLinecap {
    /// The attribute value emitted into markup.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Stroke styling for the icon.
///
/// `width` is defined relative to the icon's *native* reference frame (24
/// units for library glyphs), not its rendered size, so the control reads as
/// a consistent visual thickness at any size. The composition engine divides
/// it by the render scale; see
/// [`effective_stroke_width`](crate::compose::effective_stroke_width).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
    pub linecap: StrokeLinecap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "#f5f5f5".to_string(),
            width: 2.0,
            linecap: StrokeLinecap::Round,
        }
    }
}

// ============================================================================
// Icon source
// ============================================================================

/// The coordinate frame a vector fragment is authored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Parses a `viewBox` attribute value (`"minX minY width height"`).
    ///
    /// Returns `None` unless exactly four finite numbers are present.
    pub fn parse(attr: &str) -> Option<Self> {
        let parts: Vec<f64> = attr
            .split_whitespace()
            .filter_map(|s| s.parse::<f64>().ok())
            .collect();
        if parts.len() == 4 && parts.iter().all(|v| v.is_finite()) {
            Some(Self::new(parts[0], parts[1], parts[2], parts[3]))
        } else {
            None
        }
    }
}

impl Default for ViewBox {
    /// The library-glyph reference frame, `0 0 24 24`.
    fn default() -> Self {
        Self::new(0.0, 0.0, GLYPH_FRAME, GLYPH_FRAME)
    }
}

impl std::fmt::Display for ViewBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            fmt_num(self.min_x),
            fmt_num(self.min_y),
            fmt_num(self.width),
            fmt_num(self.height)
        )
    }
}

/// A user-supplied vector shape, normalized down to geometry.
///
/// Produced by [`normalize_upload`](crate::outline::normalize_upload).
/// Invariants enforced at ingestion: `primitives` is non-empty, and any
/// pre-existing fill/stroke/linecap/linejoin attributes have been stripped
/// (with `fill="none"` forced); they are never re-read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CustomOutline {
    /// The document's native coordinate frame.
    pub view_box: ViewBox,

    /// Serialized markup for each drawable primitive, in document order.
    pub primitives: Vec<String>,
}

/// Where the icon's geometry comes from.
///
/// The two variants are mutually exclusive: selecting a library glyph clears
/// any active custom outline and vice versa. [`CompositionState::select_glyph`]
/// and [`CompositionState::set_custom_outline`] maintain this by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum IconSource {
    /// A named glyph resolved through the icon catalog; 24×24 reference frame.
    Glyph { name: String },

    /// An uploaded outline with its own reference frame.
    Custom { outline: CustomOutline },
}

impl IconSource {
    /// Returns the glyph name if this is a library-glyph source.
    pub fn glyph_name(&self) -> Option<&str> {
        match self {
            Self::Glyph { name } => Some(name),
            Self::Custom { .. } => None,
        }
    }

    /// Returns the outline if this is a custom-outline source.
    pub fn custom_outline(&self) -> Option<&CustomOutline> {
        match self {
            Self::Glyph { .. } => None,
            Self::Custom { outline } => Some(outline),
        }
    }
}

impl Default for IconSource {
    fn default() -> Self {
        Self::Glyph {
            name: "house".to_string(),
        }
    }
}

// ============================================================================
// CompositionState
// ============================================================================

/// The aggregate parameter set: fully determines the rendered favicon.
///
/// Created once at tool start with the documented defaults, mutated in place
/// by user input events, and never destroyed for the page session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CompositionState {
    pub background: BackgroundParams,
    pub placement: IconPlacement,
    pub stroke: StrokeStyle,
    pub source: IconSource,
}

impl CompositionState {
    /// Creates a state with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a library glyph, clearing any active custom outline.
    pub fn select_glyph(&mut self, name: impl Into<String>) {
        self.source = IconSource::Glyph { name: name.into() };
    }

    /// Installs a custom outline, clearing any active glyph selection.
    pub fn set_custom_outline(&mut self, outline: CustomOutline) {
        self.source = IconSource::Custom { outline };
    }

    /// Centers the icon frame on the canvas for its current size.
    ///
    /// Deterministic and stateless: sets `x = y = (32 - size) / 2`.
    pub fn center_icon(&mut self) {
        let offset = (CANVAS_SIZE - self.placement.size) / 2.0;
        self.placement.x = offset;
        self.placement.y = offset;
    }

    /// Serializes the state to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the state to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a state from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_defaults() {
        let state = CompositionState::default();
        assert_eq!(state.background.color1, "#3b82f6");
        assert_eq!(state.background.color2, "#8b5cf6");
        assert_eq!(state.background.angle, 315.0);
        assert_eq!(state.background.radius, 4.0);
        assert_eq!(state.stroke.color, "#f5f5f5");
        assert_eq!(state.stroke.width, 2.0);
        assert_eq!(state.stroke.linecap, StrokeLinecap::Round);
        assert_eq!(state.placement.x, 5.0);
        assert_eq!(state.placement.y, 5.0);
        assert_eq!(state.placement.size, 22.0);
        assert_eq!(state.placement.rotation, 0.0);
        assert_eq!(state.source.glyph_name(), Some("house"));
    }

    #[test]
    fn select_glyph_clears_custom_outline() {
        let mut state = CompositionState::default();
        state.set_custom_outline(CustomOutline {
            view_box: ViewBox::default(),
            primitives: vec!["<path d=\"M0 0\" fill=\"none\"/>".to_string()],
        });
        assert!(state.source.custom_outline().is_some());

        state.select_glyph("star");
        assert_eq!(state.source.glyph_name(), Some("star"));
        assert!(state.source.custom_outline().is_none());
    }

    #[test]
    fn custom_outline_clears_glyph_selection() {
        let mut state = CompositionState::default();
        state.select_glyph("heart");

        state.set_custom_outline(CustomOutline {
            view_box: ViewBox::new(0.0, 0.0, 48.0, 48.0),
            primitives: vec!["<circle cx=\"24\" cy=\"24\" r=\"20\" fill=\"none\"/>".to_string()],
        });
        assert!(state.source.glyph_name().is_none());
        assert_eq!(
            state.source.custom_outline().unwrap().view_box,
            ViewBox::new(0.0, 0.0, 48.0, 48.0)
        );
    }

    #[test]
    fn center_icon_for_current_size() {
        let mut state = CompositionState::default();
        state.center_icon();
        assert_eq!(state.placement.x, 5.0);
        assert_eq!(state.placement.y, 5.0);

        state.placement.size = 16.0;
        state.center_icon();
        assert_eq!(state.placement.x, 8.0);
        assert_eq!(state.placement.y, 8.0);

        // Odd sizes land on half units, not clamped or rounded.
        state.placement.size = 21.0;
        state.center_icon();
        assert_eq!(state.placement.x, 5.5);
    }

    #[test]
    fn view_box_parse_and_display() {
        let vb = ViewBox::parse("0 0 24 24").unwrap();
        assert_eq!(vb, ViewBox::default());
        assert_eq!(vb.to_string(), "0 0 24 24");

        let vb = ViewBox::parse(" -4.5 0   100 50 ").unwrap();
        assert_eq!(vb.min_x, -4.5);
        assert_eq!(vb.to_string(), "-4.5 0 100 50");

        assert!(ViewBox::parse("0 0 24").is_none());
        assert!(ViewBox::parse("a b c d").is_none());
    }

    #[test]
    fn json_roundtrip_both_variants() {
        let mut state = CompositionState::default();
        let json = state.to_json().unwrap();
        assert!(json.contains("\"color1\":\"#3b82f6\""));
        assert!(json.contains("\"kind\":\"glyph\""));
        assert_eq!(CompositionState::from_json(&json).unwrap(), state);

        state.set_custom_outline(CustomOutline {
            view_box: ViewBox::default(),
            primitives: vec!["<path d=\"M2 2h20\" fill=\"none\"/>".to_string()],
        });
        let json = state.to_json().unwrap();
        assert!(json.contains("\"kind\":\"custom\""));
        assert!(json.contains("\"viewBox\""));
        assert_eq!(CompositionState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn linecap_attribute_values() {
        assert_eq!(StrokeLinecap::Butt.as_str(), "butt");
        assert_eq!(StrokeLinecap::Round.as_str(), "round");
        assert_eq!(StrokeLinecap::Square.as_str(), "square");
        // kebab-case over the wire
        let json = serde_json::to_string(&StrokeLinecap::Square).unwrap();
        assert_eq!(json, "\"square\"");
    }

    #[test]
    fn fmt_num_shortest_form() {
        assert_eq!(fmt_num(22.0), "22");
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(-3.0), "-3");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(2.0 / (22.0 / 24.0)), "2.1818181818181817");
    }
}
