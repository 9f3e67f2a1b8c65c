//! gradicon: client-side favicon composition.
//!
//! This crate turns a small parameter set — gradient background, corner
//! radius, and a centered, recolorable, rotatable stroke icon — into a
//! 32×32 SVG favicon. The icon comes from an embedded glyph catalog or from
//! an uploaded SVG outline normalized down to its geometry.
//!
//! The core is [`compose`]: a pure, synchronous function from
//! [`CompositionState`] to markup, re-evaluated on every control change.
//! Around it sit the glyph catalog, the upload normalizer, a debounced name
//! search, and an export pipeline that never fails (optimizer errors fall
//! back to the unoptimized markup).
//!
//! # Example
//!
//! ```
//! use gradicon::{compose, document, favicon_data_uri, CompositionState, GlyphLibrary};
//!
//! let mut state = CompositionState::default();
//! let glyphs = GlyphLibrary::builtin();
//!
//! state.select_glyph("star");
//! state.placement.rotation = 15.0;
//!
//! let fragment = compose(&state, &glyphs);      // preview innerHTML
//! let doc = document(&state, &glyphs);          // standalone favicon.svg
//! let href = favicon_data_uri(&doc);            // page icon link target
//! assert!(href.starts_with("data:image/svg+xml;base64,"));
//! # let _ = fragment;
//! ```
//!
//! # Custom outlines
//!
//! ```
//! use gradicon::{normalize_upload, CompositionState};
//!
//! let upload = br#"<svg viewBox="0 0 48 48"><path d="M4 24h40" fill="red"/></svg>"#;
//! let outline = normalize_upload("image/svg+xml", upload).unwrap();
//!
//! let mut state = CompositionState::default();
//! state.set_custom_outline(outline); // clears any glyph selection
//! ```
//!
//! For WASM frontends, enable the `web` feature and use
//! [`FaviconStudio`](crate::web::FaviconStudio).

mod catalog;
mod compose;
mod export;
mod outline;
mod search;
mod state;

#[cfg(feature = "web")]
pub mod web;

pub use catalog::{
    BuiltinCatalog, CatalogError, GlyphLibrary, IconCatalog, MapCatalog, SearchLimit,
    SearchResults, DEFAULT_NAMES, FALLBACK_GLYPH,
};
pub use compose::{
    compose, document, effective_stroke_width, favicon_data_uri, gradient_endpoints,
    SVG_CONTENT_TYPE,
};
pub use export::{
    export_favicon, ExportArtifact, MarkupOptimizer, Optimizer, OptimizerConfig, OptimizerError,
    EXPORT_FILE_NAME,
};
pub use outline::{normalize_svg, normalize_upload, OutlineError, SVG_MIME};
pub use state::{
    BackgroundParams, CompositionState, CustomOutline, IconPlacement, IconSource, StrokeLinecap,
    StrokeStyle, ViewBox, CANVAS_SIZE, GLYPH_FRAME,
};
pub use search::{SearchDebouncer, SEARCH_DEBOUNCE_MS};
