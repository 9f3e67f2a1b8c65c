//! Browser glue for WASM environments.
//!
//! This module provides [`FaviconStudio`], the single stateful object a web
//! frontend talks to: it owns the [`CompositionState`], the glyph library and
//! the search debouncer, and projects every change into preview markup, the
//! page's favicon link, and the exported download.
//!
//! # Feature Flag
//!
//! Only available with the `web` feature enabled:
//!
//! ```toml
//! [dependencies]
//! gradicon = { version = "0.1", features = ["web"] }
//! ```
//!
//! # Example (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { FaviconStudio } from 'gradicon';
//!
//! await init();
//! const studio = new FaviconStudio();
//!
//! studio.setAngle(90);
//! studio.selectIcon('star');
//! preview.innerHTML = studio.previewSvg();
//! studio.syncFavicon(document);
//!
//! // Debounced search driven by performance.now()
//! input.oninput = () => studio.searchInput(input.value, performance.now());
//! setInterval(() => {
//!   const results = studio.searchPoll(performance.now());
//!   if (results) renderIconGrid(JSON.parse(results));
//! }, 50);
//! ```

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, Document, Url};

use crate::catalog::{GlyphLibrary, MapCatalog, SearchLimit};
use crate::compose;
use crate::export::{export_favicon, ExportArtifact, MarkupOptimizer};
use crate::outline::normalize_upload;
use crate::search::{SearchDebouncer, SEARCH_DEBOUNCE_MS};
use crate::state::{CompositionState, StrokeLinecap};

/// Id of the favicon `<link>` element this tool manages.
const FAVICON_LINK_ID: &str = "dynamic-favicon";

// ============================================================================
// FaviconStudio
// ============================================================================

/// The favicon composer's web-facing surface.
///
/// One instance lives for the page session. Every setter mutates the single
/// composition state; the frontend re-reads [`preview_svg`](Self::preview_svg)
/// and calls [`sync_favicon`](Self::sync_favicon) after each change.
#[wasm_bindgen]
pub struct FaviconStudio {
    state: CompositionState,
    glyphs: GlyphLibrary,
    debouncer: SearchDebouncer,
    search_limit: SearchLimit,
}

#[wasm_bindgen]
impl FaviconStudio {
    /// Creates a studio with the documented default state and the embedded
    /// glyph catalog.
    #[wasm_bindgen(constructor)]
    pub fn new() -> FaviconStudio {
        console_error_panic_hook::set_once();

        FaviconStudio {
            state: CompositionState::default(),
            glyphs: GlyphLibrary::builtin(),
            debouncer: SearchDebouncer::new(SEARCH_DEBOUNCE_MS),
            search_limit: SearchLimit::default(),
        }
    }

    // ---- Background parameters ----

    #[wasm_bindgen(js_name = "setColor1")]
    pub fn set_color1(&mut self, color: &str) {
        self.state.background.color1 = color.to_string();
    }

    #[wasm_bindgen(js_name = "setColor2")]
    pub fn set_color2(&mut self, color: &str) {
        self.state.background.color2 = color.to_string();
    }

    #[wasm_bindgen(js_name = "setAngle")]
    pub fn set_angle(&mut self, degrees: f64) {
        self.state.background.angle = degrees;
    }

    #[wasm_bindgen(js_name = "setRadius")]
    pub fn set_radius(&mut self, radius: f64) {
        self.state.background.radius = radius;
    }

    // ---- Icon parameters ----

    #[wasm_bindgen(js_name = "setIconColor")]
    pub fn set_icon_color(&mut self, color: &str) {
        self.state.stroke.color = color.to_string();
    }

    #[wasm_bindgen(js_name = "setStrokeWidth")]
    pub fn set_stroke_width(&mut self, width: f64) {
        self.state.stroke.width = width;
    }

    /// Sets the line cap from its attribute value; unknown values fall back
    /// to `round`.
    #[wasm_bindgen(js_name = "setLinecap")]
    pub fn set_linecap(&mut self, linecap: &str) {
        self.state.stroke.linecap = match linecap {
            "butt" => StrokeLinecap::Butt,
            "square" => StrokeLinecap::Square,
            _ => StrokeLinecap::Round,
        };
    }

    #[wasm_bindgen(js_name = "setPosition")]
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.state.placement.x = x;
        self.state.placement.y = y;
    }

    #[wasm_bindgen(js_name = "setSize")]
    pub fn set_size(&mut self, size: f64) {
        self.state.placement.size = size;
    }

    #[wasm_bindgen(js_name = "setRotation")]
    pub fn set_rotation(&mut self, degrees: f64) {
        self.state.placement.rotation = degrees;
    }

    /// Centers the icon frame on the canvas for its current size.
    #[wasm_bindgen(js_name = "centerIcon")]
    pub fn center_icon(&mut self) {
        self.state.center_icon();
    }

    // ---- Icon source ----

    /// Selects a library glyph, clearing any active custom outline.
    #[wasm_bindgen(js_name = "selectIcon")]
    pub fn select_icon(&mut self, name: &str) {
        self.state.select_glyph(name);
    }

    /// Ingests an uploaded file as the custom outline.
    ///
    /// On failure the prior state stays authoritative; the error message is
    /// user-facing (unsupported type, malformed document, or no drawable
    /// content).
    #[wasm_bindgen(js_name = "uploadCustom")]
    pub fn upload_custom(&mut self, mime: &str, bytes: &[u8]) -> Result<(), JsError> {
        let outline =
            normalize_upload(mime, bytes).map_err(|e| JsError::new(&e.to_string()))?;
        self.state.set_custom_outline(outline);
        Ok(())
    }

    /// Replaces the embedded glyph catalog with a fetched snapshot
    /// (a JSON object of name→fragment pairs).
    #[wasm_bindgen(js_name = "installCatalogJson")]
    pub fn install_catalog_json(&mut self, json: &str) -> Result<(), JsError> {
        let catalog = MapCatalog::from_json(json)
            .map_err(|e| JsError::new(&format!("invalid catalog JSON: {e}")))?;
        self.glyphs = GlyphLibrary::new(Box::new(catalog));
        Ok(())
    }

    // ---- State import/export ----

    /// The current composition state as JSON.
    #[wasm_bindgen(js_name = "stateJson")]
    pub fn state_json(&self) -> Result<String, JsError> {
        self.state
            .to_json()
            .map_err(|e| JsError::new(&format!("failed to serialize state: {e}")))
    }

    /// Replaces the composition state wholesale from JSON.
    #[wasm_bindgen(js_name = "applyStateJson")]
    pub fn apply_state_json(&mut self, json: &str) -> Result<(), JsError> {
        self.state = CompositionState::from_json(json)
            .map_err(|e| JsError::new(&format!("failed to parse state: {e}")))?;
        Ok(())
    }

    // ---- Rendering ----

    /// The composed fragment for the preview surface's innerHTML.
    #[wasm_bindgen(js_name = "previewSvg")]
    pub fn preview_svg(&self) -> String {
        compose::compose(&self.state, &self.glyphs)
    }

    /// The full serialized document (preview surface plus outer wrapper).
    #[wasm_bindgen(js_name = "documentSvg")]
    pub fn document_svg(&self) -> String {
        compose::document(&self.state, &self.glyphs)
    }

    /// The favicon data URI for the current state.
    #[wasm_bindgen(js_name = "faviconDataUri")]
    pub fn favicon_data_uri(&self) -> String {
        compose::favicon_data_uri(&self.document_svg())
    }

    /// Small fixed-size markup for an icon-picker button.
    #[wasm_bindgen(js_name = "iconButtonMarkup")]
    pub fn icon_button_markup(&self, name: &str) -> String {
        self.glyphs.icon_button_markup(name)
    }

    // ---- Search ----

    /// Caps search results at `cap` names; pass `null` for no cap.
    #[wasm_bindgen(js_name = "setSearchCap")]
    pub fn set_search_cap(&mut self, cap: Option<usize>) {
        self.search_limit = match cap {
            Some(n) => SearchLimit::Capped(n),
            None => SearchLimit::Unlimited,
        };
    }

    /// Records a keystroke; the filtering pass runs only after the debounce
    /// window elapses with no newer input.
    #[wasm_bindgen(js_name = "searchInput")]
    pub fn search_input(&mut self, query: &str, now_ms: f64) -> u64 {
        self.debouncer.submit(query, now_ms)
    }

    /// Runs the pending search if its window has elapsed.
    ///
    /// Returns the results as JSON (`{"names": [...], "truncated": n}`), or
    /// `null` when nothing is due.
    #[wasm_bindgen(js_name = "searchPoll")]
    pub fn search_poll(&mut self, now_ms: f64) -> Option<String> {
        let query = self.debouncer.poll(now_ms)?;
        let results = self.glyphs.matching_with_limit(&query, self.search_limit);
        serde_json::to_string(&results).ok()
    }

    /// The curated default names shown when no search is active, as JSON.
    #[wasm_bindgen(js_name = "defaultNames")]
    pub fn default_names(&self) -> String {
        serde_json::to_string(&self.glyphs.default_names()).unwrap_or_else(|_| "[]".to_string())
    }

    // ---- Favicon sync and download ----

    /// Installs the current favicon data URI on the page's icon link,
    /// creating `link#dynamic-favicon` in `<head>` if missing.
    #[wasm_bindgen(js_name = "syncFavicon")]
    pub fn sync_favicon(&self, document: &Document) -> Result<(), JsError> {
        let link = match document.get_element_by_id(FAVICON_LINK_ID) {
            Some(link) => link,
            None => {
                let link = document
                    .create_element("link")
                    .map_err(|_| JsError::new("failed to create favicon link"))?;
                link.set_id(FAVICON_LINK_ID);
                link.set_attribute("rel", "icon")
                    .map_err(|_| JsError::new("failed to set link rel"))?;
                let head = document
                    .head()
                    .ok_or_else(|| JsError::new("document has no head"))?;
                head.append_child(&link)
                    .map_err(|_| JsError::new("failed to attach favicon link"))?;
                link
            }
        };
        link.set_attribute("href", &self.favicon_data_uri())
            .map_err(|_| JsError::new("failed to set favicon href"))?;
        Ok(())
    }

    /// Exports the current document as `favicon.svg` and triggers a save.
    ///
    /// Optimizer failures fall back to the unoptimized markup; the transient
    /// object URL is revoked right after the save is triggered, on all paths.
    pub fn download(&self, document: &Document) -> Result<(), JsError> {
        let artifact = export_favicon(&self.document_svg(), &MarkupOptimizer);
        let url = object_url(&artifact)?;
        let result = trigger_save(document, &url, artifact.file_name);
        let _ = Url::revoke_object_url(&url);
        result
    }
}

impl Default for FaviconStudio {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Download plumbing
// ============================================================================

/// Packages an artifact as a Blob and mints a transient object URL for it.
fn object_url(artifact: &ExportArtifact) -> Result<String, JsError> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(&artifact.contents));
    let props = BlobPropertyBag::new();
    props.set_type(artifact.content_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &props)
        .map_err(|_| JsError::new("failed to create export blob"))?;
    Url::create_object_url_with_blob(&blob)
        .map_err(|_| JsError::new("failed to create object URL"))
}

/// Clicks a transient anchor pointing at the object URL.
fn trigger_save(document: &Document, url: &str, file_name: &str) -> Result<(), JsError> {
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| JsError::new("failed to create download anchor"))?
        .dyn_into()
        .map_err(|_| JsError::new("anchor element has unexpected type"))?;
    anchor.set_href(url);
    anchor.set_download(file_name);
    let body = document
        .body()
        .ok_or_else(|| JsError::new("document has no body"))?;
    body.append_child(&anchor)
        .map_err(|_| JsError::new("failed to attach download anchor"))?;
    anchor.click();
    anchor.remove();
    Ok(())
}
