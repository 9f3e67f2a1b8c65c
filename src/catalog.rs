//! Icon catalog: named 24×24 stroke glyphs and name search.
//!
//! The catalog is an injectable capability behind the [`IconCatalog`] trait,
//! so the composition engine never depends on where glyph data comes from.
//! [`BuiltinCatalog`] embeds a curated set; a web frontend can substitute a
//! remote- or script-backed catalog without touching anything downstream.

use std::sync::OnceLock;

use thiserror::Error;

/// Fragment rendered when a glyph name is unknown: a centered circle covering
/// the 24×24 reference frame. The tool never renders nothing.
pub const FALLBACK_GLYPH: &str = r#"<circle cx="12" cy="12" r="10"/>"#;

/// Curated names shown when no search is active.
pub const DEFAULT_NAMES: [&str; 8] = [
    "house", "heart", "star", "user", "mail", "phone", "globe", "settings",
];

/// The backing catalog failed to enumerate its names.
///
/// Recovered by falling back to [`DEFAULT_NAMES`]; never surfaced to the user.
#[derive(Debug, Error)]
#[error("icon catalog unavailable: {0}")]
pub struct CatalogError(pub String);

// ============================================================================
// IconCatalog capability
// ============================================================================

/// An opaque provider of named glyph fragments.
///
/// Implementations return drawable-primitive markup authored in a 24×24
/// reference frame, without any `<svg>` wrapper or styling attributes.
pub trait IconCatalog {
    /// Resolves a canonical name to its glyph fragment, if known.
    fn resolve_by_name(&self, name: &str) -> Option<&str>;

    /// Enumerates every canonical name the catalog knows.
    ///
    /// May be expensive; callers cache the result for the session.
    fn list_all_names(&self) -> Result<Vec<String>, CatalogError>;
}

// ============================================================================
// Built-in catalog
// ============================================================================

/// Glyph fragments embedded in the binary, keyed by canonical name.
///
/// Sorted by name so lookup can binary-search.
const BUILTIN_GLYPHS: &[(&str, &str)] = &[
    ("anchor", r#"<circle cx="12" cy="5" r="3"/><line x1="12" y1="22" x2="12" y2="8"/><path d="M5 12H2a10 10 0 0 0 20 0h-3"/>"#),
    ("bell", r#"<path d="M18 8A6 6 0 0 0 6 8c0 7-3 9-3 9h18s-3-2-3-9"/><path d="M13.73 21a2 2 0 0 1-3.46 0"/>"#),
    ("bookmark", r#"<path d="m19 21-7-4-7 4V5a2 2 0 0 1 2-2h10a2 2 0 0 1 2 2z"/>"#),
    ("calendar", r#"<rect x="3" y="4" width="18" height="18" rx="2"/><line x1="16" y1="2" x2="16" y2="6"/><line x1="8" y1="2" x2="8" y2="6"/><line x1="3" y1="10" x2="21" y2="10"/>"#),
    ("camera", r#"<path d="M23 19a2 2 0 0 1-2 2H3a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h4l2-3h6l2 3h4a2 2 0 0 1 2 2z"/><circle cx="12" cy="13" r="4"/>"#),
    ("check", r#"<polyline points="20 6 9 17 4 12"/>"#),
    ("circle", r#"<circle cx="12" cy="12" r="10"/>"#),
    ("clock", r#"<circle cx="12" cy="12" r="10"/><polyline points="12 6 12 12 16 14"/>"#),
    ("cloud", r#"<path d="M18 10h-1.26A8 8 0 1 0 9 20h9a5 5 0 0 0 0-10z"/>"#),
    ("code", r#"<polyline points="16 18 22 12 16 6"/><polyline points="8 6 2 12 8 18"/>"#),
    ("compass", r#"<circle cx="12" cy="12" r="10"/><polygon points="16.24 7.76 14.12 14.12 7.76 16.24 9.88 9.88 16.24 7.76"/>"#),
    ("droplet", r#"<path d="M12 2.69l5.66 5.66a8 8 0 1 1-11.31 0z"/>"#),
    ("eye", r#"<path d="M1 12s4-8 11-8 11 8 11 8-4 8-11 8-11-8-11-8z"/><circle cx="12" cy="12" r="3"/>"#),
    ("feather", r#"<path d="M20.24 12.24a6 6 0 0 0-8.49-8.49L5 10.5V19h8.5z"/><line x1="16" y1="8" x2="2" y2="22"/><line x1="17.5" y1="15" x2="9" y2="15"/>"#),
    ("flag", r#"<path d="M4 15s1-1 4-1 5 2 8 2 4-1 4-1V3s-1 1-4 1-5-2-8-2-4 1-4 1z"/><line x1="4" y1="22" x2="4" y2="15"/>"#),
    ("folder", r#"<path d="M22 19a2 2 0 0 1-2 2H4a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h5l2 3h9a2 2 0 0 1 2 2z"/>"#),
    ("gift", r#"<polyline points="20 12 20 22 4 22 4 12"/><rect x="2" y="7" width="20" height="5"/><line x1="12" y1="22" x2="12" y2="7"/><path d="M12 7H7.5a2.5 2.5 0 0 1 0-5C11 2 12 7 12 7z"/><path d="M12 7h4.5a2.5 2.5 0 0 0 0-5C13 2 12 7 12 7z"/>"#),
    ("globe", r#"<circle cx="12" cy="12" r="10"/><path d="M2 12h20"/><path d="M12 2a15.3 15.3 0 0 1 4 10 15.3 15.3 0 0 1-4 10 15.3 15.3 0 0 1-4-10 15.3 15.3 0 0 1 4-10z"/>"#),
    ("heart", r#"<path d="M20.84 4.61a5.5 5.5 0 0 0-7.78 0L12 5.67l-1.06-1.06a5.5 5.5 0 0 0-7.78 7.78l1.06 1.06L12 21.23l7.78-7.78 1.06-1.06a5.5 5.5 0 0 0 0-7.78z"/>"#),
    ("house", r#"<path d="M3 10l9-7 9 7v10a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/><path d="M9 22V12h6v10"/>"#),
    ("key", r#"<path d="m21 2-2 2m-7.61 7.61a5.5 5.5 0 1 1-7.78 7.78 5.5 5.5 0 0 1 7.78-7.78zm0 0L15.5 7.5m0 0 3 3L22 7l-3-3z"/>"#),
    ("leaf", r#"<path d="M11 20A7 7 0 0 1 9.8 6.1C15.5 5 17 4.48 19 2c1 2 2 4.18 2 8 0 5.5-4.78 10-10 10z"/><path d="M2 21c0-3 1.85-5.36 5.08-6C9.5 14.52 12 13 13 12"/>"#),
    ("lock", r#"<rect x="3" y="11" width="18" height="11" rx="2"/><path d="M7 11V7a5 5 0 0 1 10 0v4"/>"#),
    ("mail", r#"<rect x="2" y="4" width="20" height="16" rx="2"/><path d="m22 7-10 6L2 7"/>"#),
    ("map-pin", r#"<path d="M21 10c0 7-9 13-9 13s-9-6-9-13a9 9 0 0 1 18 0z"/><circle cx="12" cy="10" r="3"/>"#),
    ("moon", r#"<path d="M21 12.79A9 9 0 1 1 11.21 3 7 7 0 0 0 21 12.79z"/>"#),
    ("music", r#"<path d="M9 18V5l12-2v13"/><circle cx="6" cy="18" r="3"/><circle cx="18" cy="16" r="3"/>"#),
    ("phone", r#"<path d="M22 16.92v3a2 2 0 0 1-2.18 2 19.79 19.79 0 0 1-8.63-3.07 19.5 19.5 0 0 1-6-6 19.79 19.79 0 0 1-3.07-8.67A2 2 0 0 1 4.11 2h3a2 2 0 0 1 2 1.72 12.84 12.84 0 0 0 .7 2.81 2 2 0 0 1-.45 2.11L8.09 9.91a16 16 0 0 0 6 6l1.27-1.27a2 2 0 0 1 2.11-.45 12.84 12.84 0 0 0 2.81.7A2 2 0 0 1 22 16.92z"/>"#),
    ("search", r#"<circle cx="11" cy="11" r="8"/><line x1="21" y1="21" x2="16.65" y2="16.65"/>"#),
    ("settings", r#"<path d="M12.22 2h-.44a2 2 0 0 0-2 2v.18a2 2 0 0 1-1 1.73l-.43.25a2 2 0 0 1-2 0l-.15-.08a2 2 0 0 0-2.73.73l-.22.38a2 2 0 0 0 .73 2.73l.15.1a2 2 0 0 1 1 1.72v.51a2 2 0 0 1-1 1.74l-.15.09a2 2 0 0 0-.73 2.73l.22.38a2 2 0 0 0 2.73.73l.15-.08a2 2 0 0 1 2 0l.43.25a2 2 0 0 1 1 1.73V20a2 2 0 0 0 2 2h.44a2 2 0 0 0 2-2v-.18a2 2 0 0 1 1-1.73l.43-.25a2 2 0 0 1 2 0l.15.08a2 2 0 0 0 2.73-.73l.22-.39a2 2 0 0 0-.73-2.73l-.15-.08a2 2 0 0 1-1-1.74v-.5a2 2 0 0 1 1-1.74l.15-.09a2 2 0 0 0 .73-2.73l-.22-.38a2 2 0 0 0-2.73-.73l-.15.08a2 2 0 0 1-2 0l-.43-.25a2 2 0 0 1-1-1.73V4a2 2 0 0 0-2-2z"/><circle cx="12" cy="12" r="3"/>"#),
    ("shield", r#"<path d="M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z"/>"#),
    ("smile", r#"<circle cx="12" cy="12" r="10"/><path d="M8 14s1.5 2 4 2 4-2 4-2"/><line x1="9" y1="9" x2="9.01" y2="9"/><line x1="15" y1="9" x2="15.01" y2="9"/>"#),
    ("star", r#"<polygon points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2"/>"#),
    ("sun", r#"<circle cx="12" cy="12" r="5"/><line x1="12" y1="1" x2="12" y2="3"/><line x1="12" y1="21" x2="12" y2="23"/><line x1="4.22" y1="4.22" x2="5.64" y2="5.64"/><line x1="18.36" y1="18.36" x2="19.78" y2="19.78"/><line x1="1" y1="12" x2="3" y2="12"/><line x1="21" y1="12" x2="23" y2="12"/><line x1="4.22" y1="19.78" x2="5.64" y2="18.36"/><line x1="18.36" y1="5.64" x2="19.78" y2="4.22"/>"#),
    ("tag", r#"<path d="M20.59 13.41l-7.17 7.17a2 2 0 0 1-2.83 0L2 12V2h10l8.59 8.59a2 2 0 0 1 0 2.82z"/><line x1="7" y1="7" x2="7.01" y2="7"/>"#),
    ("umbrella", r#"<path d="M23 12a11.05 11.05 0 0 0-22 0zm-5 7a3 3 0 0 1-6 0v-7"/>"#),
    ("user", r#"<path d="M20 21v-2a4 4 0 0 0-4-4H8a4 4 0 0 0-4 4v2"/><circle cx="12" cy="7" r="4"/>"#),
    ("wifi", r#"<path d="M5 12.55a11 11 0 0 1 14.08 0"/><path d="M1.42 9a16 16 0 0 1 21.16 0"/><path d="M8.53 16.11a6 6 0 0 1 6.95 0"/><line x1="12" y1="20" x2="12.01" y2="20"/>"#),
    ("zap", r#"<polygon points="13 2 3 14 12 14 11 22 21 10 12 10 13 2"/>"#),
];

/// The embedded glyph catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl IconCatalog for BuiltinCatalog {
    fn resolve_by_name(&self, name: &str) -> Option<&str> {
        BUILTIN_GLYPHS
            .binary_search_by_key(&name, |&(n, _)| n)
            .ok()
            .map(|i| BUILTIN_GLYPHS[i].1)
    }

    fn list_all_names(&self) -> Result<Vec<String>, CatalogError> {
        Ok(BUILTIN_GLYPHS.iter().map(|(n, _)| n.to_string()).collect())
    }
}

// ============================================================================
// Map-backed catalog
// ============================================================================

/// A catalog over an owned name→fragment map.
///
/// This is the remote-catalog seam: a frontend fetches glyph data however it
/// likes (bundled script, network, anything) and installs the snapshot here.
/// The composition engine sees the same [`IconCatalog`] either way.
#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    glyphs: std::collections::HashMap<String, String>,
}

impl MapCatalog {
    pub fn new(glyphs: std::collections::HashMap<String, String>) -> Self {
        Self { glyphs }
    }

    /// Builds a catalog from a JSON object of `{"name": "<fragment>"}` pairs.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl IconCatalog for MapCatalog {
    fn resolve_by_name(&self, name: &str) -> Option<&str> {
        self.glyphs.get(name).map(|s| s.as_str())
    }

    fn list_all_names(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.glyphs.keys().cloned().collect())
    }
}

// ============================================================================
// Search policy
// ============================================================================

/// How many matches a search may return.
///
/// The source tool never settled this (revisions capped at 50, showed all
/// with a notice, or had no cap), so it is a policy choice here rather than
/// hard-coded behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchLimit {
    /// Return every match.
    #[default]
    Unlimited,

    /// Return at most this many matches and report the overflow.
    Capped(usize),
}

/// Names matching a search, plus how many further matches were cut by the
/// active [`SearchLimit`] (for a "+N more" notice).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub names: Vec<String>,
    pub truncated: usize,
}

// ============================================================================
// GlyphLibrary
// ============================================================================

/// Session-level view over an [`IconCatalog`]: fallback resolution, the
/// curated default list, and cached substring search.
///
/// The full name listing is enumerated lazily on first search and reused for
/// the rest of the session. If enumeration fails, search degrades to the
/// curated defaults and retries on the next call.
///
/// # Example
///
/// ```
/// use gradicon::GlyphLibrary;
///
/// let glyphs = GlyphLibrary::builtin();
/// assert!(glyphs.resolve("house").contains("<path"));
///
/// let results = glyphs.matching("hea");
/// assert!(results.names.contains(&"heart".to_string()));
/// ```
pub struct GlyphLibrary {
    catalog: Box<dyn IconCatalog>,
    all_names: OnceLock<Vec<String>>,
}

impl GlyphLibrary {
    /// Creates a library over the embedded catalog.
    pub fn builtin() -> Self {
        Self::new(Box::new(BuiltinCatalog))
    }

    /// Creates a library over any catalog implementation.
    pub fn new(catalog: Box<dyn IconCatalog>) -> Self {
        Self {
            catalog,
            all_names: OnceLock::new(),
        }
    }

    /// Resolves a glyph name to its fragment, falling back to
    /// [`FALLBACK_GLYPH`] for unknown names.
    pub fn resolve(&self, name: &str) -> &str {
        self.catalog.resolve_by_name(name).unwrap_or(FALLBACK_GLYPH)
    }

    /// The curated default names shown when no search is active.
    pub fn default_names(&self) -> Vec<String> {
        DEFAULT_NAMES.iter().map(|n| n.to_string()).collect()
    }

    /// Searches with the default (unlimited) policy.
    pub fn matching(&self, query: &str) -> SearchResults {
        self.matching_with_limit(query, SearchLimit::default())
    }

    /// Returns every name whose lowercased form contains the lowercased,
    /// trimmed query as a substring. An empty query returns the defaults.
    pub fn matching_with_limit(&self, query: &str, limit: SearchLimit) -> SearchResults {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return SearchResults {
                names: self.default_names(),
                truncated: 0,
            };
        }

        let matches: Vec<String> = match self.cached_listing() {
            Some(names) => names
                .iter()
                .filter(|n| n.to_lowercase().contains(&needle))
                .cloned()
                .collect(),
            // Catalog unavailable: degrade to the curated defaults.
            None => DEFAULT_NAMES
                .iter()
                .filter(|n| n.contains(&needle))
                .map(|n| n.to_string())
                .collect(),
        };

        match limit {
            SearchLimit::Unlimited => SearchResults {
                names: matches,
                truncated: 0,
            },
            SearchLimit::Capped(cap) => {
                let truncated = matches.len().saturating_sub(cap);
                let mut names = matches;
                names.truncate(cap);
                SearchResults { names, truncated }
            }
        }
    }

    /// Small fixed-size markup for an icon-picker button.
    pub fn icon_button_markup(&self, name: &str) -> String {
        format!(
            r#"<svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">{}</svg>"#,
            self.resolve(name)
        )
    }

    /// Enumerates the catalog once per session; `None` while unavailable.
    fn cached_listing(&self) -> Option<&Vec<String>> {
        if self.all_names.get().is_none() {
            if let Ok(mut names) = self.catalog.list_all_names() {
                names.sort();
                let _ = self.all_names.set(names);
            }
        }
        self.all_names.get()
    }
}

// ============================================================================
// Tests
// ============================================================================
