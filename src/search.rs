//! Debounced search-as-you-type.
//!
//! A filtering pass over the icon catalog only runs after a fixed quiescence
//! window elapses with no further keystrokes. Superseded requests are
//! discarded, never queued: the debouncer holds at most one pending query,
//! and every submission replaces it (latest request wins).
//!
//! Timestamps are caller-supplied monotonic milliseconds (a browser's
//! `performance.now()`), so the type works identically under wasm and in
//! native tests without a timer source.

/// Default quiescence window before a pending search runs.
pub const SEARCH_DEBOUNCE_MS: f64 = 250.0;

#[derive(Debug, Clone, PartialEq)]
struct Pending {
    query: String,
    token: u64,
    due_at: f64,
}

/// A cancellable, latest-request-wins search timer.
///
/// # Example
///
/// ```
/// use gradicon::SearchDebouncer;
///
/// let mut debouncer = SearchDebouncer::new(250.0);
/// debouncer.submit("hou", 0.0);
/// debouncer.submit("house", 100.0); // supersedes "hou"
///
/// assert_eq!(debouncer.poll(200.0), None); // window not yet elapsed
/// assert_eq!(debouncer.poll(350.0).as_deref(), Some("house"));
/// assert_eq!(debouncer.poll(400.0), None); // consumed
/// ```
#[derive(Debug, Default)]
pub struct SearchDebouncer {
    window_ms: f64,
    pending: Option<Pending>,
    next_token: u64,
}

impl SearchDebouncer {
    /// Creates a debouncer with the given quiescence window in milliseconds.
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            pending: None,
            next_token: 0,
        }
    }

    /// Submits a query at the given timestamp, replacing any pending one.
    ///
    /// Returns a token identifying this request; an older token becoming
    /// ready is impossible because its request no longer exists.
    pub fn submit(&mut self, query: impl Into<String>, now_ms: f64) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.pending = Some(Pending {
            query: query.into(),
            token,
            due_at: now_ms + self.window_ms,
        });
        token
    }

    /// Takes the pending query if its quiescence window has elapsed.
    ///
    /// Returns `None` while the window is still open or nothing is pending.
    pub fn poll(&mut self, now_ms: f64) -> Option<String> {
        match &self.pending {
            Some(p) if now_ms >= p.due_at => self.pending.take().map(|p| p.query),
            _ => None,
        }
    }

    /// Drops any pending request.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a request is waiting for its window to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The token of the pending request, if any.
    pub fn pending_token(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.token)
    }
}

// ============================================================================
// Tests
// ============================================================================
