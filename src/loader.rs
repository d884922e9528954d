//! Incremental page loading for one feed.
//!
//! [`FeedLoader`] owns a [`FeedState`] and is the only thing that mutates
//! it.  The UI reads [`FeedView`] snapshots and signals intent through
//! [`FeedLoader::request_more`]; page outcomes come back through
//! [`FeedLoader::on_page_result`] / [`FeedLoader::on_page_error`].
//!
//! ```text
//!  Idle(has_more) ──request_more + debounce──► Loading
//!  Loading ──non-empty page──► Idle(has_more)
//!  Loading ──error──────────► Idle(has_more)
//!  Loading ──empty page─────► Exhausted   (absorbing)
//! ```
//!
//! Duplicate fetches are prevented twice over: bursts of triggers collapse
//! in the [`Debouncer`] and the in-flight guard is checked both when a
//! trigger arrives and when the debounce fires.

use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::debounce::Debouncer;
use crate::fetch::PageRequest;
use crate::source::{FeedItem, FetchError};

/// Identifies one mounted loader.  Results tagged with a session that is no
/// longer live are dropped by the app.
pub type SessionId = u64;

/// Where a loader sends the fetches it decides to issue.
///
/// Must return immediately; the outcome is delivered later through the
/// loader's result callbacks.
pub trait PageRequester {
    fn request(&mut self, req: PageRequest);
}

/// Pagination state of one feed.
#[derive(Debug, Clone)]
pub struct FeedState {
    /// Every record received so far, in arrival order.
    items: Vec<FeedItem>,
    /// Page cursor; starts at 1, never decreases.
    current_page: u32,
    /// Whether `current_page` has actually been received.
    current_loaded: bool,
    /// Cleared for good by the first empty page.
    has_more: bool,
    /// Page of the outstanding fetch.
    in_flight: Option<u32>,
    /// Error of the most recent failed fetch, cleared when the next one starts.
    last_error: Option<FetchError>,
}

impl FeedState {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            current_loaded: false,
            has_more: true,
            in_flight: None,
            last_error: None,
        }
    }

    fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// A page that failed is requested again rather than skipped.
    fn next_page(&self) -> u32 {
        if self.current_loaded {
            self.current_page + 1
        } else {
            self.current_page
        }
    }
}

/// Read-only snapshot handed to the UI.
#[derive(Debug, Clone, Copy)]
pub struct FeedView<'a> {
    pub items: &'a [FeedItem],
    pub is_loading: bool,
    pub has_more: bool,
    pub last_error: Option<&'a FetchError>,
}

pub struct FeedLoader<R> {
    session: SessionId,
    page_size: NonZeroU32,
    state: FeedState,
    debounce: Debouncer,
    requester: R,
}

impl<R: PageRequester> FeedLoader<R> {
    /// Mount a fresh loader and immediately request page 1.
    pub fn initialize(
        session: SessionId,
        page_size: NonZeroU32,
        debounce_window: Duration,
        requester: R,
    ) -> Self {
        let mut loader = Self {
            session,
            page_size,
            state: FeedState::new(),
            debounce: Debouncer::new(debounce_window),
            requester,
        };
        loader.issue(1);
        loader
    }

    /// Signal that the user is near the end of the list.
    ///
    /// Ignored when the feed is exhausted or a fetch is outstanding.
    /// Otherwise (re)starts the debounce window; the fetch itself is issued
    /// by [`tick`](Self::tick).  Returns whether the signal was accepted.
    pub fn request_more(&mut self, now: Instant) -> bool {
        if !self.state.has_more || self.state.is_loading() {
            return false;
        }
        self.debounce.trigger(now);
        true
    }

    /// Drive the debounce.  Issues the next page fetch when the window has
    /// elapsed and the guard still allows it.  Returns whether a fetch was
    /// issued.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.debounce.fire(now) {
            return false;
        }
        if !self.state.has_more || self.state.is_loading() {
            return false;
        }
        let page = self.state.next_page();
        self.issue(page);
        true
    }

    fn issue(&mut self, page: u32) {
        debug!(session = self.session, page, "requesting page");
        self.state.in_flight = Some(page);
        self.state.last_error = None;
        self.requester.request(PageRequest {
            session: self.session,
            page,
            per_page: self.page_size.get(),
        });
    }

    /// A page arrived.  An empty page exhausts the feed permanently.
    pub fn on_page_result(&mut self, page: u32, items: Vec<FeedItem>) {
        if self.state.in_flight != Some(page) {
            debug!(session = self.session, page, "ignoring result for a page not in flight");
            return;
        }
        self.state.in_flight = None;

        if items.is_empty() {
            info!(session = self.session, page, total = self.state.items.len(), "feed exhausted");
            self.state.has_more = false;
            self.debounce.cancel();
            return;
        }

        debug!(session = self.session, page, count = items.len(), "page appended");
        self.state.items.extend(items);
        self.state.current_page = page;
        self.state.current_loaded = true;
    }

    /// A page failed.  Nothing but the loading flag changes, so the same page
    /// is requested again on the next trigger.
    pub fn on_page_error(&mut self, page: u32, error: FetchError) {
        if self.state.in_flight != Some(page) {
            debug!(session = self.session, page, "ignoring error for a page not in flight");
            return;
        }
        warn!(session = self.session, page, %error, "page fetch failed");
        self.state.in_flight = None;
        self.state.last_error = Some(error);
    }

    pub fn current_view(&self) -> FeedView<'_> {
        FeedView {
            items: &self.state.items,
            is_loading: self.state.is_loading(),
            has_more: self.state.has_more,
            last_error: self.state.last_error.as_ref(),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn current_page(&self) -> u32 {
        self.state.current_page
    }

    /// Time until a debounced fetch is due, if one is pending.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.debounce.time_until_fire(now)
    }

    #[cfg(test)]
    pub(crate) fn requester(&self) -> &R {
        &self.requester
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
