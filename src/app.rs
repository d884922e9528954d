use std::time::{Duration, Instant};

use ratatui::widgets::ListState;
use tracing::{debug, info};

use crate::config::{ClinicConfig, FeedConfig};
use crate::fetch::PageMsg;
use crate::loader::{FeedLoader, FeedView, PageRequester, SessionId};
use crate::source::FeedItem;

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Home,
    Services,
    Contact,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Services, Tab::Contact];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Services => "Services",
            Tab::Contact => "Contact",
        }
    }

    /// What the tab's feed calls its records, for status text.
    pub fn noun(self) -> &'static str {
        match self {
            Tab::Home => "articles",
            Tab::Services => "services",
            Tab::Contact => "details",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    fn is_feed(self) -> bool {
        matches!(self, Tab::Home | Tab::Services)
    }
}

/// One feed tab: its requester, the loader of the mounted session (if the
/// tab has been shown) and the list selection.
pub struct FeedPane<R> {
    requester: R,
    loader: Option<FeedLoader<R>>,
    pub list_state: ListState,
}

impl<R: PageRequester + Clone> FeedPane<R> {
    fn new(requester: R) -> Self {
        Self {
            requester,
            loader: None,
            list_state: ListState::default(),
        }
    }

    pub fn view(&self) -> Option<FeedView<'_>> {
        self.loader.as_ref().map(FeedLoader::current_view)
    }

    /// Snapshot and selection state together, for stateful rendering.
    pub fn parts(&mut self) -> (Option<FeedView<'_>>, &mut ListState) {
        (
            self.loader.as_ref().map(FeedLoader::current_view),
            &mut self.list_state,
        )
    }

    fn len(&self) -> usize {
        self.view().map_or(0, |v| v.items.len())
    }

    fn selected_item(&self) -> Option<&FeedItem> {
        let i = self.list_state.selected()?;
        self.view()?.items.get(i)
    }
}

pub struct App<R> {
    pub tab: Tab,
    home: FeedPane<R>,
    services: FeedPane<R>,
    /// Article opened from the Home tab.
    pub detail: Option<FeedItem>,
    pub clinic: ClinicConfig,
    feed: FeedConfig,
    next_session: SessionId,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
}

impl<R: PageRequester + Clone> App<R> {
    /// Build the app and mount the Home feed.
    pub fn new(feed: FeedConfig, clinic: ClinicConfig, articles: R, services: R) -> Self {
        let mut app = Self {
            tab: Tab::Home,
            home: FeedPane::new(articles),
            services: FeedPane::new(services),
            detail: None,
            clinic,
            feed,
            next_session: 1,
            quit: false,
            status: "Starting…".into(),
        };
        app.mount(Tab::Home);
        app
    }

    pub fn pane(&self, tab: Tab) -> Option<&FeedPane<R>> {
        match tab {
            Tab::Home => Some(&self.home),
            Tab::Services => Some(&self.services),
            Tab::Contact => None,
        }
    }

    pub fn pane_mut(&mut self, tab: Tab) -> Option<&mut FeedPane<R>> {
        match tab {
            Tab::Home => Some(&mut self.home),
            Tab::Services => Some(&mut self.services),
            Tab::Contact => None,
        }
    }

    /// Create a fresh loader for `tab`, discarding any previous session.
    fn mount(&mut self, tab: Tab) {
        let session = self.next_session;
        let page_size = self.feed.page_size;
        let window = self.feed.debounce_window();
        let Some(pane) = self.pane_mut(tab) else {
            return;
        };
        pane.list_state = ListState::default();
        pane.loader = Some(FeedLoader::initialize(
            session,
            page_size,
            window,
            pane.requester.clone(),
        ));
        self.next_session += 1;
        info!(tab = tab.title(), session, "feed mounted");
        self.status = format!("Loading {}…", tab.noun());
    }

    // -- tabs ----------------------------------------------------------------

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.detail = None;
        let unmounted = self.pane(tab).is_some_and(|p| p.loader.is_none());
        if unmounted {
            self.mount(tab);
        }
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.tab.next());
    }

    pub fn previous_tab(&mut self) {
        self.select_tab(self.tab.previous());
    }

    /// Tear down the current feed and start over from page 1.
    ///
    /// Outcomes still in flight for the old session are dropped when they
    /// arrive.
    pub fn refresh(&mut self) {
        if self.tab.is_feed() {
            self.detail = None;
            self.mount(self.tab);
        }
    }

    // -- fetch outcomes ------------------------------------------------------

    /// Route a fetch outcome to the loader that asked for it.
    ///
    /// The status line only reports outcomes for the tab on screen.
    pub fn handle_page(&mut self, msg: PageMsg) {
        let tab = msg.tab;
        let Some(loader) = self.pane_mut(tab).and_then(|p| p.loader.as_mut()) else {
            debug!(tab = tab.title(), "page for unmounted tab dropped");
            return;
        };
        if loader.session() != msg.session {
            debug!(
                tab = tab.title(),
                stale = msg.session,
                live = loader.session(),
                "page for torn-down session dropped"
            );
            return;
        }

        let status = match msg.outcome {
            Ok(items) if items.is_empty() => {
                loader.on_page_result(msg.page, items);
                format!("No more {} available", tab.noun())
            }
            Ok(items) => {
                let count = items.len();
                loader.on_page_result(msg.page, items);
                format!(
                    "Loaded page {} of {} ({count} items)",
                    loader.current_page(),
                    tab.noun()
                )
            }
            Err(e) => {
                let status = format!("Error loading {}: {e}", tab.noun());
                loader.on_page_error(msg.page, e);
                status
            }
        };
        if tab == self.tab {
            self.status = status;
        }
    }

    /// Drive every mounted loader's debounce.
    pub fn tick(&mut self, now: Instant) {
        for pane in [&mut self.home, &mut self.services] {
            if let Some(loader) = pane.loader.as_mut() {
                loader.tick(now);
            }
        }
    }

    /// Input poll timeout: `max`, shortened so a pending debounce fires on
    /// time.
    pub fn poll_timeout(&self, now: Instant, max: Duration) -> Duration {
        [&self.home, &self.services]
            .iter()
            .filter_map(|p| p.loader.as_ref()?.time_until_fire(now))
            .fold(max, Duration::min)
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self, now: Instant) {
        self.move_selection(now, |selected, len| match selected {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        });
    }

    pub fn select_previous(&mut self, now: Instant) {
        self.move_selection(now, |selected, _| selected.map_or(0, |i| i.saturating_sub(1)));
    }

    pub fn select_first(&mut self, now: Instant) {
        self.move_selection(now, |_, _| 0);
    }

    pub fn select_last(&mut self, now: Instant) {
        self.move_selection(now, |_, len| len - 1);
    }

    /// Apply `step` to the selection of the current feed, then fire the
    /// end-of-list signal if the selection is near the bottom.
    ///
    /// `step` is only called with a non-empty list.  On an empty list the
    /// move itself is a no-op but still counts as being at the end, which is
    /// how a failed first page gets retried.
    fn move_selection(&mut self, now: Instant, step: impl Fn(Option<usize>, usize) -> usize) {
        if self.detail.is_some() {
            return;
        }
        let threshold = self.feed.prefetch_threshold;
        let Some(pane) = self.pane_mut(self.tab) else {
            return;
        };
        let len = pane.len();
        let remaining = if len == 0 {
            0
        } else {
            let i = step(pane.list_state.selected(), len);
            pane.list_state.select(Some(i));
            len - i - 1
        };

        if remaining <= threshold {
            if let Some(loader) = pane.loader.as_mut() {
                loader.request_more(now);
            }
        }
    }

    // -- detail --------------------------------------------------------------

    /// Open the selected row: articles show in full, services report their
    /// link.
    pub fn open_selected(&mut self) {
        let tab = self.tab;
        let Some(item) = self.pane(tab).and_then(FeedPane::selected_item).cloned() else {
            return;
        };
        debug!(tab = tab.title(), id = item.id.as_str(), "open item");
        match tab {
            Tab::Home => self.detail = Some(item),
            Tab::Services => {
                self.status = match &item.url {
                    Some(url) => format!("{}: {url}", item.title),
                    None => format!("{}: no link available", item.title),
                };
            }
            Tab::Contact => {}
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }
}
