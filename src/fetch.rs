//! Background page fetching.
//!
//! A [`Dispatcher`] turns each [`PageRequest`] issued by a loader into one
//! tokio task that calls the [`ItemSource`] and sends the outcome back to
//! the UI thread over an [`mpsc`] channel as a [`PageMsg`].
//!
//! ## For contributors
//!
//! There is no cancellation: a request that has been dispatched always runs
//! to completion.  Outcomes carry the session of the loader that asked, and
//! the app drops those whose loader has since been torn down.

use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::app::Tab;
use crate::loader::{PageRequester, SessionId};
use crate::source::{FeedItem, FetchError, ItemSource};

/// A page fetch decided on by a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub session: SessionId,
    pub page: u32,
    pub per_page: u32,
}

/// Messages sent from fetch tasks to the UI thread.
#[derive(Debug)]
pub struct PageMsg {
    /// Tab whose loader asked for the page.
    pub tab: Tab,
    pub session: SessionId,
    pub page: u32,
    pub outcome: Result<Vec<FeedItem>, FetchError>,
}

/// Runs page requests for one tab's source on a tokio runtime.
#[derive(Clone)]
pub struct Dispatcher {
    tab: Tab,
    runtime: Handle,
    source: Arc<dyn ItemSource>,
    tx: mpsc::Sender<PageMsg>,
}

impl Dispatcher {
    pub fn new(
        tab: Tab,
        runtime: Handle,
        source: Arc<dyn ItemSource>,
        tx: mpsc::Sender<PageMsg>,
    ) -> Self {
        Self {
            tab,
            runtime,
            source,
            tx,
        }
    }
}

impl PageRequester for Dispatcher {
    fn request(&mut self, req: PageRequest) {
        let tab = self.tab;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            debug!(source = source.name(), page = req.page, "fetch start");
            let outcome = source.fetch_page(req.page, req.per_page).await;
            let msg = PageMsg {
                tab,
                session: req.session,
                page: req.page,
                outcome,
            };
            // If the receiver is gone the UI has exited; drop the result.
            if tx.send(msg).is_err() {
                trace!(page = req.page, "receiver gone, discarding page");
            }
        });
    }
}
