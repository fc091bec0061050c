use std::sync::Arc;

use shared::{
    domain::Category,
    protocol::{ListingSummary, PageRequest},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    catalog::CatalogService,
    config::EngineSettings,
    status_filter::{filter_by_tab, StatusTab},
};

/// Position of the next append-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page_number: u32,
    /// Cleared only by a page that explicitly reports itself as the last one.
    pub has_more: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page_number: 0,
            has_more: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading { reset: bool },
    Refreshing,
    Loaded,
}

/// What happened to one fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was applied; `received` items came back.
    Loaded { received: usize },
    /// The request was not issued (end of list, append already running, or inactive).
    Skipped,
    /// A later reset-fetch started while this one was in flight; its result was dropped.
    Superseded,
    /// The controller was deactivated before the response arrived.
    Discarded,
    /// The collaborator failed; items and cursor are unchanged.
    Failed(String),
}

#[derive(Debug)]
struct ListState {
    items: Vec<ListingSummary>,
    cursor: PageCursor,
    in_flight: usize,
    resetting: bool,
    refreshing: bool,
    loaded: bool,
    generation: u64,
    active: bool,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: PageCursor::default(),
            in_flight: 0,
            resetting: false,
            refreshing: false,
            loaded: false,
            generation: 0,
            active: true,
        }
    }
}

/// Infinite-scroll state for one category's listing screen.
///
/// The accumulated sequence is owned here and only changes through
/// [`reset_fetch`](Self::reset_fetch) and [`append_fetch`](Self::append_fetch).
/// Page failures are logged and swallowed so a bad page never tears down the list.
pub struct ListController {
    catalog: Arc<dyn CatalogService>,
    page_size: u32,
    sort: String,
    state: Mutex<ListState>,
}

impl ListController {
    pub fn new(catalog: Arc<dyn CatalogService>, page_size: u32, sort: impl Into<String>) -> Self {
        Self {
            catalog,
            page_size,
            sort: sort.into(),
            state: Mutex::new(ListState::default()),
        }
    }

    pub fn from_settings(catalog: Arc<dyn CatalogService>, settings: &EngineSettings) -> Self {
        Self::new(catalog, settings.page_size, settings.sort.clone())
    }

    pub fn category(&self) -> Category {
        self.catalog.category()
    }

    /// Requests page 0 and replaces the whole sequence on success.
    ///
    /// Never suppressed by an in-flight append; whichever reset was started last wins.
    pub async fn reset_fetch(&self) -> FetchOutcome {
        self.run_reset(false).await
    }

    /// Pull-to-refresh / screen re-focus: a reset-fetch reported as `Refreshing`.
    pub async fn refresh(&self) -> FetchOutcome {
        self.run_reset(true).await
    }

    /// Fetches the page under the cursor and appends it.
    ///
    /// Ids are not de-duplicated across pages.
    pub async fn append_fetch(&self) -> FetchOutcome {
        let (page, generation) = {
            let mut state = self.state.lock().await;
            if !state.active || !state.cursor.has_more || state.in_flight > 0 {
                debug!(
                    category = %self.category(),
                    has_more = state.cursor.has_more,
                    in_flight = state.in_flight,
                    "list: append skipped"
                );
                return FetchOutcome::Skipped;
            }
            state.in_flight += 1;
            (state.cursor.page_number, state.generation)
        };

        let result = self.catalog.fetch_page(&self.request(page)).await;

        let mut state = self.state.lock().await;
        state.in_flight -= 1;
        if !state.active {
            return FetchOutcome::Discarded;
        }
        if state.generation != generation {
            debug!(category = %self.category(), page, "list: append superseded by reset");
            return FetchOutcome::Superseded;
        }
        match result {
            Ok(response) => {
                let received = response.content.len();
                state.cursor.has_more = !response.is_last();
                state.cursor.page_number = page + 1;
                state.items.extend(response.content);
                state.loaded = true;
                info!(
                    category = %self.category(),
                    page,
                    received,
                    total = state.items.len(),
                    has_more = state.cursor.has_more,
                    "list: page appended"
                );
                FetchOutcome::Loaded { received }
            }
            Err(err) => {
                warn!(category = %self.category(), page, error = %err, "list: append failed");
                FetchOutcome::Failed(err.message)
            }
        }
    }

    /// Drops every response that arrives from now on. Requests already sent are not
    /// cancelled.
    pub async fn deactivate(&self) {
        self.state.lock().await.active = false;
    }

    pub async fn is_active(&self) -> bool {
        self.state.lock().await.active
    }

    pub async fn items(&self) -> Vec<ListingSummary> {
        self.state.lock().await.items.clone()
    }

    /// Loaded items narrowed to `tab`, in load order.
    pub async fn visible(&self, tab: &StatusTab) -> Vec<ListingSummary> {
        let state = self.state.lock().await;
        filter_by_tab(&state.items, tab, |item| item.status.as_deref())
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn cursor(&self) -> PageCursor {
        self.state.lock().await.cursor
    }

    pub async fn has_more(&self) -> bool {
        self.state.lock().await.cursor.has_more
    }

    pub async fn phase(&self) -> ListPhase {
        let state = self.state.lock().await;
        match (state.in_flight > 0, state.resetting, state.refreshing) {
            (true, true, true) => ListPhase::Refreshing,
            (true, true, false) => ListPhase::Loading { reset: true },
            (true, false, _) => ListPhase::Loading { reset: false },
            (false, _, _) if state.loaded => ListPhase::Loaded,
            _ => ListPhase::Idle,
        }
    }

    async fn run_reset(&self, refreshing: bool) -> FetchOutcome {
        let generation = {
            let mut state = self.state.lock().await;
            if !state.active {
                return FetchOutcome::Skipped;
            }
            state.generation += 1;
            state.in_flight += 1;
            state.resetting = true;
            state.refreshing = refreshing;
            state.generation
        };

        let result = self.catalog.fetch_page(&self.request(0)).await;

        let mut state = self.state.lock().await;
        state.in_flight -= 1;
        if !state.active {
            return FetchOutcome::Discarded;
        }
        if state.generation != generation {
            debug!(category = %self.category(), "list: reset superseded by a later reset");
            return FetchOutcome::Superseded;
        }
        state.resetting = false;
        state.refreshing = false;
        match result {
            Ok(response) => {
                let received = response.content.len();
                state.cursor = PageCursor {
                    page_number: 1,
                    has_more: !response.is_last(),
                };
                state.items = response.content;
                state.loaded = true;
                info!(
                    category = %self.category(),
                    received,
                    has_more = state.cursor.has_more,
                    refreshing,
                    "list: reset loaded"
                );
                FetchOutcome::Loaded { received }
            }
            Err(err) => {
                warn!(category = %self.category(), error = %err, "list: reset failed");
                FetchOutcome::Failed(err.message)
            }
        }
    }

    fn request(&self, page: u32) -> PageRequest {
        PageRequest {
            page,
            size: self.page_size,
            sort: self.sort.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
