//! # Filter-URL Synchronization
//!
//! List pages keep their filters in the URL. The search and color inputs are debounced;
//! whenever a settled value changes, the candidate query is compared with the query the
//! URL currently encodes and a history-replacing navigation is issued only if they differ.
//! Typing "blue" and clearing it again within the debounce window therefore navigates
//! zero times.
//!
//! "Clear filters" skips the debounce: both inputs reset at once and the page navigates
//! straight to its bare route. The reset holds the same gate the sync task takes before
//! reading the inputs, so the task never observes one field cleared and the other stale.
//!
//! ## Structure
//!
//! - [`Navigator`]: the seam to the router (current query, replace)
//! - [`HistoryNavigator`]: in-process router that records navigations and publishes the
//!   active [`FilterState`] so pages can reload
//! - [`sync_target`]: the pure comparison
//! - [`FilterSync`]: two [`Debouncer`]s plus the task that applies [`sync_target`]

use crate::model::FilterState;
use edit_framework::Debouncer;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Router operations the synchronizer needs.
pub trait Navigator: Send + Sync {
    /// Query string of the current location, without the leading `?`.
    fn current_query(&self) -> String;

    /// Replaces the current history entry with `location`.
    fn replace(&self, location: &str);
}

/// The location to navigate to, or `None` when the URL already encodes `candidate`.
pub fn sync_target(route: &str, candidate: &FilterState, current_query: &str) -> Option<String> {
    if FilterState::from_query(current_query) == *candidate {
        None
    } else {
        Some(candidate.location(route))
    }
}

/// Router for a single page that keeps its history in memory.
pub struct HistoryNavigator {
    route: String,
    state: watch::Sender<FilterState>,
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    /// Starts at `route?initial_query`.
    pub fn new(route: impl Into<String>, initial_query: &str) -> Self {
        let (state, _) = watch::channel(FilterState::from_query(initial_query));
        Self {
            route: route.into(),
            state,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// The filter the URL currently encodes.
    pub fn current(&self) -> FilterState {
        self.state.borrow().clone()
    }

    pub fn location(&self) -> String {
        self.current().location(&self.route)
    }

    /// Notified after every navigation.
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.state.subscribe()
    }

    /// Every location navigated to, oldest first.
    pub fn navigations(&self) -> Vec<String> {
        self.history().clone()
    }

    fn history(&self) -> MutexGuard<'_, Vec<String>> {
        lock(&self.history)
    }
}

impl Navigator for HistoryNavigator {
    fn current_query(&self) -> String {
        self.state.borrow().to_query()
    }

    fn replace(&self, location: &str) {
        let query = location.split_once('?').map(|(_, q)| q).unwrap_or("");
        info!(%location, "Navigate");
        self.history().push(location.to_string());
        self.state.send_replace(FilterState::from_query(query));
    }
}

/// Debounced filter inputs bound to a page route.
pub struct FilterSync {
    route: String,
    search: Debouncer<String>,
    color: Debouncer<String>,
    navigator: Arc<dyn Navigator>,
    gate: Arc<Mutex<()>>,
    task: JoinHandle<()>,
}

impl FilterSync {
    /// Seeds both inputs from the current URL and starts the sync task.
    pub fn spawn(route: impl Into<String>, navigator: Arc<dyn Navigator>, delay: Duration) -> Self {
        let route = route.into();
        let initial = FilterState::from_query(&navigator.current_query());
        let search = Debouncer::spawn(initial.search, delay);
        let color = Debouncer::spawn(initial.color, delay);
        let gate = Arc::new(Mutex::new(()));

        let task = tokio::spawn(run_sync(
            route.clone(),
            search.subscribe(),
            color.subscribe(),
            navigator.clone(),
            gate.clone(),
        ));

        Self {
            route,
            search,
            color,
            navigator,
            gate,
            task,
        }
    }

    /// Feeds a keystroke into the search input.
    pub fn set_search(&self, value: impl Into<String>) {
        self.search.set(value.into());
    }

    /// Feeds a selection into the color input.
    pub fn set_color(&self, value: impl Into<String>) {
        self.color.set(value.into());
    }

    /// Resets both inputs and navigates to the bare route immediately.
    pub fn clear_filters(&self) {
        let _gate = lock(&self.gate);
        if !self.navigator.current_query().is_empty() {
            self.navigator.replace(&self.route);
        }
        self.search.set_now(String::new());
        self.color.set_now(String::new());
    }

    pub fn delay(&self) -> Duration {
        self.search.delay()
    }

    /// The latest (possibly unsettled) input values.
    pub fn inputs(&self) -> FilterState {
        FilterState::new(self.search.latest(), self.color.latest())
    }

    /// Stops the debouncers and waits for the sync task to finish.
    pub async fn shutdown(self) {
        let Self {
            search,
            color,
            task,
            ..
        } = self;
        drop(search);
        drop(color);
        let _ = task.await;
    }
}

async fn run_sync(
    route: String,
    mut search: watch::Receiver<String>,
    mut color: watch::Receiver<String>,
    navigator: Arc<dyn Navigator>,
    gate: Arc<Mutex<()>>,
) {
    loop {
        tokio::select! {
            changed = search.changed() => if changed.is_err() { break },
            changed = color.changed() => if changed.is_err() { break },
        }
        let _gate = lock(&gate);
        let candidate = FilterState::new(
            search.borrow_and_update().clone(),
            color.borrow_and_update().clone(),
        );
        match sync_target(&route, &candidate, &navigator.current_query()) {
            Some(location) => navigator.replace(&location),
            None => debug!(?candidate, "URL already up to date"),
        }
    }
    debug!(%route, "Filter sync stopped");
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_target_suppresses_equal_state() {
        let blue = FilterState::new("", "blue");

        assert_eq!(sync_target("/inventory", &blue, "color=blue"), None);
        assert_eq!(
            sync_target("/inventory", &blue, ""),
            Some("/inventory?color=blue".to_string())
        );
        assert_eq!(
            sync_target("/inventory", &FilterState::default(), "color=blue"),
            Some("/inventory".to_string())
        );
    }

    #[test]
    fn test_sync_target_ignores_parameter_order() {
        let state = FilterState::new("mug", "red");

        assert_eq!(sync_target("/products", &state, "color=red&q=mug"), None);
    }

    #[test]
    fn test_history_navigator_tracks_state() {
        let nav = HistoryNavigator::new("/inventory", "q=mug");
        assert_eq!(nav.current(), FilterState::new("mug", ""));

        nav.replace("/inventory?color=red");

        assert_eq!(nav.current_query(), "color=red");
        assert_eq!(nav.location(), "/inventory?color=red");
        assert_eq!(nav.navigations(), vec!["/inventory?color=red"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_input_navigates_once() {
        let nav = Arc::new(HistoryNavigator::new("/inventory", ""));
        let sync = FilterSync::spawn("/inventory", nav.clone(), Duration::from_millis(300));

        for prefix in ["m", "mu", "mug"] {
            sync.set_search(prefix);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(nav.navigations(), vec!["/inventory?q=mug"]);
        sync.shutdown().await;
    }
}
