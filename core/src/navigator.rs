//! Navigator: drives path resolution and view materialization
//!
//! The navigator owns the navigation state and is its only mutation point.
//! Resolution runs in four steps: look the path up in the route table,
//! materialize the view (awaiting a deferred loader when necessary), then
//! commit path and route name together. Commit is the single point where
//! state changes; it is never observed half-updated.
//!
//! Overlapping navigations follow last-writer-wins by commit order: each
//! call takes a ticket from a monotonic epoch counter, and a call whose
//! ticket is stale by commit time leaves the newer state in place.

use crate::error::NavError;
use crate::routes::{Route, RouteName, RouteTable};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Type alias for navigation operation results
pub type NavResult<T> = Result<T, NavError>;

/// Outcome of a navigate call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NavOutcome {
    /// State now reflects the requested path
    Committed,
    /// The requested path was already current; nothing changed
    AlreadyCurrent,
    /// A newer navigation committed while this one was loading
    Superseded,
}

/// Snapshot of the navigator's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    /// Last successfully resolved path, if any navigation has committed
    pub current_path: Option<String>,
    /// Name of the current route
    pub current_route: Option<RouteName>,
    /// True while a deferred loader is in flight
    pub pending: bool,
    /// Previously committed paths, most recent first
    pub history: Vec<String>,
}

impl NavigationState {
    fn new() -> Self {
        Self {
            current_path: None,
            current_route: None,
            pending: false,
            history: Vec::new(),
        }
    }
}

/// Whether a commit records the departed path or consumes a history entry
#[derive(Clone, Copy, PartialEq)]
enum HistoryOp {
    Push,
    Pop,
}

struct NavInner {
    state: NavigationState,
    max_history: usize,
}

impl NavInner {
    fn commit(&mut self, path: String, name: RouteName, op: HistoryOp) {
        match op {
            HistoryOp::Push => {
                // Record the departed path if it differs
                if let Some(prev) = &self.state.current_path {
                    if *prev != path {
                        self.state.history.insert(0, prev.clone());
                        if self.state.history.len() > self.max_history {
                            self.state.history.truncate(self.max_history);
                        }
                    }
                }
            }
            HistoryOp::Pop => {
                // Consume the entry we navigated back to, unless a competing
                // commit already reshaped the history
                if self.state.history.first().map(|p| p == &path).unwrap_or(false) {
                    self.state.history.remove(0);
                }
            }
        }

        self.state.current_path = Some(path);
        self.state.current_route = Some(name);
        self.state.pending = false;
    }
}

/// Main navigator struct that manages navigation state over a route table
pub struct Navigator {
    table: Arc<RouteTable>,
    inner: Mutex<NavInner>,
    epoch: AtomicU64,
}

impl Navigator {
    /// Create a new navigator over the given route table
    pub fn new(table: RouteTable) -> Self {
        Self {
            table: Arc::new(table),
            inner: Mutex::new(NavInner {
                state: NavigationState::new(),
                max_history: 50, // Default history limit
            }),
            epoch: AtomicU64::new(0),
        }
    }

    /// Set the maximum number of history entries to keep
    pub fn with_max_history(self, max_history: usize) -> Self {
        self.inner.lock().unwrap().max_history = max_history;
        self
    }

    /// Get the route table this navigator resolves against
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Get a read-only snapshot of the navigation state
    pub fn current_state(&self) -> NavigationState {
        self.inner.lock().unwrap().state.clone()
    }

    /// Navigate to a path
    ///
    /// On a miss the state is left fully untouched and the error returned.
    /// On a hit the view is materialized (invoking a deferred loader at most
    /// once) before path and route name are committed together.
    pub async fn navigate(&self, path: &str) -> NavResult<NavOutcome> {
        let route = self
            .table
            .lookup(path)
            .ok_or_else(|| NavError::RouteNotFound {
                path: path.to_string(),
            })?
            .clone();

        self.resolve(route, path.to_string(), HistoryOp::Push).await
    }

    /// Navigate to a route by name, substituting path parameters
    pub async fn navigate_by_name(
        &self,
        name: &str,
        params: &HashMap<String, String>,
    ) -> NavResult<NavOutcome> {
        let route = self
            .table
            .lookup_by_name(name)
            .ok_or_else(|| NavError::NameNotFound {
                name: name.to_string(),
            })?
            .clone();

        let path = substitute_params(&route.path, params, &route.name)?;
        self.resolve(route, path, HistoryOp::Push).await
    }

    /// Navigate back to the most recently departed path
    ///
    /// Returns `None` when the history is empty.
    pub async fn back(&self) -> NavResult<Option<NavOutcome>> {
        let target = {
            let inner = self.inner.lock().unwrap();
            inner.state.history.first().cloned()
        };
        let Some(path) = target else {
            return Ok(None);
        };

        let route = self
            .table
            .lookup(&path)
            .ok_or_else(|| NavError::RouteNotFound { path: path.clone() })?
            .clone();

        let outcome = self.resolve(route, path, HistoryOp::Pop).await?;
        Ok(Some(outcome))
    }

    /// Check whether there is a path to go back to
    pub fn can_go_back(&self) -> bool {
        !self.inner.lock().unwrap().state.history.is_empty()
    }

    async fn resolve(
        &self,
        route: Arc<Route>,
        path: String,
        op: HistoryOp,
    ) -> NavResult<NavOutcome> {
        // Re-navigating to the current path only re-confirms the view is
        // resolved; no loader call, no state change
        {
            let inner = self.inner.lock().unwrap();
            if inner.state.current_path.as_deref() == Some(path.as_str())
                && !inner.state.pending
                && route.is_resolved()
            {
                return Ok(NavOutcome::AlreadyCurrent);
            }
        }

        let ticket = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        if !route.is_resolved() {
            let mut inner = self.inner.lock().unwrap();
            if self.epoch.load(Ordering::SeqCst) == ticket {
                inner.state.pending = true;
            }
        }

        // The only suspension point: the lock is never held across it
        let view = match route.view().await {
            Ok(view) => view,
            Err(err) => {
                let mut inner = self.inner.lock().unwrap();
                if self.epoch.load(Ordering::SeqCst) == ticket {
                    inner.state.pending = false;
                }
                return Err(err);
            }
        };

        let mut inner = self.inner.lock().unwrap();
        if self.epoch.load(Ordering::SeqCst) != ticket {
            // A newer navigation committed while we were loading; its state
            // stands
            tracing::debug!(%path, "navigation superseded");
            return Ok(NavOutcome::Superseded);
        }

        inner.commit(path, route.name.clone(), op);
        tracing::debug!(
            path = %inner.state.current_path.as_deref().unwrap_or(""),
            route = %route.name,
            view = %view.name,
            "navigation committed"
        );
        Ok(NavOutcome::Committed)
    }
}

/// Substitute `:param` segments of a path pattern from the given values
fn substitute_params(
    pattern: &str,
    params: &HashMap<String, String>,
    name: &RouteName,
) -> NavResult<String> {
    if !pattern.contains(':') {
        return Ok(pattern.to_string());
    }

    let mut segments = Vec::new();
    for segment in pattern.split('/') {
        if let Some(param) = segment.strip_prefix(':') {
            let value = params.get(param).ok_or_else(|| NavError::MissingParam {
                param: param.to_string(),
                name: name.to_string(),
            })?;
            segments.push(value.as_str());
        } else {
            segments.push(segment);
        }
    }
    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ViewFactory, ViewModule};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct CountingFactory {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl ViewFactory for CountingFactory {
        async fn load(&self) -> anyhow::Result<ViewModule> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ViewModule::new("lazy"))
        }
    }

    struct GatedFactory {
        gate: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl ViewFactory for GatedFactory {
        async fn load(&self) -> anyhow::Result<ViewModule> {
            self.gate.notified().await;
            Ok(ViewModule::new("slow"))
        }
    }

    struct FlakyFactory {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl ViewFactory for FlakyFactory {
        async fn load(&self) -> anyhow::Result<ViewModule> {
            // Fails on the first call, succeeds afterwards
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                anyhow::bail!("backend unavailable");
            }
            Ok(ViewModule::new("flaky"))
        }
    }

    fn basic_table() -> RouteTable {
        RouteTable::register([
            Route::new("/", "Home", ViewModule::new("Home")).with_alias("/home"),
            Route::new("/about", "About", ViewModule::new("About")),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_navigate_and_not_found_scenario() {
        let nav = Navigator::new(basic_table());

        assert_eq!(
            nav.table().lookup("/home").unwrap().name,
            RouteName::from("Home")
        );

        nav.navigate("/about").await.unwrap();
        let state = nav.current_state();
        assert_eq!(state.current_route, Some(RouteName::from("About")));
        assert_eq!(state.current_path.as_deref(), Some("/about"));

        let err = nav.navigate("/missing").await.unwrap_err();
        assert!(matches!(err, NavError::RouteNotFound { .. }));

        // Prior state is left intact
        let state = nav.current_state();
        assert_eq!(state.current_route, Some(RouteName::from("About")));
        assert_eq!(state.current_path.as_deref(), Some("/about"));
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn test_navigate_via_alias() {
        let nav = Navigator::new(basic_table());

        nav.navigate("/home").await.unwrap();
        let state = nav.current_state();
        assert_eq!(state.current_route, Some(RouteName::from("Home")));
        assert_eq!(state.current_path.as_deref(), Some("/home"));
    }

    #[tokio::test]
    async fn test_navigate_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let table = RouteTable::register([Route::with_loader(
            "/lazy",
            "Lazy",
            Arc::new(CountingFactory {
                calls: calls.clone(),
            }),
        )])
        .unwrap();
        let nav = Navigator::new(table);

        assert_eq!(nav.navigate("/lazy").await.unwrap(), NavOutcome::Committed);
        let first = nav.current_state();

        assert_eq!(
            nav.navigate("/lazy").await.unwrap(),
            NavOutcome::AlreadyCurrent
        );
        assert_eq!(nav.current_state(), first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loader_failure_preserves_state_and_allows_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut routes = vec![Route::with_loader(
            "/flaky",
            "Flaky",
            Arc::new(FlakyFactory {
                calls: calls.clone(),
            }),
        )];
        routes.push(Route::new("/", "Home", ViewModule::new("Home")));
        let nav = Navigator::new(RouteTable::register(routes).unwrap());

        nav.navigate("/").await.unwrap();

        let err = nav.navigate("/flaky").await.unwrap_err();
        assert!(matches!(err, NavError::ModuleLoad { .. }));

        let state = nav.current_state();
        assert_eq!(state.current_path.as_deref(), Some("/"));
        assert!(!state.pending);

        // Retry is a caller decision; the second attempt succeeds
        assert_eq!(nav.navigate("/flaky").await.unwrap(), NavOutcome::Committed);
        assert_eq!(
            nav.current_state().current_route,
            Some(RouteName::from("Flaky"))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stale_load_does_not_overwrite_newer_commit() {
        let gate = Arc::new(Notify::new());
        let mut routes = vec![Route::with_loader(
            "/slow",
            "Slow",
            Arc::new(GatedFactory { gate: gate.clone() }),
        )];
        routes.push(Route::new("/about", "About", ViewModule::new("About")));
        let nav = Arc::new(Navigator::new(RouteTable::register(routes).unwrap()));

        let slow_nav = nav.clone();
        let task = tokio::spawn(async move { slow_nav.navigate("/slow").await });

        // Wait for the slow navigation to reach its loader
        for _ in 0..100 {
            if nav.current_state().pending {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(nav.current_state().pending);

        // A newer navigation commits while the slow load is in flight
        assert_eq!(nav.navigate("/about").await.unwrap(), NavOutcome::Committed);

        gate.notify_one();
        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, NavOutcome::Superseded);

        let state = nav.current_state();
        assert_eq!(state.current_route, Some(RouteName::from("About")));
        assert_eq!(state.current_path.as_deref(), Some("/about"));
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn test_navigate_by_name_with_params() {
        let table = RouteTable::register([
            Route::new("/users/:id", "User", ViewModule::new("User")),
            Route::new("/", "Home", ViewModule::new("Home")),
        ])
        .unwrap();
        let nav = Navigator::new(table);

        let params = HashMap::from([("id".to_string(), "42".to_string())]);
        nav.navigate_by_name("User", &params).await.unwrap();
        assert_eq!(
            nav.current_state().current_path.as_deref(),
            Some("/users/42")
        );

        let err = nav
            .navigate_by_name("User", &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, NavError::MissingParam { param, .. } if param == "id"));

        let err = nav
            .navigate_by_name("Missing", &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, NavError::NameNotFound { .. }));
    }

    #[tokio::test]
    async fn test_back_returns_to_previous_path() {
        let nav = Navigator::new(basic_table());

        nav.navigate("/").await.unwrap();
        nav.navigate("/about").await.unwrap();
        assert!(nav.can_go_back());

        let outcome = nav.back().await.unwrap();
        assert_eq!(outcome, Some(NavOutcome::Committed));

        let state = nav.current_state();
        assert_eq!(state.current_path.as_deref(), Some("/"));
        assert_eq!(state.current_route, Some(RouteName::from("Home")));
        assert!(state.history.is_empty());
        assert!(!nav.can_go_back());
    }

    #[tokio::test]
    async fn test_back_with_empty_history() {
        let nav = Navigator::new(basic_table());

        assert!(!nav.can_go_back());
        assert_eq!(nav.back().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let nav = Navigator::new(basic_table()).with_max_history(1);

        nav.navigate("/").await.unwrap();
        nav.navigate("/about").await.unwrap();
        nav.navigate("/home").await.unwrap();

        assert_eq!(nav.current_state().history, vec!["/about".to_string()]);
    }

    #[test]
    fn test_substitute_params_passthrough() {
        let name = RouteName::from("Plain");
        let path = substitute_params("/about", &HashMap::new(), &name).unwrap();
        assert_eq!(path, "/about");
    }
}
