//! Route definitions and utilities

use crate::error::NavError;
use crate::view::{ViewFactory, ViewModule};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Unique symbolic name for a route, used for reverse lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteName(pub String);

impl RouteName {
    /// Create a new route name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<&str> for RouteName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for RouteName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RouteName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Route definition mapping a path pattern to a named view
///
/// The view is either supplied up front or produced by a deferred factory on
/// first navigation. The resolved module transitions from unresolved to
/// resolved exactly once and is cached for the route's lifetime.
pub struct Route {
    /// Path pattern, unique key within the table. May contain `:param`
    /// segments substituted during navigate-by-name.
    pub path: String,

    /// Additional patterns resolving to this route
    pub aliases: Vec<String>,

    /// Unique symbolic identifier for this route
    pub name: RouteName,

    /// Additional metadata for the route
    pub metadata: HashMap<String, String>,

    /// Deferred view factory, absent when the view was supplied up front
    factory: Option<Arc<dyn ViewFactory>>,

    /// Memoized view module
    view: OnceCell<ViewModule>,
}

impl Route {
    /// Create a route whose view is available at registration time
    pub fn new(path: impl Into<String>, name: impl Into<RouteName>, view: ViewModule) -> Self {
        Self {
            path: path.into(),
            aliases: Vec::new(),
            name: name.into(),
            metadata: HashMap::new(),
            factory: None,
            view: OnceCell::new_with(Some(view)),
        }
    }

    /// Create a route whose view is produced by a deferred factory
    pub fn with_loader(
        path: impl Into<String>,
        name: impl Into<RouteName>,
        factory: Arc<dyn ViewFactory>,
    ) -> Self {
        Self {
            path: path.into(),
            aliases: Vec::new(),
            name: name.into(),
            metadata: HashMap::new(),
            factory: Some(factory),
            view: OnceCell::new(),
        }
    }

    /// Add an alias pattern for this route
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add metadata to this route
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether the view module has been materialized
    pub fn is_resolved(&self) -> bool {
        self.view.initialized()
    }

    /// Check whether the given path matches this route's path or an alias
    pub fn matches(&self, path: &str) -> bool {
        self.path == path || self.aliases.iter().any(|a| a == path)
    }

    /// Materialize the view module, invoking the deferred factory on first
    /// call and caching the result
    ///
    /// Concurrent callers share a single in-flight load. A failed load is
    /// not cached, so the next call invokes the factory again.
    pub async fn view(&self) -> Result<ViewModule, NavError> {
        if let Some(view) = self.view.get() {
            return Ok(view.clone());
        }

        let factory = self.factory.as_ref().ok_or_else(|| NavError::ModuleLoad {
            route: self.name.to_string(),
            message: "route has neither a view nor a loader".to_string(),
        })?;

        self.view
            .get_or_try_init(|| async {
                factory.load().await.map_err(|err| NavError::ModuleLoad {
                    route: self.name.to_string(),
                    message: format!("{err:#}"),
                })
            })
            .await
            .map(|view| view.clone())
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("aliases", &self.aliases)
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
