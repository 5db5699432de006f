//! Route table: immutable registry of routes with lookup queries

use super::route::{Route, RouteName};
use crate::error::RouteError;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable registry mapping path patterns and names to routes
///
/// Built once at startup from an ordered sequence of routes. Paths, names,
/// and aliases are each unique across the table; any overlap is rejected at
/// registration time. Absence on lookup is a normal outcome, not an error.
#[derive(Debug, Default)]
pub struct RouteTable {
    /// Routes in registration order
    entries: Vec<Arc<Route>>,
    /// Index of every path and alias pattern into `entries`
    by_pattern: HashMap<String, usize>,
    /// Index of every route name into `entries`
    by_name: HashMap<RouteName, usize>,
}

impl RouteTable {
    /// Build a table from an ordered sequence of routes
    ///
    /// Fails with a [`RouteError`] if any path, name, or alias collides with
    /// a previously registered entry.
    pub fn register(routes: impl IntoIterator<Item = Route>) -> Result<Self, RouteError> {
        let mut table = Self::default();
        for route in routes {
            table.insert(route)?;
        }
        Ok(table)
    }

    fn insert(&mut self, route: Route) -> Result<(), RouteError> {
        if self.by_name.contains_key(&route.name) {
            return Err(RouteError::DuplicateName {
                name: route.name.to_string(),
            });
        }
        if self.by_pattern.contains_key(&route.path) {
            return Err(RouteError::DuplicatePath {
                path: route.path.clone(),
            });
        }
        for alias in &route.aliases {
            // An alias may not shadow any existing pattern, including the
            // route's own path
            if *alias == route.path
                || self.by_pattern.contains_key(alias)
                || route.aliases.iter().filter(|a| *a == alias).count() > 1
            {
                return Err(RouteError::DuplicateAlias {
                    alias: alias.clone(),
                });
            }
        }

        let index = self.entries.len();
        self.by_pattern.insert(route.path.clone(), index);
        for alias in &route.aliases {
            self.by_pattern.insert(alias.clone(), index);
        }
        self.by_name.insert(route.name.clone(), index);
        self.entries.push(Arc::new(route));
        Ok(())
    }

    /// Look up a route by path or alias
    ///
    /// Exact path matches and alias matches share one index; registration
    /// guarantees they never overlap.
    pub fn lookup(&self, path: &str) -> Option<&Arc<Route>> {
        self.by_pattern.get(path).map(|&index| &self.entries[index])
    }

    /// Look up a route by its symbolic name
    pub fn lookup_by_name(&self, name: &str) -> Option<&Arc<Route>> {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    /// Iterate over routes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.entries.iter()
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewModule;

    fn home() -> Route {
        Route::new("/", "Home", ViewModule::new("Home")).with_alias("/home")
    }

    fn about() -> Route {
        Route::new("/about", "About", ViewModule::new("About"))
    }

    #[test]
    fn test_register_unique_routes() {
        let table = RouteTable::register([home(), about()]).unwrap();

        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_lookup_by_path_and_alias() {
        let table = RouteTable::register([home(), about()]).unwrap();

        assert_eq!(table.lookup("/").unwrap().name, RouteName::from("Home"));
        assert_eq!(table.lookup("/home").unwrap().name, RouteName::from("Home"));
        assert_eq!(
            table.lookup("/about").unwrap().name,
            RouteName::from("About")
        );
        assert!(table.lookup("/missing").is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        let table = RouteTable::register([home(), about()]).unwrap();

        assert_eq!(table.lookup_by_name("About").unwrap().path, "/about");
        assert!(table.lookup_by_name("Missing").is_none());
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let dup = Route::new("/", "Other", ViewModule::new("Other"));
        let err = RouteTable::register([home(), dup]).unwrap_err();

        assert!(matches!(err, RouteError::DuplicatePath { path } if path == "/"));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let dup = Route::new("/other", "Home", ViewModule::new("Other"));
        let err = RouteTable::register([home(), dup]).unwrap_err();

        assert!(matches!(err, RouteError::DuplicateName { name } if name == "Home"));
    }

    #[test]
    fn test_alias_colliding_with_path_rejected() {
        let dup = Route::new("/other", "Other", ViewModule::new("Other")).with_alias("/about");
        let err = RouteTable::register([home(), about(), dup]).unwrap_err();

        assert!(matches!(err, RouteError::DuplicateAlias { alias } if alias == "/about"));
    }

    #[test]
    fn test_alias_colliding_with_alias_rejected() {
        let dup = Route::new("/other", "Other", ViewModule::new("Other")).with_alias("/home");
        let err = RouteTable::register([home(), dup]).unwrap_err();

        assert!(matches!(err, RouteError::DuplicateAlias { alias } if alias == "/home"));
    }

    #[test]
    fn test_iteration_preserves_registration_order() {
        let table = RouteTable::register([home(), about()]).unwrap();
        let paths: Vec<_> = table.iter().map(|r| r.path.as_str()).collect();

        assert_eq!(paths, vec!["/", "/about"]);
    }
}
