//! Route definitions and the route table
//!
//! Routes map URL-like path patterns (plus aliases) to named views. The
//! table is built once from static configuration and is immutable afterwards
//! except for the memoized result of each route's deferred loader.

pub mod route;
pub mod table;

// Re-export commonly used types
pub use route::{Route, RouteName};
pub use table::RouteTable;
