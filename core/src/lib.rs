//! # Rudder Core
//!
//! Core library for Rudder - client-side navigation and session state for
//! single-page applications.
//!
//! This library provides the building blocks of a client navigation system:
//! an immutable route table with alias and reverse lookup, a navigator that
//! materializes views lazily and commits navigation state atomically, and a
//! namespaced session store whose writes are tag-dispatched and audited.

// Core modules
pub mod config;
pub mod error;
pub mod navigator;
pub mod routes;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use config::{RouteDescriptor, RoutesConfig};
pub use error::{Error, Result};
pub use navigator::{NavOutcome, NavigationState, Navigator};
pub use routes::{Route, RouteName, RouteTable};
pub use session::{CommitRecord, MutationCall, NamespaceBuilder, SessionStore};
pub use view::{ViewFactory, ViewModule};

/// Current version of the rudder-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the library
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
