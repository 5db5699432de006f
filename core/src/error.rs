//! Error types and handling for Rudder Core

use thiserror::Error;

/// Result type alias for Rudder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Rudder Core
#[derive(Error, Debug)]
pub enum Error {
    /// Route registration errors
    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Nav(#[from] NavError),

    /// Session store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Route table registration errors
///
/// All variants are fatal to configuration load: a table with overlapping
/// patterns is never constructed.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Duplicate route path: {path}")]
    DuplicatePath { path: String },

    #[error("Duplicate route name: {name}")]
    DuplicateName { name: String },

    #[error("Duplicate route alias: {alias}")]
    DuplicateAlias { alias: String },
}

/// Navigation errors
///
/// None of these are fatal: the navigator leaves its state intact and the
/// caller decides whether to retry.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("No route matches path '{path}'")]
    RouteNotFound { path: String },

    #[error("No route named '{name}'")]
    NameNotFound { name: String },

    #[error("Missing value for path parameter ':{param}' of route '{name}'")]
    MissingParam { param: String, name: String },

    #[error("Failed to load view for route '{route}': {message}")]
    ModuleLoad { route: String, message: String },
}

/// Session store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unknown namespace: {namespace}")]
    UnknownNamespace { namespace: String },

    #[error("Unknown action '{action}' in namespace '{namespace}'")]
    UnknownAction { namespace: String, action: String },

    #[error("Unknown mutation '{mutation}' in namespace '{namespace}'")]
    UnknownMutation { namespace: String, mutation: String },

    #[error("Namespace '{namespace}' already registered")]
    DuplicateNamespace { namespace: String },

    #[error("Handler '{tag}' already registered in namespace '{namespace}'")]
    DuplicateHandler { namespace: String, tag: String },
}

/// Route configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Route file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid route configuration: {message}")]
    InvalidFormat { message: String },
}
