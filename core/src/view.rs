//! View modules and deferred view loading
//!
//! A [`ViewModule`] is the unit a route resolves to: a named, serializable
//! record describing the materialized view. Routes may carry one directly or
//! defer construction to a [`ViewFactory`] invoked on first navigation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A materialized view module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModule {
    /// Display name of the view
    pub name: String,

    /// Additional metadata for the view
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ViewModule {
    /// Create a new view module with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add metadata to this view module
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Factory producing a view module on demand
///
/// Invoked at most once per route on the success path; the navigator caches
/// the produced module for the table's lifetime. A failed load caches
/// nothing, so a later navigation invokes the factory again.
#[async_trait]
pub trait ViewFactory: Send + Sync {
    /// Produce the view module
    async fn load(&self) -> anyhow::Result<ViewModule>;
}
