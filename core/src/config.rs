//! Route configuration loading
//!
//! Routes are described by a static JSON document supplied once at startup.
//! Descriptors are ordered; registration order is preserved in the table.

use crate::error::{ConfigError, Result};
use crate::routes::{Route, RouteTable};
use crate::view::{ViewFactory, ViewModule};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Descriptor for a single route, as it appears in a route file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Path pattern
    pub path: String,

    /// Additional patterns resolving to this route
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Unique symbolic name
    pub name: String,

    /// Title of the materialized view; defaults to the route name
    #[serde(default)]
    pub title: Option<String>,

    /// Defer building the view until first navigation
    #[serde(default)]
    pub lazy: bool,
}

/// Ordered route configuration, the root of a route file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Route descriptors in registration order
    pub routes: Vec<RouteDescriptor>,
}

impl RoutesConfig {
    /// Load a route configuration from a JSON file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse a route configuration from a JSON string
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|err| {
            ConfigError::InvalidFormat {
                message: err.to_string(),
            }
            .into()
        })
    }

    /// Build a route table from the descriptors
    pub fn build_table(&self) -> Result<RouteTable> {
        let mut routes = Vec::with_capacity(self.routes.len());
        for descriptor in &self.routes {
            routes.push(descriptor.build());
        }
        Ok(RouteTable::register(routes)?)
    }
}

impl RouteDescriptor {
    fn build(&self) -> Route {
        let title = self.title.clone().unwrap_or_else(|| self.name.clone());
        let module = ViewModule::new(title);

        let mut route = if self.lazy {
            Route::with_loader(
                self.path.as_str(),
                self.name.as_str(),
                Arc::new(DescriptorViewFactory { module }),
            )
        } else {
            Route::new(self.path.as_str(), self.name.as_str(), module)
        };

        for alias in &self.aliases {
            route = route.with_alias(alias.as_str());
        }
        route
    }
}

/// Factory materializing a descriptor-defined view on first navigation
struct DescriptorViewFactory {
    module: ViewModule,
}

#[async_trait]
impl ViewFactory for DescriptorViewFactory {
    async fn load(&self) -> anyhow::Result<ViewModule> {
        Ok(self.module.clone())
    }
}
