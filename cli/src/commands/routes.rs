//! Routes command implementation

use anyhow::Result;
use rudder_core::RoutesConfig;
use std::path::Path;

/// List the routes registered in the route file
pub async fn routes_command(routes_file: &Path) -> Result<()> {
    let config = RoutesConfig::load(routes_file).await?;
    let table = config.build_table()?;

    for route in table.iter() {
        let aliases = if route.aliases.is_empty() {
            String::new()
        } else {
            format!("  (aliases: {})", route.aliases.join(", "))
        };
        let loading = if route.is_resolved() { "eager" } else { "lazy" };
        println!("{:<20} {:<20} {}{}", route.name.0, route.path, loading, aliases);
    }

    Ok(())
}
