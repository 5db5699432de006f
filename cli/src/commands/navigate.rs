//! Navigate command implementations

use anyhow::{Context, Result};
use rudder_core::{Navigator, RoutesConfig};
use std::collections::HashMap;
use std::path::Path;

/// Apply a sequence of path navigations and print the final state
pub async fn navigate_command(routes_file: &Path, paths: &[String]) -> Result<()> {
    let navigator = build_navigator(routes_file).await?;

    for path in paths {
        match navigator.navigate(path).await {
            Ok(outcome) => tracing::debug!(%path, ?outcome, "navigated"),
            // Navigation errors are not fatal; later entries still apply
            Err(err) => tracing::warn!(%path, error = %err, "navigation failed"),
        }
    }

    print_state(&navigator)
}

/// Navigate to a route by name and print the final state
pub async fn navigate_to_command(routes_file: &Path, name: &str, params: &[String]) -> Result<()> {
    let navigator = build_navigator(routes_file).await?;
    let params = parse_params(params)?;

    navigator
        .navigate_by_name(name, &params)
        .await
        .with_context(|| format!("cannot navigate to route '{name}'"))?;

    print_state(&navigator)
}

async fn build_navigator(routes_file: &Path) -> Result<Navigator> {
    let config = RoutesConfig::load(routes_file).await?;
    Ok(Navigator::new(config.build_table()?))
}

/// Parse `key=value` pairs into a parameter map
fn parse_params(params: &[String]) -> Result<HashMap<String, String>> {
    params
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| anyhow::anyhow!("invalid parameter '{pair}', expected key=value"))
        })
        .collect()
}

fn print_state(navigator: &Navigator) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&navigator.current_state())?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params() {
        let params = parse_params(&["id=42".to_string(), "tab=info".to_string()]).unwrap();

        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert_eq!(params.get("tab").map(String::as_str), Some("info"));
    }

    #[test]
    fn test_parse_params_rejects_bare_values() {
        assert!(parse_params(&["42".to_string()]).is_err());
    }
}
