//! Config validation command
//!
//! Loads a configuration file, validates it and lists the routes it serves.

use crate::error::CliResult;
use colored::Colorize;
use flashpolicy_config::{AppConfig, ConfigBuilder};
use std::path::Path;

/// Load and validate `path`. Environment overrides are not applied.
pub fn load(path: &Path) -> CliResult<AppConfig> {
    Ok(ConfigBuilder::new().file(path).build()?)
}

pub fn execute(path: &Path) -> CliResult<()> {
    let config = load(path)?;

    println!("{} {} is valid", "✓".green().bold(), path.display());
    println!("  listen: {}", config.server.bind_address());
    if config.policies.is_empty() {
        println!("  {}", "no policies configured, serving the no-access default".dimmed());
    }
    for route in config.routes() {
        let policy = route.build()?;
        println!(
            "  {} -> {} ({} element{})",
            route.path,
            route.view.name(),
            policy.len(),
            if policy.len() == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::io::Write;

    fn write_toml(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_toml(
            r#"
            [[policies]]
            path = "/crossdomain.xml"
            view = "simple"
            domains = ["a.com"]
            "#,
        );

        let config = load(file.path()).unwrap();
        assert_eq!(config.policies[0].view.name(), "simple");
    }

    #[test]
    fn test_load_invalid_config() {
        let file = write_toml(
            r#"
            [[policies]]
            path = "/crossdomain.xml"
            view = "metapolicy"
            permitted = "sometimes"
            "#,
        );

        assert!(matches!(load(file.path()), Err(CliError::Config(_))));
    }
}
