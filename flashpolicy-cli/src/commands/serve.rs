//! Run the policy server.

use crate::error::CliResult;
use flashpolicy_config::{AppConfig, ConfigBuilder, Validate};
use flashpolicy_log::info;
use std::path::PathBuf;

/// Settings from the command line. Flags win over the file and the
/// environment.
#[derive(Debug, Default)]
pub struct ServeOptions {
    pub config: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Resolve the effective configuration: `.env`, the file, `FLASHPOLICY_*`
/// variables, then flags.
pub fn resolve(options: &ServeOptions) -> CliResult<AppConfig> {
    let mut builder = ConfigBuilder::new().load_dotenv(None).load_env();
    if let Some(path) = &options.config {
        builder = builder.file(path);
    }
    let mut config = builder.build()?;

    if let Some(host) = &options.host {
        config.server.host = host.clone();
    }
    if let Some(port) = options.port {
        config.server.port = port;
    }
    config.validate()?;

    Ok(config)
}

pub async fn execute(options: &ServeOptions) -> CliResult<()> {
    let config = resolve(options)?;
    info!(
        "Starting flashpolicy with {} route(s)",
        config.routes().len()
    );
    flashpolicy_http::serve(&config).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::io::Write;

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"[server]\nhost = \"127.0.0.1\"\nport = 9000\n")
            .unwrap();

        let options = ServeOptions {
            config: Some(file.path().to_path_buf()),
            host: None,
            port: Some(9100),
        };

        let config = resolve(&options).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_zero_port_flag_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(b"[server]\nport = 9000\n").unwrap();

        let options = ServeOptions {
            config: Some(file.path().to_path_buf()),
            host: None,
            port: Some(0),
        };

        assert!(matches!(resolve(&options), Err(CliError::Config(_))));
    }
}
