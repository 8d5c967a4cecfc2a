//! Render a policy document to stdout.

use crate::error::{CliError, CliResult};
use flashpolicy_core::PolicyDocument;
use std::io::Write;

/// What to put in the rendered document.
#[derive(Debug, Default)]
pub struct RenderOptions {
    pub domains: Vec<String>,
    pub to_ports: Option<String>,
    pub secure: Option<bool>,
    pub no_access: bool,
    pub site_control: Option<String>,
}

/// Build the document described by `options`.
///
/// `no_access` cannot be combined with domains or a meta-policy. Without
/// any option the result is an empty policy.
pub fn build(options: &RenderOptions) -> CliResult<PolicyDocument> {
    if options.no_access {
        if !options.domains.is_empty() || options.site_control.is_some() {
            return Err(CliError::InvalidArgument(
                "--no-access cannot be combined with --domain or --site-control".to_string(),
            ));
        }
        return Ok(PolicyDocument::no_access());
    }

    let mut policy = PolicyDocument::new();
    if let Some(permitted) = &options.site_control {
        policy.try_site_control(permitted)?;
    }
    for domain in &options.domains {
        policy.allow_access_from(domain.clone(), options.to_ports.as_deref(), options.secure);
    }

    Ok(policy)
}

pub fn execute(options: &RenderOptions) -> CliResult<()> {
    let xml = build(options)?.to_bytes()?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&xml)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
