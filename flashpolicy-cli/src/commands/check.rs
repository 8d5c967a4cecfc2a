//! Policy file validation command
//!
//! Parses a policy XML file and lists its elements.

use crate::error::CliResult;
use colored::Colorize;
use flashpolicy_core::{PolicyDocument, PolicyElement};
use std::fs;
use std::path::Path;

/// Read and parse the policy at `path`.
pub fn load(path: &Path) -> CliResult<PolicyDocument> {
    let xml = fs::read(path)?;
    Ok(PolicyDocument::parse(&xml)?)
}

/// One line per element, attributes in document order.
pub fn summarize(policy: &PolicyDocument) -> Vec<String> {
    policy.elements().iter().map(describe).collect()
}

fn describe(element: &PolicyElement) -> String {
    let attributes: Vec<String> = element
        .attributes()
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    format!("{} {}", element.tag_name(), attributes.join(" "))
}

pub fn execute(path: &Path) -> CliResult<()> {
    let policy = load(path)?;

    println!(
        "{} {} is a valid cross-domain policy ({} element{})",
        "✓".green().bold(),
        path.display(),
        policy.len(),
        if policy.len() == 1 { "" } else { "s" }
    );
    for line in summarize(&policy) {
        println!("  {}", line);
    }

    Ok(())
}
