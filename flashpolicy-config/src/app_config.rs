// Server and policy configuration schema

use crate::{ConfigError, ConfigValidator, Result, Validate};
use flashpolicy_core::{AccessRule, HeaderAccessRule, PolicyDocument, PolicyElement, SiteControl};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Path served when no policies are configured.
pub const DEFAULT_POLICY_PATH: &str = "/crossdomain.xml";

pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8843;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub policies: Vec<PolicyRoute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, bracketing IPv6 literals.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// A policy served at one request path.
///
/// Serde cannot reject unknown keys through `flatten`; files loaded with
/// [`load_file`](crate::load_file) are checked with [`check_route_keys`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRoute {
    pub path: String,

    #[serde(flatten)]
    pub view: PolicyView,
}

impl PolicyRoute {
    pub fn new(path: impl Into<String>, view: PolicyView) -> Self {
        Self {
            path: path.into(),
            view,
        }
    }

    /// Build this route's document, tagging failures with the path.
    pub fn build(&self) -> Result<PolicyDocument> {
        self.view.build().map_err(|source| ConfigError::Policy {
            path: self.path.clone(),
            source,
        })
    }
}

/// How a route's policy document is produced.
///
/// Tagged by the `view` key in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum PolicyView {
    /// Full access for each listed domain.
    Simple {
        #[serde(default)]
        domains: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to_ports: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secure: Option<bool>,
    },
    /// `site-control` of `none`.
    NoAccess,
    /// A meta-policy, optionally followed by access rules.
    Metapolicy {
        permitted: String,
        #[serde(default)]
        domains: Vec<String>,
    },
    /// Every element spelled out.
    Custom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        site_control: Option<String>,
        #[serde(default)]
        access: Vec<AccessEntry>,
        #[serde(default)]
        headers: Vec<HeadersEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessEntry {
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_ports: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadersEntry {
    pub domain: String,
    pub headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

impl PolicyView {
    /// The `view` tag used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            PolicyView::Simple { .. } => "simple",
            PolicyView::NoAccess => "no-access",
            PolicyView::Metapolicy { .. } => "metapolicy",
            PolicyView::Custom { .. } => "custom",
        }
    }

    /// Keys a route with this view may carry besides `path` and `view`.
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            PolicyView::Simple { .. } => &["domains", "to_ports", "secure"],
            PolicyView::NoAccess => &[],
            PolicyView::Metapolicy { .. } => &["permitted", "domains"],
            PolicyView::Custom { .. } => &["site_control", "access", "headers"],
        }
    }

    /// Build a fresh document. Meta-policy strings are checked here.
    pub fn build(&self) -> flashpolicy_core::Result<PolicyDocument> {
        match self {
            PolicyView::Simple {
                domains,
                to_ports,
                secure,
            } => Ok(PolicyDocument::simple(
                domains.iter().cloned(),
                to_ports.as_deref(),
                *secure,
            )),
            PolicyView::NoAccess => Ok(PolicyDocument::no_access()),
            PolicyView::Metapolicy { permitted, domains } => {
                let permitted = permitted.parse::<SiteControl>()?;
                Ok(PolicyDocument::metapolicy(permitted, domains.iter().cloned()))
            }
            PolicyView::Custom {
                site_control,
                access,
                headers,
            } => {
                let mut policy = PolicyDocument::new();
                if let Some(permitted) = site_control {
                    policy.try_site_control(permitted)?;
                }
                for entry in access {
                    policy.push(PolicyElement::AllowAccessFrom(AccessRule {
                        domain: entry.domain.clone(),
                        to_ports: entry.to_ports.clone(),
                        secure: entry.secure,
                    }));
                }
                for entry in headers {
                    let mut rule = HeaderAccessRule::new(entry.domain.clone(), &entry.headers);
                    rule.secure = entry.secure;
                    policy.push(PolicyElement::AllowHttpRequestHeadersFrom(rule));
                }
                Ok(policy)
            }
        }
    }

    fn domains(&self) -> Vec<&str> {
        match self {
            PolicyView::Simple { domains, .. } | PolicyView::Metapolicy { domains, .. } => {
                domains.iter().map(String::as_str).collect()
            }
            PolicyView::NoAccess => Vec::new(),
            PolicyView::Custom {
                access, headers, ..
            } => access
                .iter()
                .map(|a| a.domain.as_str())
                .chain(headers.iter().map(|h| h.domain.as_str()))
                .collect(),
        }
    }
}

/// Reject keys in the raw `policies` entries that the parsed route's view
/// does not read.
pub fn check_route_keys(raw: &serde_json::Value, config: &AppConfig) -> Result<()> {
    let Some(entries) = raw.get("policies").and_then(serde_json::Value::as_array) else {
        return Ok(());
    };

    for (index, (entry, route)) in entries.iter().zip(&config.policies).enumerate() {
        let Some(keys) = entry.as_object() else {
            continue;
        };

        let mut expected = vec!["path", "view"];
        expected.extend_from_slice(route.view.keys());

        if let Some(unknown) = keys.keys().find(|key| !expected.contains(&key.as_str())) {
            return Err(ConfigError::DeserializationError(format!(
                "policies[{}] ({}): unknown key `{}` for view `{}`, expected one of: {}",
                index,
                route.path,
                unknown,
                route.view.name(),
                expected.join(", ")
            )));
        }
    }

    Ok(())
}

impl AppConfig {
    /// Configured routes, or a single no-access policy at
    /// [`DEFAULT_POLICY_PATH`] when none are configured.
    pub fn routes(&self) -> Vec<PolicyRoute> {
        if self.policies.is_empty() {
            vec![PolicyRoute::new(DEFAULT_POLICY_PATH, PolicyView::NoAccess)]
        } else {
            self.policies.clone()
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.server.host, "server.host")?;
        ConfigValidator::is_port(self.server.port, "server.port")?;

        let mut seen = HashSet::new();
        for (index, route) in self.policies.iter().enumerate() {
            let field = format!("policies[{}].path", index);
            ConfigValidator::is_path(&route.path, &field)?;
            if !seen.insert(route.path.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "{} '{}' is configured more than once",
                    field, route.path
                )));
            }

            for domain in route.view.domains() {
                ConfigValidator::not_empty(domain, &format!("policies[{}] domain", index))?;
            }

            if let PolicyView::Custom { headers, .. } = &route.view {
                for entry in headers {
                    if entry.headers.is_empty() {
                        return Err(ConfigError::ValidationError(format!(
                            "policies[{}] headers for {} cannot be empty",
                            index, entry.domain
                        )));
                    }
                }
            }

            route.build()?;
        }

        Ok(())
    }
}
