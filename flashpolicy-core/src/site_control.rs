//! Meta-policy values for the `site-control` element.
//!
//! A meta-policy tells the player which other policy files on the same
//! host it may honour, in addition to the master policy at
//! `/crossdomain.xml`.

use crate::{PolicyError, Result};
use std::fmt;
use std::str::FromStr;

/// Value of the `permitted-cross-domain-policies` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteControl {
    /// Any policy file on the host is permitted
    All,
    /// Only policies served as `text/x-cross-domain-policy`
    ByContentType,
    /// Only policies named `crossdomain.xml` (FTP servers)
    ByFtpFilename,
    /// Only the master policy file
    MasterOnly,
    /// No policy files at all, including the master
    None,
    /// Like `None`, but only for the response carrying this value
    NoneThisResponse,
}

impl SiteControl {
    /// Every accepted meta-policy, in the order the DTD lists them.
    pub const ALL: [SiteControl; 6] = [
        SiteControl::All,
        SiteControl::ByContentType,
        SiteControl::ByFtpFilename,
        SiteControl::MasterOnly,
        SiteControl::None,
        SiteControl::NoneThisResponse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ByContentType => "by-content-type",
            Self::ByFtpFilename => "by-ftp-filename",
            Self::MasterOnly => "master-only",
            Self::None => "none",
            Self::NoneThisResponse => "none-this-response",
        }
    }
}

impl FromStr for SiteControl {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(SiteControl::as_str).collect();
                PolicyError::InvalidArgument(format!(
                    "'{}' is not a valid site-control value (expected one of: {})",
                    s,
                    allowed.join(", ")
                ))
            })
    }
}

impl fmt::Display for SiteControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
