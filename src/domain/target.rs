use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::BranchContext;

/// Environment a release is aimed at.
///
/// Production and acceptance carry branch and tag policies; every other
/// environment (test, dev, ...) is accepted as long as the working copy is
/// clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseTarget {
    Production,
    Acceptance,
    Other(String),
}

impl ReleaseTarget {
    /// Short environment code, as used in `autocheckout-<code>.cfg` and
    /// `buildout-<code>.cfg`
    pub fn code(&self) -> &str {
        match self {
            ReleaseTarget::Production => "prd",
            ReleaseTarget::Acceptance => "acc",
            ReleaseTarget::Other(code) => code,
        }
    }

    /// Whether a release to this target must name an existing tag
    pub fn requires_tag(&self) -> bool {
        matches!(self, ReleaseTarget::Production | ReleaseTarget::Acceptance)
    }

    /// Whether the given branch may be released to this target
    pub fn permits_branch(&self, branch: &BranchContext) -> bool {
        match self {
            ReleaseTarget::Production => branch.is_master(),
            ReleaseTarget::Acceptance => branch.is_master() || branch.is_release_branch(),
            ReleaseTarget::Other(_) => true,
        }
    }

    /// Human-readable description of the branches this target accepts
    pub fn branch_policy(&self) -> &'static str {
        match self {
            ReleaseTarget::Production => "'master'",
            ReleaseTarget::Acceptance => "'master' or on a release branch",
            ReleaseTarget::Other(_) => "any branch",
        }
    }
}

impl FromStr for ReleaseTarget {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let target = match s.to_ascii_lowercase().as_str() {
            "prd" | "production" => ReleaseTarget::Production,
            "acc" | "acceptance" => ReleaseTarget::Acceptance,
            _ => ReleaseTarget::Other(s.to_string()),
        };
        Ok(target)
    }
}

impl fmt::Display for ReleaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code().to_uppercase())
    }
}
