/// The branch a working copy has checked out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
}

impl BranchContext {
    /// Create a new branch context
    pub fn new(name: impl Into<String>) -> Self {
        BranchContext { name: name.into() }
    }

    /// Check if this is the mainline branch
    pub fn is_master(&self) -> bool {
        self.name == "master"
    }

    /// Check if this is a release branch.
    ///
    /// Matches on the literal prefix, so `releaseX` counts as well as
    /// `release-1.0` and `release/1.0`.
    pub fn is_release_branch(&self) -> bool {
        self.name.starts_with("release")
    }
}
