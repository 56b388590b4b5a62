use std::collections::BTreeSet;

use super::BranchContext;

/// Read-only view of a working copy, taken fresh for every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    /// Uncommitted or untracked changes present
    pub is_dirty: bool,
    pub active_branch: BranchContext,
    pub available_tags: BTreeSet<String>,
}

impl RepositorySnapshot {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.available_tags.contains(tag)
    }
}
