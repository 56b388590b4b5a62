//! Git access layer
//!
//! The release checks only need a handful of read operations on a working
//! copy. They are expressed through the [Repository] trait so any backend
//! offering them can be substituted:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! ```rust
//! # use wagner::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> wagner::Result<()> {
//! let snapshot = repo.snapshot()?;
//! if !snapshot.is_dirty {
//!     println!("clean working copy on {}", snapshot.active_branch.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::io::Write;

use crate::domain::{BranchContext, RepositorySnapshot};
use crate::error::Result;

/// Read access to a local working copy.
///
/// ## Error Handling
///
/// Every method reports backend failures as `Err`. Callers treat those as
/// collaborator faults and propagate them; they are never release policy
/// decisions.
pub trait Repository: Send {
    /// Whether the index or working tree differs from HEAD.
    ///
    /// Untracked files count as changes; ignored files do not.
    fn is_dirty(&self) -> Result<bool>;

    /// Short name of the checked-out branch.
    ///
    /// # Returns
    /// * `Ok(name)` - e.g. `"master"`, also for a branch without commits yet
    /// * `Err` - If HEAD is detached
    fn active_branch(&self) -> Result<String>;

    /// Names of all tags in the repository
    fn tag_names(&self) -> Result<Vec<String>>;

    /// Describe the HEAD commit, like `git describe --always`.
    ///
    /// Yields the nearest annotated tag, decorated with the distance and the
    /// abbreviated commit id when HEAD is past it. Falls back to the
    /// abbreviated commit id when no tag is reachable.
    fn describe(&self) -> Result<String>;

    /// Write a tar archive of the tree at `treeish` (HEAD when `None`).
    ///
    /// Every entry path starts with `prefix`, the same way
    /// `git archive --prefix` builds it.
    fn archive(&self, treeish: Option<&str>, prefix: &str, out: &mut dyn Write) -> Result<()>;

    /// Take a fresh snapshot of the working copy state
    fn snapshot(&self) -> Result<RepositorySnapshot> {
        let active_branch = BranchContext::new(self.active_branch()?);
        let is_dirty = self.is_dirty()?;
        let available_tags = self.tag_names()?.into_iter().collect();

        Ok(RepositorySnapshot {
            is_dirty,
            active_branch,
            available_tags,
        })
    }
}
