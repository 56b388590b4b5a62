//! Pre-release checks on the local working copy.

use crate::domain::ReleaseTarget;
use crate::error::Result;
use crate::git::Repository;
use crate::ui::Reporter;

/// Decide whether the working copy may be released to `target`.
///
/// Checks run in order and stop at the first violation, which is reported
/// through `reporter` and returned as `Ok(false)`:
/// 1. the working copy has no uncommitted or untracked changes
/// 2. a supplied `tag` exists in the repository
/// 3. production and acceptance releases name a tag
/// 4. the checked-out branch is allowed for the target
///
/// # Returns
/// * `Ok(true)` - The release may proceed
/// * `Ok(false)` - A release policy was violated
/// * `Err` - The repository could not be read
pub fn check_sanity<R>(
    repo: &R,
    target: &ReleaseTarget,
    tag: Option<&str>,
    reporter: &dyn Reporter,
) -> Result<bool>
where
    R: Repository + ?Sized,
{
    reporter.info("Checking sanity...");

    let snapshot = repo.snapshot()?;

    if snapshot.is_dirty {
        reporter.error("Your GIT repository for this buildout is dirty");
        return Ok(false);
    }

    if let Some(tag) = tag {
        if !snapshot.has_tag(tag) {
            reporter.error(&format!("No such tag '{}' exists on repository!", tag));
            return Ok(false);
        }
    }

    if target.requires_tag() {
        if tag.is_none() {
            reporter.error(&format!(
                "No tag specified. Can only release tags to {}",
                target
            ));
            return Ok(false);
        }

        if !target.permits_branch(&snapshot.active_branch) {
            reporter.error(&format!(
                "Your GIT repository is on branch '{}'.\nTo release on {}, it should be on {}!",
                snapshot.active_branch.name,
                target,
                target.branch_policy()
            ));
            return Ok(false);
        }
    }

    reporter.success("sane!");
    Ok(true)
}
