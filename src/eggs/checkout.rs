use std::fs;
use std::path::{Path, PathBuf};

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{BranchType, ErrorCode, Repository};

use crate::error::{Result, WagnerError};
use crate::ui::Reporter;

use super::CheckoutSpec;

/// Check out the eggs listed for `env` into `workdir`.
///
/// Each egg's line is looked up in `<autocheckout_dir>/autocheckout-<env>.cfg`.
/// An existing checkout in `<workdir>/<egg>` is reused, otherwise the egg is
/// cloned on its configured branch. The configured revision is then checked
/// out.
///
/// # Returns
/// * `Ok(dirs)` - The egg checkout directories, in the order of `eggs`
/// * `Err` - If an egg has no checkout line, or cloning or checkout fails
pub fn prepare_eggs(
    reporter: &dyn Reporter,
    eggs: &[String],
    env: &str,
    autocheckout_dir: &Path,
    workdir: &Path,
) -> Result<Vec<PathBuf>> {
    let cfg_path = autocheckout_dir.join(format!("autocheckout-{}.cfg", env));
    let cfg = fs::read_to_string(&cfg_path)
        .map_err(|e| WagnerError::egg(format!("Cannot read {}: {}", cfg_path.display(), e)))?;

    let mut dirs = Vec::with_capacity(eggs.len());

    for egg in eggs {
        let spec = CheckoutSpec::find(egg, &cfg).ok_or_else(|| {
            WagnerError::egg(format!("No checkout for {} in {}", egg, cfg_path.display()))
        })?;
        let dir = workdir.join(egg);

        let repo = if dir.is_dir() {
            Repository::open(&dir)?
        } else {
            reporter.info(&format!("Cloning {}, branch={}", egg, spec.rev));
            clone_egg(&spec, &dir)?
        };

        checkout_revision(&repo, &spec.rev)?;

        reporter.success(&format!("Prepared {}, branch={}", egg, spec.rev));
        dirs.push(dir);
    }

    Ok(dirs)
}

/// Clone `spec.url` into `dir` with `spec.rev` as the local branch.
///
/// Tags and commit ids are not branches, so for those the default branch is
/// cloned and the revision is left to `checkout_revision`.
fn clone_egg(spec: &CheckoutSpec, dir: &Path) -> Result<Repository> {
    let cloned = match RepoBuilder::new().branch(&spec.rev).clone(&spec.url, dir) {
        Err(e) if e.code() == ErrorCode::NotFound => {
            log::debug!("{} is not a branch of {}, cloning default branch", spec.rev, spec.url);
            if dir.exists() {
                fs::remove_dir_all(dir)?;
            }
            Repository::clone(&spec.url, dir)
        }
        result => result,
    };

    cloned.map_err(|e| WagnerError::egg(format!("Cannot clone {}: {}", spec.url, e)))
}

/// Check out `rev` in the working tree.
///
/// A local branch of that name becomes HEAD; anything else (remote branch,
/// tag, commit) leaves HEAD detached.
pub fn checkout_revision(repo: &Repository, rev: &str) -> Result<()> {
    let object = repo
        .revparse_single(rev)
        .or_else(|_| repo.revparse_single(&format!("origin/{}", rev)))
        .map_err(|e| WagnerError::egg(format!("Cannot find revision '{}': {}", rev, e)))?;

    let mut checkout = CheckoutBuilder::new();
    checkout.safe();
    repo.checkout_tree(&object, Some(&mut checkout))?;

    let local_branch = repo
        .find_branch(rev, BranchType::Local)
        .ok()
        .and_then(|branch| branch.get().name().map(|name| name.to_string()));

    match local_branch {
        Some(refname) => repo.set_head(&refname)?,
        None => repo.set_head_detached(object.peel_to_commit()?.id())?,
    }

    Ok(())
}
