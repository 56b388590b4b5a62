//! Release workflow orchestration
//!
//! Strings the helpers together the way a release script does: refuse early
//! when the working copy is not releasable, then pack, upload and install
//! the buildout and its eggs.

use std::path::Path;

use crate::config::Config;
use crate::dist::{create_buildout_dist, upload_buildout};
use crate::domain::ReleaseTarget;
use crate::eggs::{prepare_eggs, summarize, upload_buildout_cfg, upload_eggs, EggBuilder};
use crate::error::Result;
use crate::git::Repository;
use crate::remote::{Invocation, LocalRunner, Remote, RemoteCommand, Virtualenv};
use crate::sanity::check_sanity;
use crate::ui::Reporter;
use crate::version::resolve_version;

/// Arguments for the release workflow
///
/// Mirrors the CLI arguments but does not depend on clap, so the workflow
/// can be driven programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    pub target: ReleaseTarget,

    /// Tag to release; HEAD is released when absent
    pub tag: Option<String>,

    /// Stop after the checks and version resolution
    pub dry_run: bool,
}

/// How a release workflow ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The sanity check failed; nothing was touched
    Refused,
    /// Checks passed, nothing was uploaded
    DryRun { version: String },
    Released { version: String },
}

/// Collaborators the workflow runs against
pub struct ReleaseContext<'a> {
    pub repo: &'a dyn Repository,
    pub remote: &'a dyn Remote,
    pub runner: &'a dyn LocalRunner,
    pub reporter: &'a dyn Reporter,
}

/// Main release workflow
///
/// 1. Check the working copy may be released to the target
/// 2. Check out the configured eggs
/// 3. Pack and upload the buildout
/// 4. Build and upload the eggs, then the pinned `buildout.cfg`
/// 5. Optionally run `bin/buildout` in the env user's virtualenv
/// 6. Report a summary
pub fn run_release(
    args: &ReleaseArgs,
    config: &Config,
    ctx: &ReleaseContext<'_>,
) -> Result<ReleaseOutcome> {
    let tag = args.tag.as_deref();
    let deploy = &config.deploy;

    if !check_sanity(ctx.repo, &args.target, tag, ctx.reporter)? {
        return Ok(ReleaseOutcome::Refused);
    }

    if args.dry_run {
        let version = resolve_version(ctx.repo, tag, ctx.reporter)?;
        return Ok(ReleaseOutcome::DryRun { version });
    }

    let egg_dirs = if deploy.eggs.is_empty() {
        Vec::new()
    } else {
        prepare_eggs(
            ctx.reporter,
            &deploy.eggs,
            args.target.code(),
            &deploy.autocheckout_dir,
            &deploy.workdir,
        )?
    };

    let dist = create_buildout_dist(ctx.repo, tag, ctx.reporter)?;
    let uploaded = upload_buildout(
        ctx.remote,
        ctx.reporter,
        &dist.path,
        &deploy.env_home,
        &deploy.env_user,
    );
    remove_dist(&dist.path);
    uploaded?;

    let builder = EggBuilder::new(ctx.runner, &deploy.python);
    upload_eggs(
        ctx.remote,
        ctx.reporter,
        &builder,
        &egg_dirs,
        &deploy.egg_dest(),
        &deploy.py_version,
        &deploy.env_user,
    )?;
    upload_buildout_cfg(
        ctx.remote,
        &builder,
        args.target.code(),
        &deploy.env_user,
        &deploy.env_home,
        &egg_dirs,
        &dist.version,
    )?;

    if deploy.run_buildout {
        ctx.reporter.info("Running buildout");
        let buildout_dir = format!(
            "{}/{}",
            deploy.env_home.trim_end_matches('/'),
            dist.dir_name()
        );
        ctx.remote.execute(
            &Invocation::new(RemoteCommand::new("bin/buildout"))
                .as_user(deploy.env_user.as_str())
                .within(Virtualenv::for_user(&deploy.env_user)?)
                .in_dir(buildout_dir),
        )?;
    }

    summarize(ctx.reporter, &builder, &dist.version, &egg_dirs)?;

    Ok(ReleaseOutcome::Released {
        version: dist.version,
    })
}

fn remove_dist(path: &Path) {
    if let Some(dir) = path.parent() {
        if let Err(e) = std::fs::remove_dir_all(dir) {
            log::warn!("Could not remove {}: {}", dir.display(), e);
        }
    }
}
