// tests/release_test.rs
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use wagner::cli::{run_release, ReleaseArgs, ReleaseContext, ReleaseOutcome};
use wagner::config::Config;
use wagner::git::MockRepository;
use wagner::remote::{RecordingRemote, ScriptedRunner};
use wagner::ui::{MemoryReporter, Severity};
use wagner::ReleaseTarget;

fn tagged_repo(branch: &str, tag: &str) -> MockRepository {
    let mut repo = MockRepository::new();
    repo.set_branch(branch);
    repo.add_tag(tag);
    repo.add_file("buildout.cfg", "[buildout]\n");
    repo
}

fn args(target: ReleaseTarget, tag: Option<&str>) -> ReleaseArgs {
    ReleaseArgs {
        target,
        tag: tag.map(|t| t.to_string()),
        dry_run: false,
    }
}

#[test]
fn test_refused_release_touches_nothing() {
    let mut repo = tagged_repo("master", "v1.0");
    repo.set_dirty(true);
    let remote = RecordingRemote::new();
    let runner = ScriptedRunner::new();
    let reporter = MemoryReporter::new();

    let ctx = ReleaseContext {
        repo: &repo,
        remote: &remote,
        runner: &runner,
        reporter: &reporter,
    };
    let outcome = run_release(
        &args(ReleaseTarget::Production, Some("v1.0")),
        &Config::default(),
        &ctx,
    )
    .unwrap();

    assert_eq!(outcome, ReleaseOutcome::Refused);
    assert!(remote.scripts().is_empty());
    assert!(remote.uploads().is_empty());
    assert!(runner.calls().is_empty());
}

#[test]
fn test_dry_run_resolves_version_only() {
    let mut repo = tagged_repo("feature-x", "v1.0");
    repo.set_description("v1.0-4-gdeadbee");
    let remote = RecordingRemote::new();
    let runner = ScriptedRunner::new();
    let reporter = MemoryReporter::new();

    let ctx = ReleaseContext {
        repo: &repo,
        remote: &remote,
        runner: &runner,
        reporter: &reporter,
    };
    let mut release = args(ReleaseTarget::Other("tst".to_string()), None);
    release.dry_run = true;

    let outcome = run_release(&release, &Config::default(), &ctx).unwrap();

    assert_eq!(
        outcome,
        ReleaseOutcome::DryRun {
            version: "v1.0-4-gdeadbee".to_string()
        }
    );
    assert!(remote.scripts().is_empty());
}

#[test]
fn test_release_without_eggs() {
    let repo = tagged_repo("release-9", "v9");
    let remote = RecordingRemote::new();
    let runner = ScriptedRunner::new();
    let reporter = MemoryReporter::new();

    let ctx = ReleaseContext {
        repo: &repo,
        remote: &remote,
        runner: &runner,
        reporter: &reporter,
    };
    let outcome = run_release(
        &args(ReleaseTarget::Acceptance, Some("v9")),
        &Config::default(),
        &ctx,
    )
    .unwrap();

    assert_eq!(
        outcome,
        ReleaseOutcome::Released {
            version: "v9".to_string()
        }
    );

    let uploads = remote.uploads();
    assert_eq!(uploads.len(), 2);
    assert!(uploads[0].local.ends_with("buildout.tar"));
    assert!(!uploads[0].local.exists(), "local dist is cleaned up");

    let cfg = String::from_utf8(uploads[1].content.clone().unwrap()).unwrap();
    assert_eq!(cfg, "[buildout]\nextends = buildout-acc.cfg\n\n[versions]\n");

    assert!(remote.ran("tar -C /home/plone -xf /tmp/buildout.tar"));
    assert!(remote.ran("/home/plone/buildout-v9/buildout.cfg"));
    assert!(!remote.ran("bin/buildout"));
    assert!(reporter.contains(Severity::Success, "Installed version v9"));
}

#[test]
fn test_release_with_eggs_and_buildout_run() {
    let checkouts = TempDir::new().unwrap();
    let egg_dir = checkouts.path().join("my.theme");

    // an existing checkout with the wanted branch checked out
    let egg_repo = git2::Repository::init(&egg_dir).unwrap();
    fs::write(egg_dir.join("setup.py"), "").unwrap();
    let mut index = egg_repo.index().unwrap();
    index.add_path(std::path::Path::new("setup.py")).unwrap();
    index.write().unwrap();
    let tree = egg_repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = git2::Signature::now("Test User", "test@example.com").unwrap();
    let commit = egg_repo
        .commit(Some("HEAD"), &sig, &sig, "egg", &tree, &[])
        .unwrap();
    egg_repo
        .branch("release-2", &egg_repo.find_commit(commit).unwrap(), false)
        .unwrap();

    fs::write(
        checkouts.path().join("autocheckout-prd.cfg"),
        format!(
            "[sources]\nmy.theme = git {} rev=release-2\n",
            egg_dir.display()
        ),
    )
    .unwrap();

    let mut config = Config::default();
    config.deploy.eggs = vec!["my.theme".to_string()];
    config.deploy.workdir = checkouts.path().to_path_buf();
    config.deploy.autocheckout_dir = checkouts.path().to_path_buf();
    config.deploy.run_buildout = true;

    let repo = tagged_repo("master", "v2.0");
    let remote = RecordingRemote::new();
    let runner = ScriptedRunner::new()
        .respond(egg_dir.clone(), "python setup.py --name", "my.theme")
        .respond(egg_dir.clone(), "python setup.py --version", "1.4");
    let reporter = MemoryReporter::new();

    let ctx = ReleaseContext {
        repo: &repo,
        remote: &remote,
        runner: &runner,
        reporter: &reporter,
    };
    let outcome = run_release(
        &args(ReleaseTarget::Production, Some("v2.0")),
        &config,
        &ctx,
    )
    .unwrap();

    assert_eq!(
        outcome,
        ReleaseOutcome::Released {
            version: "v2.0".to_string()
        }
    );
    assert!(reporter.contains(Severity::Success, "Prepared my.theme, branch=release-2"));
    assert_eq!(
        egg_repo.head().unwrap().shorthand(),
        Some("release-2"),
        "egg checkout switched to the configured branch"
    );

    let uploads = remote.uploads();
    assert_eq!(
        uploads[1].local,
        PathBuf::from(&egg_dir).join("dist/my.theme-1.4-py2.7.egg")
    );
    let cfg = String::from_utf8(uploads[2].content.clone().unwrap()).unwrap();
    assert!(cfg.contains("extends = buildout-prd.cfg"));
    assert!(cfg.contains("my.theme = 1.4"));

    assert!(remote.ran("unzip -o /tmp/my.theme-1.4-py2.7.egg -d /home/plone/eggs/my.theme-1.4-py2.7.egg"));
    assert!(remote.ran("source ~plone/bin/activate"));
    assert!(remote.ran("/home/plone/buildout-v2.0 && bin/buildout"));
    assert!(reporter.contains(Severity::Success, "  my.theme: 1.4"));
}
