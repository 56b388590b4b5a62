//! Buildout archives: packing a repository snapshot and unpacking it remotely.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::git::Repository;
use crate::remote::{Remote, RemoteCommand};
use crate::ui::Reporter;
use crate::version::resolve_version;

const DIST_FILE_NAME: &str = "buildout.tar";

/// A packed buildout ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildoutDist {
    /// Local tar file
    pub path: PathBuf,
    pub version: String,
}

impl BuildoutDist {
    /// Directory the archive unpacks into
    pub fn dir_name(&self) -> String {
        buildout_dir_name(&self.version)
    }
}

/// `buildout-<version>`
pub fn buildout_dir_name(version: &str) -> String {
    format!("buildout-{}", version)
}

/// Pack the buildout at `tag` (or HEAD) into a fresh temporary directory.
///
/// All paths in the archive sit below `buildout-<version>/`. The directory
/// is left in place for the caller to upload from.
pub fn create_buildout_dist<R>(
    repo: &R,
    tag: Option<&str>,
    reporter: &dyn Reporter,
) -> Result<BuildoutDist>
where
    R: Repository + ?Sized,
{
    let version = resolve_version(repo, tag, reporter)?;

    let dist_dir = tempfile::Builder::new()
        .prefix("wagner-dist-")
        .tempdir()?
        .keep();
    let path = dist_dir.join(DIST_FILE_NAME);

    let mut file = File::create(&path)?;
    repo.archive(tag, &format!("{}/", buildout_dir_name(&version)), &mut file)?;
    file.flush()?;

    log::debug!("wrote {}", path.display());

    Ok(BuildoutDist { path, version })
}

/// Upload a buildout archive and unpack it into `dest` as `env_user`
pub fn upload_buildout(
    remote: &dyn Remote,
    reporter: &dyn Reporter,
    dist: &Path,
    dest: &str,
    env_user: &str,
) -> Result<()> {
    reporter.info(&format!("Uploading buildout {}", dist.display()));

    let remote_path = remote.put(dist, "/tmp")?;

    remote.run(RemoteCommand::new("chmod").args(["a+rx", remote_path.as_str()]))?;
    remote.sudo_as(
        RemoteCommand::new("tar").args(["-C", dest, "-xf", remote_path.as_str()]),
        env_user,
    )?;

    reporter.success("uploaded buildout");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use crate::remote::RecordingRemote;
    use crate::ui::MemoryReporter;

    #[test]
    fn test_dist_prefix_uses_version() {
        let mut repo = MockRepository::new();
        repo.add_tag("v3");
        repo.add_file("buildout.cfg", "[buildout]\n");

        let dist = create_buildout_dist(&repo, Some("v3"), &MemoryReporter::new()).unwrap();
        assert_eq!(dist.version, "v3");
        assert_eq!(dist.dir_name(), "buildout-v3");

        let file = File::open(&dist.path).unwrap();
        let mut archive = tar::Archive::new(file);
        let paths: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().display().to_string())
            .collect();
        assert_eq!(paths, vec!["buildout-v3/buildout.cfg".to_string()]);

        std::fs::remove_dir_all(dist.path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_upload_buildout() {
        let remote = RecordingRemote::new();
        let reporter = MemoryReporter::new();

        upload_buildout(
            &remote,
            &reporter,
            Path::new("/tmp/wagner-dist-x/buildout.tar"),
            "/home/plone",
            "plone",
        )
        .unwrap();

        let scripts = remote.scripts();
        assert_eq!(remote.uploads()[0].remote_dir, "/tmp");
        assert!(scripts[0].contains("chmod a+rx /tmp/buildout.tar"));
        assert!(scripts[1].starts_with("sudo -u plone"));
        assert!(scripts[1].contains("tar -C /home/plone -xf /tmp/buildout.tar"));
    }
}
