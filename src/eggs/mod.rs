//! Eggs: Python sub-packages released alongside a buildout.
//!
//! Eggs are checked out locally from the sources listed in
//! `autocheckout-<env>.cfg`, built with their `setup.py`, uploaded and
//! unpacked on the remote host, and pinned in the uploaded `buildout.cfg`.

pub mod autocheckout;
pub mod buildout_cfg;
pub mod checkout;

pub use autocheckout::CheckoutSpec;
pub use buildout_cfg::{render_buildout_cfg, upload_buildout_cfg};
pub use checkout::{checkout_revision, prepare_eggs};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, WagnerError};
use crate::remote::{LocalRunner, Remote, RemoteCommand};
use crate::ui::Reporter;

/// Runs `setup.py` of local egg checkouts
pub struct EggBuilder<'a> {
    runner: &'a dyn LocalRunner,
    python: &'a str,
}

impl<'a> EggBuilder<'a> {
    pub fn new(runner: &'a dyn LocalRunner, python: &'a str) -> Self {
        EggBuilder { runner, python }
    }

    /// Distribution name and version of the egg in `dir`
    pub fn egg_info(&self, dir: &Path) -> Result<(String, String)> {
        let version = self.setup_py(dir, "--version")?;
        let name = self.setup_py(dir, "--name")?;

        if name.is_empty() || version.is_empty() {
            return Err(WagnerError::egg(format!(
                "No name or version reported by {}",
                dir.join("setup.py").display()
            )));
        }

        Ok((name, version))
    }

    /// Name to version for every egg directory
    pub fn generate_egg_info(&self, dirs: &[PathBuf]) -> Result<BTreeMap<String, String>> {
        let mut info = BTreeMap::new();

        for dir in dirs {
            let (name, version) = self.egg_info(dir)?;
            info.insert(name, version);
        }

        Ok(info)
    }

    /// Build a binary egg, returning its file name inside `<dir>/dist`
    pub fn bdist_egg(&self, dir: &Path, py_version: &str) -> Result<String> {
        let (name, version) = self.egg_info(dir)?;

        self.runner.capture(dir, self.python, &["setup.py", "bdist_egg"])?;

        Ok(format!(
            "{}-{}-py{}.egg",
            name.replace('-', "_"),
            version,
            py_version
        ))
    }

    fn setup_py(&self, dir: &Path, flag: &str) -> Result<String> {
        let output = self.runner.capture(dir, self.python, &["setup.py", flag])?;

        // setuptools may print warnings before the answer
        Ok(output
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string())
    }
}

/// Build each egg and unpack it on the remote host as `<dest>/<egg file>`
pub fn upload_eggs(
    remote: &dyn Remote,
    reporter: &dyn Reporter,
    builder: &EggBuilder<'_>,
    egg_dirs: &[PathBuf],
    dest: &str,
    py_version: &str,
    env_user: &str,
) -> Result<()> {
    let dest = dest.trim_end_matches('/');

    for dir in egg_dirs {
        let egg_name = builder.bdist_egg(dir, py_version)?;
        reporter.info(&format!("Uploading egg {}", egg_name));

        let remote_path = remote.put(&dir.join("dist").join(&egg_name), "/tmp")?;
        let target = format!("{}/{}", dest, egg_name);

        remote.sudo_as(
            RemoteCommand::new("mkdir").args(["-p", target.as_str()]),
            env_user,
        )?;
        remote.sudo_as(
            RemoteCommand::new("unzip").args(["-o", remote_path.as_str(), "-d", target.as_str()]),
            env_user,
        )?;
    }

    Ok(())
}

/// Report the installed version and the eggs that went with it
pub fn summarize(
    reporter: &dyn Reporter,
    builder: &EggBuilder<'_>,
    version: &str,
    egg_dirs: &[PathBuf],
) -> Result<()> {
    let mut lines = vec![
        "***********************************".to_string(),
        format!("Installed version {}", version),
        "Eggs:".to_string(),
    ];

    for (name, egg_version) in builder.generate_egg_info(egg_dirs)? {
        lines.push(format!("  {}: {}", name, egg_version));
    }

    reporter.success(&lines.join("\n"));
    Ok(())
}
