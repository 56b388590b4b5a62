use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use crate::dist::buildout_dir_name;
use crate::error::Result;
use crate::remote::{Remote, RemoteCommand};

use super::EggBuilder;

/// Render the `buildout.cfg` of a release: the environment's base
/// configuration plus pinned egg versions
pub fn render_buildout_cfg(env: &str, versions: &BTreeMap<String, String>) -> String {
    let mut cfg = format!("[buildout]\nextends = buildout-{}.cfg\n\n[versions]\n", env);

    for (name, version) in versions {
        cfg.push_str(&format!("{} = {}\n", name, version));
    }

    cfg
}

/// Install a `buildout.cfg` pinning the egg versions into the release's
/// buildout directory, `<env_home>/buildout-<version>/`
pub fn upload_buildout_cfg(
    remote: &dyn Remote,
    builder: &EggBuilder<'_>,
    env: &str,
    env_user: &str,
    env_home: &str,
    egg_dirs: &[PathBuf],
    version: &str,
) -> Result<()> {
    let versions = builder.generate_egg_info(egg_dirs)?;
    let cfg = render_buildout_cfg(env, &versions);

    let mut file = tempfile::Builder::new()
        .prefix("wagner-")
        .suffix(".cfg")
        .tempfile()?;
    file.write_all(cfg.as_bytes())?;
    file.flush()?;

    let remote_path = remote.put(file.path(), "/tmp")?;
    let target = format!(
        "{}/{}/buildout.cfg",
        env_home.trim_end_matches('/'),
        buildout_dir_name(version)
    );

    remote.sudo_as(
        RemoteCommand::new("cp").args([remote_path.as_str(), target.as_str()]),
        env_user,
    )?;
    remote.sudo(RemoteCommand::new("rm").arg(remote_path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{RecordingRemote, ScriptedRunner};

    #[test]
    fn test_render_without_eggs() {
        let cfg = render_buildout_cfg("prd", &BTreeMap::new());
        assert_eq!(cfg, "[buildout]\nextends = buildout-prd.cfg\n\n[versions]\n");
    }

    #[test]
    fn test_render_pins_sorted() {
        let mut versions = BTreeMap::new();
        versions.insert("zope.foo".to_string(), "1.0".to_string());
        versions.insert("my.theme".to_string(), "2.1".to_string());

        let cfg = render_buildout_cfg("acc", &versions);
        assert!(cfg.ends_with("[versions]\nmy.theme = 2.1\nzope.foo = 1.0\n"));
    }

    #[test]
    fn test_upload_buildout_cfg() {
        let runner = ScriptedRunner::new()
            .respond("/w/my.theme", "python setup.py --name", "my.theme")
            .respond("/w/my.theme", "python setup.py --version", "1.4");
        let builder = EggBuilder::new(&runner, "python");
        let remote = RecordingRemote::new();

        upload_buildout_cfg(
            &remote,
            &builder,
            "acc",
            "plone",
            "/home/plone",
            &[PathBuf::from("/w/my.theme")],
            "v7",
        )
        .unwrap();

        let upload = &remote.uploads()[0];
        let content = String::from_utf8(upload.content.clone().unwrap()).unwrap();
        assert!(content.contains("extends = buildout-acc.cfg"));
        assert!(content.contains("my.theme = 1.4"));

        let scripts = remote.scripts();
        assert!(scripts[0].starts_with("sudo -u plone"));
        assert!(scripts[0].contains("/home/plone/buildout-v7/buildout.cfg"));
        assert!(scripts[1].contains("rm /tmp/wagner-"));
    }
}
