use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;

use super::{CommandOutput, Remote};

/// A file handed to [RecordingRemote::put]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub local: PathBuf,
    pub remote_dir: String,
    /// File content at upload time, if it was readable
    pub content: Option<Vec<u8>>,
}

/// Remote that runs nothing and remembers everything, for testing
#[derive(Debug, Default)]
pub struct RecordingRemote {
    scripts: Mutex<Vec<String>>,
    uploads: Mutex<Vec<Upload>>,
    failing: Vec<String>,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every script containing `needle` exit with status 1
    pub fn fail_on(mut self, needle: impl Into<String>) -> Self {
        self.failing.push(needle.into());
        self
    }

    /// Scripts in the order they were spawned
    pub fn scripts(&self) -> Vec<String> {
        self.scripts
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads
            .lock()
            .map(|u| u.clone())
            .unwrap_or_default()
    }

    /// Whether any spawned script contains `needle`
    pub fn ran(&self, needle: &str) -> bool {
        self.scripts().iter().any(|s| s.contains(needle))
    }
}

impl Remote for RecordingRemote {
    fn spawn(&self, script: &str) -> Result<CommandOutput> {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.push(script.to_string());
        }

        let status = if self.failing.iter().any(|n| script.contains(n.as_str())) {
            1
        } else {
            0
        };

        Ok(CommandOutput {
            status,
            ..Default::default()
        })
    }

    fn put(&self, local: &Path, remote_dir: &str) -> Result<String> {
        let remote_dir = remote_dir.trim_end_matches('/');
        let file_name = local
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(Upload {
                local: local.to_path_buf(),
                remote_dir: remote_dir.to_string(),
                content: std::fs::read(local).ok(),
            });
        }

        Ok(format!("{}/{}", remote_dir, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WagnerError;
    use crate::remote::{Invocation, RemoteCommand};

    #[test]
    fn test_records_scripts() {
        let remote = RecordingRemote::new();
        remote.run(RemoteCommand::new("uptime")).unwrap();

        assert_eq!(remote.scripts(), vec!["/bin/bash -l -c uptime".to_string()]);
        assert!(remote.ran("uptime"));
    }

    #[test]
    fn test_failure_aborts_unless_warn_only() {
        let remote = RecordingRemote::new().fail_on("systemctl");

        let strict = remote.sudo(RemoteCommand::new("systemctl").args(["enable", "redis"]));
        assert!(matches!(strict, Err(WagnerError::Remote(_))));

        let lenient = remote
            .execute(
                &Invocation::new(RemoteCommand::new("systemctl").args(["enable", "redis"]))
                    .as_root()
                    .warn_only(),
            )
            .unwrap();
        assert_eq!(lenient.status, 1);
    }

    #[test]
    fn test_put_returns_remote_path() {
        let remote = RecordingRemote::new();
        let path = remote.put(Path::new("/tmp/dist/buildout.tar"), "/tmp/").unwrap();

        assert_eq!(path, "/tmp/buildout.tar");
        assert_eq!(remote.uploads()[0].remote_dir, "/tmp");
    }
}
