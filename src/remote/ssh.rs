use std::path::Path;
use std::process::Command;

use crate::config::RemoteConfig;
use crate::error::{Result, WagnerError};

use super::{CommandOutput, Remote};

/// Remote host reached through the system `ssh` and `scp` binaries.
///
/// Authentication is left to the user's ssh setup (agent, keys,
/// `~/.ssh/config`).
#[derive(Debug, Clone)]
pub struct SshRemote {
    host: String,
    user: Option<String>,
    port: Option<u16>,
}

impl SshRemote {
    pub fn new(host: impl Into<String>) -> Self {
        SshRemote {
            host: host.into(),
            user: None,
            port: None,
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Build from the `[remote]` configuration section
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        let host = config
            .host
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| WagnerError::config("No remote host configured"))?;

        // ssh and scp would take these for options
        if host.starts_with('-') {
            return Err(WagnerError::config(format!("Invalid remote host '{}'", host)));
        }
        if let Some(user) = config.user.as_deref().filter(|u| u.starts_with('-')) {
            return Err(WagnerError::config(format!("Invalid remote user '{}'", user)));
        }

        let mut remote = SshRemote::new(host);
        if let Some(user) = &config.user {
            remote = remote.with_user(user.clone());
        }
        if let Some(port) = config.port {
            remote = remote.with_port(port);
        }

        Ok(remote)
    }

    /// `user@host`, or just `host`
    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.host),
            None => self.host.clone(),
        }
    }
}

impl Remote for SshRemote {
    fn spawn(&self, script: &str) -> Result<CommandOutput> {
        let mut cmd = Command::new("ssh");
        if let Some(port) = self.port {
            cmd.args(["-p", &port.to_string()]);
        }
        cmd.arg(self.destination()).arg(script);

        log::debug!("[{}] {}", self.destination(), script);

        let output = cmd.output().map_err(|e| {
            WagnerError::remote(format!("Cannot run ssh to {}: {}", self.destination(), e))
        })?;

        Ok(CommandOutput {
            // ssh itself exits with 255 on connection failures
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn put(&self, local: &Path, remote_dir: &str) -> Result<String> {
        let file_name = local
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                WagnerError::remote(format!("Cannot upload '{}': no file name", local.display()))
            })?;
        let remote_dir = remote_dir.trim_end_matches('/');

        let mut cmd = Command::new("scp");
        if let Some(port) = self.port {
            cmd.args(["-P", &port.to_string()]);
        }
        cmd.arg(local)
            .arg(format!("{}:{}/", self.destination(), remote_dir));

        log::debug!("[{}] put {} -> {}/", self.destination(), local.display(), remote_dir);

        let status = cmd
            .status()
            .map_err(|e| WagnerError::remote(format!("Cannot run scp: {}", e)))?;

        if !status.success() {
            return Err(WagnerError::remote(format!(
                "Upload of '{}' to {} failed with exit code: {:?}",
                local.display(),
                self.destination(),
                status.code()
            )));
        }

        Ok(format!("{}/{}", remote_dir, file_name))
    }
}
