use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use crate::error::{Result, WagnerError};

/// Runs commands on the release machine itself
pub trait LocalRunner: Send + Sync {
    /// Run `program args...` in `dir` and return its trimmed stdout.
    ///
    /// A non-zero exit status is an error.
    fn capture(&self, dir: &Path, program: &str, args: &[&str]) -> Result<String>;
}

/// Runs local commands as child processes
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl LocalRunner for SystemRunner {
    fn capture(&self, dir: &Path, program: &str, args: &[&str]) -> Result<String> {
        log::debug!("[local:{}] {} {}", dir.display(), program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| WagnerError::command(format!("Cannot run {}: {}", program, e)))?;

        if !output.status.success() {
            return Err(WagnerError::command(format!(
                "'{} {}' in {} failed with exit code {:?}: {}",
                program,
                args.join(" "),
                dir.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Local runner answering from a script of canned outputs, for testing.
///
/// Commands without a canned answer succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<(PathBuf, String), String>,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` (program and args joined by spaces) run in `dir`
    pub fn respond(
        mut self,
        dir: impl Into<PathBuf>,
        command: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        self.responses
            .insert((dir.into(), command.into()), output.into());
        self
    }

    /// Every command run so far, with the directory it ran in
    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl LocalRunner for ScriptedRunner {
    fn capture(&self, dir: &Path, program: &str, args: &[&str]) -> Result<String> {
        let mut command = program.to_string();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }

        let key = (dir.to_path_buf(), command);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }

        Ok(self.responses.get(&key).cloned().unwrap_or_default())
    }
}
