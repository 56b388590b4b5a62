//! Remote execution toolkit
//!
//! Commands are built as structured argument lists ([RemoteCommand]) and only
//! turned into a shell script at the very end, with every literal argument
//! shell-escaped. An [Invocation] adds how the command runs: which user,
//! in which directory, inside which virtualenv, and whether a failure aborts.
//!
//! Hosts are reached through the [Remote] trait:
//!
//! - [ssh::SshRemote]: runs scripts over `ssh` and uploads with `scp`
//! - [mock::RecordingRemote]: records scripts and uploads for testing
//!
//! Commands on the release machine itself go through [local::LocalRunner].

pub mod local;
pub mod mock;
pub mod ssh;
pub mod virtualenv;

pub use local::{LocalRunner, ScriptedRunner, SystemRunner};
pub use mock::RecordingRemote;
pub use ssh::SshRemote;
pub use virtualenv::Virtualenv;

use std::borrow::Cow;
use std::path::Path;

use crate::error::{Result, WagnerError};

/// Quote a single word for a POSIX shell
pub fn quote(word: &str) -> String {
    shell_escape::unix::escape(Cow::Borrowed(word)).into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    Literal(String),
    Raw(String),
}

/// A program and its arguments, rendered to a shell command line on demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    program: String,
    args: Vec<Arg>,
}

impl RemoteCommand {
    pub fn new(program: impl Into<String>) -> Self {
        RemoteCommand {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument, escaped when rendered
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(Arg::Literal(arg.into()));
        self
    }

    /// Append several escaped arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args
            .extend(args.into_iter().map(|a| Arg::Literal(a.into())));
        self
    }

    /// Append a trusted token verbatim, so the shell may expand it
    pub fn raw_arg(mut self, token: impl Into<String>) -> Self {
        self.args.push(Arg::Raw(token.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Render as a single shell command line
    pub fn render(&self) -> String {
        let mut line = quote(&self.program);

        for arg in &self.args {
            line.push(' ');
            match arg {
                Arg::Literal(value) => line.push_str(&quote(value)),
                Arg::Raw(token) => line.push_str(token),
            }
        }

        line
    }
}

/// Who a command runs as on the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Privilege {
    /// The login user
    User,
    /// root, via sudo
    Root,
    /// Another account, via sudo
    As(String),
}

/// A command together with the way it is run
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: RemoteCommand,
    pub privilege: Privilege,
    /// Failures are logged instead of aborting
    pub warn_only: bool,
    pub cwd: Option<String>,
    pub virtualenv: Option<Virtualenv>,
}

impl Invocation {
    pub fn new(command: RemoteCommand) -> Self {
        Invocation {
            command,
            privilege: Privilege::User,
            warn_only: false,
            cwd: None,
            virtualenv: None,
        }
    }

    pub fn as_root(mut self) -> Self {
        self.privilege = Privilege::Root;
        self
    }

    pub fn as_user(mut self, user: impl Into<String>) -> Self {
        self.privilege = Privilege::As(user.into());
        self
    }

    pub fn warn_only(mut self) -> Self {
        self.warn_only = true;
        self
    }

    pub fn in_dir(mut self, dir: impl Into<String>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn within(mut self, virtualenv: Virtualenv) -> Self {
        self.virtualenv = Some(virtualenv);
        self
    }

    /// Render the full script handed to the remote shell
    pub fn render(&self) -> String {
        let mut steps = Vec::new();

        if let Some(venv) = &self.virtualenv {
            steps.push(format!("cd {}", venv.home()));
            steps.push(format!("source {}", venv.activate_script()));
        }
        if let Some(dir) = &self.cwd {
            steps.push(format!("cd {}", quote(dir)));
        }
        steps.push(self.command.render());

        let script = quote(&steps.join(" && "));

        match &self.privilege {
            Privilege::User => format!("/bin/bash -l -c {}", script),
            Privilege::Root => format!("sudo -H /bin/bash -l -c {}", script),
            Privilege::As(user) => {
                format!("sudo -u {} -H /bin/bash -l -c {}", quote(user), script)
            }
        }
    }
}

/// Result of a command run on a host
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Access to a single remote host
pub trait Remote: Send + Sync {
    /// Run a rendered script and collect its output, whatever the exit status
    fn spawn(&self, script: &str) -> Result<CommandOutput>;

    /// Upload a local file into `remote_dir`.
    ///
    /// # Returns
    /// * `Ok(path)` - Remote path of the uploaded file
    fn put(&self, local: &Path, remote_dir: &str) -> Result<String>;

    /// Run an invocation.
    ///
    /// A non-zero exit status is an error unless the invocation is
    /// `warn_only`, in which case it is logged and returned.
    fn execute(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let script = invocation.render();
        let output = self.spawn(&script)?;

        if !output.success() {
            if invocation.warn_only {
                log::warn!(
                    "'{}' exited with status {} (ignored)",
                    invocation.command.render(),
                    output.status
                );
            } else {
                return Err(WagnerError::remote(format!(
                    "'{}' exited with status {}: {}",
                    invocation.command.render(),
                    output.status,
                    output.stderr.trim()
                )));
            }
        }

        Ok(output)
    }

    /// Run as the login user
    fn run(&self, command: RemoteCommand) -> Result<CommandOutput> {
        self.execute(&Invocation::new(command))
    }

    /// Run as root
    fn sudo(&self, command: RemoteCommand) -> Result<CommandOutput> {
        self.execute(&Invocation::new(command).as_root())
    }

    /// Run as another account
    fn sudo_as(&self, command: RemoteCommand, user: &str) -> Result<CommandOutput> {
        self.execute(&Invocation::new(command).as_user(user))
    }
}
