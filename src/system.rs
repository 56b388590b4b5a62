//! OS packages and system services on the remote host.

use std::fmt;

use crate::error::Result;
use crate::remote::{Invocation, Remote, RemoteCommand};
use crate::ui::Reporter;

/// Package manager of a supported OS family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Yum,
}

impl PackageManager {
    /// Package manager for an OS name from the configuration
    pub fn for_os(os: &str) -> Option<Self> {
        match os.to_ascii_lowercase().as_str() {
            "debian" => Some(PackageManager::Apt),
            "centos" => Some(PackageManager::Yum),
            _ => None,
        }
    }

    fn install_command(&self, package: &str) -> RemoteCommand {
        let program = match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Yum => "yum",
        };
        RemoteCommand::new(program).args(["-y", "install", package])
    }

    /// Whether installed services still have to be enabled with systemctl
    fn needs_enable(&self) -> bool {
        matches!(self, PackageManager::Yum)
    }
}

/// Install required packages system wide.
///
/// On CentOS the given services are enabled afterwards; a service that
/// cannot be enabled does not stop the installation.
///
/// # Returns
/// * `Ok(true)` - All packages installed
/// * `Ok(false)` - No installer is known for `os`
/// * `Err` - A package could not be installed
pub fn install_system_requirements(
    remote: &dyn Remote,
    reporter: &dyn Reporter,
    requirements: &[String],
    services: &[String],
    os: &str,
) -> Result<bool> {
    reporter.info("Installing system wide dependencies");

    let Some(installer) = PackageManager::for_os(os) else {
        reporter.error(&format!("No installer found for {}", os));
        return Ok(false);
    };

    for requirement in requirements {
        remote.sudo(installer.install_command(requirement))?;
    }

    if installer.needs_enable() {
        for service in services {
            remote.execute(
                &Invocation::new(RemoteCommand::new("systemctl").args(["enable", service.as_str()]))
                    .as_root()
                    .warn_only(),
            )?;
        }
    }

    reporter.success("System dependencies installed");
    Ok(true)
}

/// Init system managing the services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceSystem {
    /// `service <name> <action>`
    Upstart,
    /// `/etc/init.d/<name> <action>`
    SysV,
}

impl ServiceSystem {
    /// `upstart` selects upstart, any other name SysV init scripts
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("upstart") {
            ServiceSystem::Upstart
        } else {
            ServiceSystem::SysV
        }
    }

    fn command(&self, service: &str, action: ServiceAction) -> RemoteCommand {
        match self {
            ServiceSystem::Upstart => {
                RemoteCommand::new("service").args([service, action.as_str()])
            }
            ServiceSystem::SysV => {
                RemoteCommand::new(format!("/etc/init.d/{}", service)).arg(action.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

impl ServiceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
        }
    }

    fn progress(&self) -> (&'static str, &'static str) {
        match self {
            ServiceAction::Start => ("Starting services", "All services started"),
            ServiceAction::Stop => ("Stopping services", "All services stopped"),
            ServiceAction::Restart => ("Restarting services", "All services restarted"),
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply `action` to every service. Failing services are skipped.
pub fn system_services_action(
    remote: &dyn Remote,
    reporter: &dyn Reporter,
    services: &[String],
    action: ServiceAction,
    system: ServiceSystem,
) -> Result<()> {
    let (started, finished) = action.progress();
    reporter.info(started);

    for service in services {
        remote.execute(
            &Invocation::new(system.command(service, action))
                .as_root()
                .warn_only(),
        )?;
    }

    reporter.success(finished);
    Ok(())
}

pub fn start_system_services(
    remote: &dyn Remote,
    reporter: &dyn Reporter,
    services: &[String],
    system: ServiceSystem,
) -> Result<()> {
    system_services_action(remote, reporter, services, ServiceAction::Start, system)
}

pub fn stop_system_services(
    remote: &dyn Remote,
    reporter: &dyn Reporter,
    services: &[String],
    system: ServiceSystem,
) -> Result<()> {
    system_services_action(remote, reporter, services, ServiceAction::Stop, system)
}

pub fn restart_system_services(
    remote: &dyn Remote,
    reporter: &dyn Reporter,
    services: &[String],
    system: ServiceSystem,
) -> Result<()> {
    system_services_action(remote, reporter, services, ServiceAction::Restart, system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RecordingRemote;
    use crate::ui::{MemoryReporter, Severity};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_install_on_debian() {
        let remote = RecordingRemote::new();
        let reporter = MemoryReporter::new();

        let installed = install_system_requirements(
            &remote,
            &reporter,
            &names(&["libxml2-dev", "redis-server"]),
            &names(&["redis"]),
            "debian",
        )
        .unwrap();

        assert!(installed);
        let scripts = remote.scripts();
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].starts_with("sudo -H"));
        assert!(scripts[0].contains("apt-get -y install libxml2-dev"));
        assert!(!remote.ran("systemctl"));
        assert!(reporter.contains(Severity::Success, "System dependencies installed"));
    }

    #[test]
    fn test_install_on_centos_enables_services() {
        let remote = RecordingRemote::new().fail_on("enable postfix");
        let reporter = MemoryReporter::new();

        let installed = install_system_requirements(
            &remote,
            &reporter,
            &names(&["redis"]),
            &names(&["postfix", "redis"]),
            "centos",
        )
        .unwrap();

        assert!(installed);
        assert!(remote.ran("yum -y install redis"));
        assert!(remote.ran("systemctl enable postfix"));
        assert!(remote.ran("systemctl enable redis"));
    }

    #[test]
    fn test_unknown_os() {
        let remote = RecordingRemote::new();
        let reporter = MemoryReporter::new();

        let installed =
            install_system_requirements(&remote, &reporter, &names(&["x"]), &[], "arch").unwrap();

        assert!(!installed);
        assert!(remote.scripts().is_empty());
        assert!(reporter.contains(Severity::Error, "No installer found for arch"));
    }

    #[test]
    fn test_failed_package_aborts() {
        let remote = RecordingRemote::new().fail_on("install broken");
        let result = install_system_requirements(
            &remote,
            &MemoryReporter::new(),
            &names(&["broken", "fine"]),
            &[],
            "debian",
        );

        assert!(result.is_err());
        assert!(!remote.ran("install fine"));
    }

    #[test]
    fn test_upstart_actions() {
        let remote = RecordingRemote::new();
        let reporter = MemoryReporter::new();

        stop_system_services(&remote, &reporter, &names(&["nginx"]), ServiceSystem::Upstart)
            .unwrap();
        restart_system_services(&remote, &reporter, &names(&["nginx"]), ServiceSystem::Upstart)
            .unwrap();

        assert!(remote.ran("service nginx stop"));
        assert!(remote.ran("service nginx restart"));
        assert!(reporter.contains(Severity::Success, "All services stopped"));
        assert!(reporter.contains(Severity::Success, "All services restarted"));
    }

    #[test]
    fn test_sysv_actions_ignore_failures() {
        let remote = RecordingRemote::new().fail_on("haproxy");
        let reporter = MemoryReporter::new();

        start_system_services(
            &remote,
            &reporter,
            &names(&["haproxy", "varnish"]),
            ServiceSystem::from_name("sysv"),
        )
        .unwrap();

        assert!(remote.ran("/etc/init.d/haproxy start"));
        assert!(remote.ran("/etc/init.d/varnish start"));
        assert!(reporter.contains(Severity::Success, "All services started"));
    }
}
