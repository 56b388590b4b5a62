use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WagnerError};

const CONFIG_FILE_NAME: &str = "wagner.toml";

/// Represents the complete configuration for wagner.
///
/// Describes the host to release to, where the buildout and its eggs live
/// there, and which system packages and services it needs.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub system: SystemConfig,
}

/// How to reach the remote host.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RemoteConfig {
    pub host: Option<String>,
    pub user: Option<String>,
    pub port: Option<u16>,
}

fn default_env_user() -> String {
    "plone".to_string()
}

fn default_env_home() -> String {
    "/home/plone".to_string()
}

fn default_py_version() -> String {
    "2.7".to_string()
}

fn default_python() -> String {
    "python".to_string()
}

fn default_workdir() -> PathBuf {
    std::env::temp_dir()
}

fn default_autocheckout_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Where and as whom the buildout is installed.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DeployConfig {
    /// Account owning the installation
    #[serde(default = "default_env_user")]
    pub env_user: String,

    /// Home directory of `env_user`; buildouts are unpacked here
    #[serde(default = "default_env_home")]
    pub env_home: String,

    /// Directory receiving the built eggs, defaults to `<env_home>/eggs`
    #[serde(default)]
    pub egg_dest: Option<String>,

    /// Eggs checked out from `autocheckout-<env>.cfg`
    #[serde(default)]
    pub eggs: Vec<String>,

    /// Python version tag of built eggs, as in `-py2.7.egg`
    #[serde(default = "default_py_version")]
    pub py_version: String,

    /// Local interpreter used to run `setup.py`
    #[serde(default = "default_python")]
    pub python: String,

    /// Local directory eggs are checked out into
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,

    /// Local directory holding the `autocheckout-<env>.cfg` files
    #[serde(default = "default_autocheckout_dir")]
    pub autocheckout_dir: PathBuf,

    /// Run `bin/buildout` in the new buildout after uploading it
    #[serde(default)]
    pub run_buildout: bool,
}

impl DeployConfig {
    pub fn egg_dest(&self) -> String {
        self.egg_dest
            .clone()
            .unwrap_or_else(|| format!("{}/eggs", self.env_home.trim_end_matches('/')))
    }

    /// Local checkout directory of an egg
    pub fn egg_dir(&self, egg: &str) -> PathBuf {
        self.workdir.join(egg)
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        DeployConfig {
            env_user: default_env_user(),
            env_home: default_env_home(),
            egg_dest: None,
            eggs: Vec::new(),
            py_version: default_py_version(),
            python: default_python(),
            workdir: default_workdir(),
            autocheckout_dir: default_autocheckout_dir(),
            run_buildout: false,
        }
    }
}

fn default_os() -> String {
    "debian".to_string()
}

fn default_init() -> String {
    "upstart".to_string()
}

/// System packages and services of the remote host.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SystemConfig {
    /// `debian` or `centos`
    #[serde(default = "default_os")]
    pub os: String,

    /// `upstart`, or anything else for SysV init scripts
    #[serde(default = "default_init")]
    pub init: String,

    #[serde(default)]
    pub requirements: Vec<String>,

    #[serde(default)]
    pub services: Vec<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            os: default_os(),
            init: default_init(),
            requirements: Vec::new(),
            services: Vec::new(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `wagner.toml` in current directory
/// 3. `wagner.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Config::default());
        }
        path
    } else {
        return Ok(Config::default());
    };

    log::debug!("loading configuration from {}", path.display());

    let config_str = fs::read_to_string(&path)?;
    parse_config(&config_str)
        .map_err(|e| WagnerError::config(format!("{}: {}", path.display(), e)))
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.deploy.env_user, "plone");
        assert_eq!(config.system.os, "debian");
    }

    #[test]
    fn test_egg_dest_defaults_to_env_home() {
        let deploy = DeployConfig {
            env_home: "/srv/site/".to_string(),
            ..Default::default()
        };
        assert_eq!(deploy.egg_dest(), "/srv/site/eggs");
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
[remote]
host = "app1"

[deploy]
eggs = ["my.theme"]
"#,
        )
        .unwrap();

        assert_eq!(config.remote.host.as_deref(), Some("app1"));
        assert_eq!(config.remote.port, None);
        assert_eq!(config.deploy.eggs, vec!["my.theme".to_string()]);
        assert_eq!(config.deploy.python, "python");
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(parse_config("[remote\nhost=").is_err());
    }
}
