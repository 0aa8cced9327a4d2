use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dns::BEGET_API_BASE;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub login: String,
    pub password: String,
    pub domains: Vec<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ip_echo_url() -> String {
    "http://ident.me".to_string()
}

fn default_api_url() -> String {
    BEGET_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ip_echo_url: default_ip_echo_url(),
            api_url: default_api_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Checks everything the updater needs before it touches the network.
    pub fn validate(&self) -> Result<()> {
        if self.login.trim().is_empty() {
            return Err(Error::Config("'login' must not be empty".into()));
        }
        if self.password.is_empty() {
            return Err(Error::Config("'password' must not be empty".into()));
        }
        if self.domains.is_empty() {
            return Err(Error::Config("'domains' must list at least one domain".into()));
        }
        if let Some(index) = self.domains.iter().position(|d| d.trim().is_empty()) {
            return Err(Error::Config(format!("domain #{} is empty", index + 1)));
        }
        if self.network.timeout_seconds == 0 {
            return Err(Error::Config("'network.timeout_seconds' must be positive".into()));
        }
        Ok(())
    }

    /// Copy that is safe to print.
    pub fn redacted(&self) -> Self {
        Self {
            password: "********".to_string(),
            ..self.clone()
        }
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        #[cfg(unix)]
        {
            PathBuf::from("/etc/beget-ddns")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\ProgramData\beget-ddns")
        }
    }
}
