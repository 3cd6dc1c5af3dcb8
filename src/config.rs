use anyhow::{Context, Result, bail};
use declarative::Mode;
use jsonrpc::transport::http::HttpSettings;
use serde::{Deserialize, Serialize};
use srlinux::DesiredState;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEVICE_CONFIG_FILE: &str = "device.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("srlctl"))
}

/// Expand `~` and environment variables in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(path).into_owned());
    PathBuf::from(expanded)
}

// ============================================================================
// Device Config
// ============================================================================

/// Connection settings for one device
///
/// Every field is optional so the file, the environment and the command
/// line can each fill in part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub tls: Option<bool>,
    pub insecure: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl DeviceConfig {
    /// Load device settings
    ///
    /// An explicit path must exist. The default location is optional.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(&expand_path(path)),
            None => {
                let path = config_dir()?.join(DEVICE_CONFIG_FILE);
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    log::debug!("no device config at {}", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid device config {}", path.display()))
    }

    /// Fields set in `overrides` replace ours
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            host: overrides.host.or(self.host),
            port: overrides.port.or(self.port),
            username: overrides.username.or(self.username),
            password: overrides.password.or(self.password),
            tls: overrides.tls.or(self.tls),
            insecure: overrides.insecure.or(self.insecure),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Resolve into transport settings
    pub fn settings(&self) -> Result<HttpSettings> {
        let Some(host) = self.host.as_deref().filter(|h| !h.trim().is_empty()) else {
            bail!("No device host configured (use --host, SRL_HOST or device.toml)");
        };
        let Some(username) = self.username.as_deref() else {
            bail!("No username configured (use --username, SRL_USERNAME or device.toml)");
        };

        let mut settings = HttpSettings::new(
            host,
            username,
            self.password.as_deref().unwrap_or_default(),
            self.tls.unwrap_or(true),
        );
        if let Some(port) = self.port {
            settings.port = port;
        }
        settings.insecure = self.insecure.unwrap_or(false);
        settings.timeout = Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        Ok(settings)
    }
}

// ============================================================================
// Desired State
// ============================================================================

/// Load a desired-state file, TOML or JSON by extension
pub fn load_desired_state(path: &str) -> Result<DesiredState> {
    let path = expand_path(path);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Invalid desired state in {}", path.display())),
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid desired state in {}", path.display())),
        _ => bail!(
            "Unsupported desired-state format: {} (expected .toml or .json)",
            path.display()
        ),
    }
}

/// Command-line state wins over the file's, merged otherwise
pub fn resolve_mode(requested: Option<Mode>, tree: &DesiredState) -> Mode {
    requested.or(tree.state).unwrap_or_default()
}
