// Desired-state commands
pub mod reconcile;

// Device queries
pub mod get;

use anyhow::{Context as AnyhowContext, Result};
use jsonrpc::transport::http::HttpTransport;

use crate::cli::DeviceArgs;
use crate::config::DeviceConfig;

/// Open a transport to the device named by the config file and flags
pub fn connect(device: &DeviceArgs) -> Result<HttpTransport> {
    let config = DeviceConfig::load(device.device_config.as_deref())?.merge(device.overrides());
    let settings = config.settings()?;
    log::debug!("connecting to {}", settings.url());
    HttpTransport::new(settings).context("Could not set up device connection")
}
