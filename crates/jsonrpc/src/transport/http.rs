//! HTTP transport for the device's JSON-RPC server.
//!
//! Requests are POSTed to `<scheme>://<host>:<port>/jsonrpc` with HTTP
//! basic authentication. Timeouts are enforced here; the engine above
//! only ever sees them as transport errors.

use crate::error::{Error, Result};
use crate::transport::Transport;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use std::time::Duration;

/// Path of the JSON-RPC endpoint on the device.
pub const JSONRPC_ENDPOINT: &str = "/jsonrpc";

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Use HTTPS.
    pub tls: bool,
    /// Skip certificate verification (lab devices with self-signed certs).
    pub insecure: bool,
    pub timeout: Duration,
}

impl HttpSettings {
    /// Settings with default port and timeout for the given scheme.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        tls: bool,
    ) -> Self {
        Self {
            host: host.into(),
            port: if tls { 443 } else { 80 },
            username: username.into(),
            password: password.into(),
            tls,
            insecure: false,
            timeout: Duration::from_secs(30),
        }
    }

    /// Full endpoint URL.
    #[must_use]
    pub fn url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}:{}{}", scheme, self.host, self.port, JSONRPC_ENDPOINT)
    }

    fn authorization(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

/// Transport that talks to a device over HTTP(S).
///
/// # Example
///
/// ```no_run
/// use jsonrpc::transport::http::{HttpSettings, HttpTransport};
/// use jsonrpc::transport::Transport;
///
/// let settings = HttpSettings::new("clab-srl1", "admin", "NokiaSrl1!", true);
/// let transport = HttpTransport::new(settings).unwrap();
/// let payload = r#"{"jsonrpc":"2.0","method":"get","params":{"commands":[{"path":"/system/name/host-name"}]},"id":1}"#;
/// let response = transport.post(payload).unwrap();
/// println!("{}", response);
/// ```
pub struct HttpTransport {
    agent: ureq::Agent,
    url: String,
    authorization: String,
}

impl HttpTransport {
    /// Create a transport for `settings`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the host is empty.
    pub fn new(settings: HttpSettings) -> Result<Self> {
        if settings.host.trim().is_empty() {
            return Err(Error::Config("device host is empty".to_string()));
        }

        let mut config = ureq::Agent::config_builder().timeout_global(Some(settings.timeout));
        if settings.insecure {
            config = config.tls_config(
                ureq::tls::TlsConfig::builder()
                    .disable_verification(true)
                    .build(),
            );
        }
        let agent: ureq::Agent = config.build().into();

        Ok(Self {
            agent,
            url: settings.url(),
            authorization: settings.authorization(),
        })
    }

    /// Endpoint this transport posts to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn post(&self, payload: &str) -> Result<Value> {
        log::trace!("POST {} {}", self.url, payload);

        let response: Value = self
            .agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("Authorization", &self.authorization)
            .header("User-Agent", "srlctl")
            .send(payload)?
            .body_mut()
            .read_json()?;

        Ok(response)
    }
}
